use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayType {
    National,
    Company,
    Personal,
}

impl HolidayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HolidayType::National => "national",
            HolidayType::Company => "company",
            HolidayType::Personal => "personal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HolidayType::National => "National",
            HolidayType::Company => "Company",
            HolidayType::Personal => "Personal",
        }
    }
}

impl fmt::Display for HolidayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HolidayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "national" => Ok(HolidayType::National),
            "company" => Ok(HolidayType::Company),
            "personal" => Ok(HolidayType::Personal),
            other => Err(format!("unknown holiday type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub holiday_type: HolidayType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Repeats on the same month and day every year.
    #[serde(default)]
    pub recurring: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHoliday {
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub holiday_type: HolidayType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub recurring: bool,
}

impl NewHoliday {
    pub fn new(name: impl Into<String>, date: NaiveDate, holiday_type: HolidayType) -> Self {
        Self {
            name: name.into(),
            date,
            holiday_type,
            description: None,
            recurring: false,
        }
    }

    pub(crate) fn into_holiday(self, id: i32) -> Holiday {
        Holiday {
            id,
            name: self.name,
            date: self.date,
            holiday_type: self.holiday_type,
            description: self.description.filter(|d| !d.trim().is_empty()),
            recurring: self.recurring,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolidayPatch {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub holiday_type: Option<HolidayType>,
    /// `Some("")` clears the description.
    pub description: Option<String>,
    pub recurring: Option<bool>,
}

impl HolidayPatch {
    pub(crate) fn apply(self, holiday: &mut Holiday) {
        if let Some(name) = self.name {
            holiday.name = name;
        }
        if let Some(date) = self.date {
            holiday.date = date;
        }
        if let Some(holiday_type) = self.holiday_type {
            holiday.holiday_type = holiday_type;
        }
        if let Some(description) = self.description {
            holiday.description = if description.trim().is_empty() {
                None
            } else {
                Some(description)
            };
        }
        if let Some(recurring) = self.recurring {
            holiday.recurring = recurring;
        }
    }
}
