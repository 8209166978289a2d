//! Tabular views of the store's collections, built as polars frames and
//! rendered as plain-text grids for the terminal.

use crate::engineer::Engineer;
use crate::holiday::Holiday;
use crate::persistence::{KeyValueStore, PersistenceResult};
use crate::sprint::Sprint;
use crate::store::SprintStore;
use crate::task::Task;
use polars::prelude::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn str_column(name: &'static str, values: Vec<String>) -> Column {
    Series::new(PlSmallStr::from_static(name), values).into_column()
}

fn i32_column(name: &'static str, values: Vec<i32>) -> Column {
    Series::new(PlSmallStr::from_static(name), values).into_column()
}

fn i64_column(name: &'static str, values: Vec<i64>) -> Column {
    Series::new(PlSmallStr::from_static(name), values).into_column()
}

fn f64_column(name: &'static str, values: Vec<f64>) -> Column {
    Series::new(PlSmallStr::from_static(name), values).into_column()
}

/// One row per task, with the sprint shown by name when it is known.
pub fn tasks_frame<'a, S, I>(store: &SprintStore<S>, tasks: I) -> PersistenceResult<DataFrame>
where
    S: KeyValueStore,
    I: IntoIterator<Item = &'a Task>,
{
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    let sprint_label = |task: &Task| {
        store
            .sprint_name(task.sprint_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", task.sprint_id))
    };
    let columns = vec![
        i32_column("id", tasks.iter().map(|t| t.id).collect()),
        str_column("title", tasks.iter().map(|t| t.title.clone()).collect()),
        str_column(
            "assignee",
            tasks.iter().map(|t| t.assignee.to_string()).collect(),
        ),
        str_column("status", tasks.iter().map(|t| t.status.to_string()).collect()),
        str_column("sprint", tasks.iter().map(|t| sprint_label(*t)).collect()),
        i64_column(
            "points",
            tasks.iter().map(|t| i64::from(t.story_points)).collect(),
        ),
        str_column(
            "tech_stack",
            tasks.iter().map(|t| t.tech_stack.join(",")).collect(),
        ),
    ];
    Ok(DataFrame::new(columns)?)
}

pub fn engineers_frame(engineers: &[Engineer]) -> PersistenceResult<DataFrame> {
    let columns = vec![
        i32_column("id", engineers.iter().map(|e| e.id).collect()),
        str_column("name", engineers.iter().map(|e| e.name.clone()).collect()),
        str_column("role", engineers.iter().map(|e| e.role.clone()).collect()),
        i64_column(
            "capacity",
            engineers.iter().map(|e| i64::from(e.capacity)).collect(),
        ),
        f64_column(
            "available_days",
            engineers.iter().map(|e| e.available_days).collect(),
        ),
        f64_column(
            "allocated_days",
            engineers.iter().map(Engineer::allocated_days).collect(),
        ),
    ];
    Ok(DataFrame::new(columns)?)
}

pub fn sprints_frame<'a, I>(sprints: I) -> PersistenceResult<DataFrame>
where
    I: IntoIterator<Item = &'a Sprint>,
{
    let sprints: Vec<&Sprint> = sprints.into_iter().collect();
    let columns = vec![
        i32_column("id", sprints.iter().map(|s| s.id).collect()),
        str_column("name", sprints.iter().map(|s| s.name.clone()).collect()),
        str_column(
            "start_date",
            sprints
                .iter()
                .map(|s| s.start_date.format(DATE_FORMAT).to_string())
                .collect(),
        ),
        str_column(
            "end_date",
            sprints
                .iter()
                .map(|s| s.end_date.format(DATE_FORMAT).to_string())
                .collect(),
        ),
        str_column("status", sprints.iter().map(|s| s.status.to_string()).collect()),
        i64_column(
            "working_days",
            sprints.iter().map(|s| s.working_days()).collect(),
        ),
    ];
    Ok(DataFrame::new(columns)?)
}

pub fn holidays_frame<'a, I>(holidays: I) -> PersistenceResult<DataFrame>
where
    I: IntoIterator<Item = &'a Holiday>,
{
    let holidays: Vec<&Holiday> = holidays.into_iter().collect();
    let columns = vec![
        i32_column("id", holidays.iter().map(|h| h.id).collect()),
        str_column("name", holidays.iter().map(|h| h.name.clone()).collect()),
        str_column(
            "date",
            holidays
                .iter()
                .map(|h| h.date.format(DATE_FORMAT).to_string())
                .collect(),
        ),
        str_column(
            "type",
            holidays
                .iter()
                .map(|h| h.holiday_type.to_string())
                .collect(),
        ),
        str_column(
            "recurring",
            holidays
                .iter()
                .map(|h| if h.recurring { "yes" } else { "" }.to_string())
                .collect(),
        ),
        str_column(
            "description",
            holidays
                .iter()
                .map(|h| h.description.clone().unwrap_or_default())
                .collect(),
        ),
    ];
    Ok(DataFrame::new(columns)?)
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Float64(v) => format!("{v:.1}"),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Render `df` as a bordered grid, one line per row.
pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row| {
            columns
                .iter()
                .map(|col| col.get(row).map(|v| cell_text(&v)).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = names.iter().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(w + 2));
        sep.push('+');
    }

    let push_row = |out: &mut String, row: &[String]| {
        out.push('|');
        for (ci, cell) in row.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            out.push_str(&" ".repeat(widths[ci].saturating_sub(cell.chars().count())));
            out.push_str(" |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &names);
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        push_row(&mut out, row);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}
