use chrono::{Local, NaiveDate};
use clap::Parser;
use sprint_planner::config::BackendKind;
use sprint_planner::export::{DEFAULT_EXPORT_FILE, export_tasks_to_csv, export_to_json};
use sprint_planner::table::{
    engineers_frame, holidays_frame, render_text_table, sprints_frame, tasks_frame,
};
use sprint_planner::views::{
    self, CapacityLevel, Filter, TaskFilter, capacity_summary, filter_by, group_by_month,
    sorted_by_date, upcoming, working_days,
};
use sprint_planner::{
    Assignee, EngineerPatch, HolidayPatch, HolidayType, KeyValueStore, LoadOutcome, NewEngineer,
    NewHoliday, NewSprint, NewTask, PlannerConfig, SeedData, SprintPatch, SprintStatus,
    SprintStore, TaskPatch, TaskStatus, WorkCalendar,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, debug};

type Store = SprintStore<Box<dyn KeyValueStore + Send + Sync>>;

const DEFAULT_UPCOMING: usize = 5;

/// Interactive sprint planning console
#[derive(Parser, Debug)]
#[command(name = "cli")]
#[command(about = "Sprint planning dashboard (interactive)", long_about = None)]
struct Args {
    /// Storage backend: memory, file or sqlite
    #[arg(long, env = "SPRINT_PLANNER_STORAGE")]
    storage: Option<BackendKind>,

    /// Directory (file backend) or database path (sqlite backend)
    #[arg(long, env = "SPRINT_PLANNER_DATA")]
    data: Option<PathBuf>,

    /// Key the snapshot is stored under
    #[arg(long, env = "SPRINT_PLANNER_KEY")]
    key: Option<String>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, env = "SPRINT_PLANNER_LOG", default_value = "warn")]
    log_level: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn planner_config(&self) -> PlannerConfig {
        PlannerConfig::resolve(self.storage, self.data.clone(), self.key.clone())
    }

    fn log_level(&self) -> Level {
        if self.verbose {
            return Level::DEBUG;
        }
        match self.log_level.to_ascii_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }
}

fn print_help() {
    println!(
        "Commands:
  help                                        Show this help
  show tasks|engineers|sprints|holidays       Show a collection
  stats                                       Dashboard headline numbers
  task add <sprint_id> <assignee> <points> <title...>
  task status <id> <todo|in_progress|completed|blocked>
  task advance <id>                           Move a task one workflow step
  task delete <id>
  filter <status|all> [assignee|all]          Show matching tasks
  engineer add <capacity> <available_days> <name> <role...>
  engineer update <id> <capacity> <available_days>
  engineer delete <id>
  sprint add <YYYY-MM-DD> <YYYY-MM-DD> <name...>
  sprint status <id> <planning|active|completed|blocked>
  sprint delete <id>
  holiday add <YYYY-MM-DD> <national|company|personal> <name...>
  holiday recurring <id> <true|false>
  holiday delete <id>
  holidays by-month                           Holidays grouped by month
  upcoming sprints|holidays [YYYY-MM-DD] [n]  Next items from a date (default today, 5)
  workdays <YYYY-MM-DD> <YYYY-MM-DD>          Weekdays in an inclusive range
  capacity                                    Team capacity overview
  day <YYYY-MM-DD>                            Sprints starting and holidays on a date
  reload                                      Re-read the persisted snapshot
  reset                                       Restore the seed data
  export json|csv [path]                      Write an export file
  quit|exit                                   Exit"
    );
}

fn parse_id(value: Option<&str>) -> Result<i32, String> {
    value
        .ok_or_else(|| "missing id".to_string())?
        .parse()
        .map_err(|_| "Invalid id".to_string())
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{value}' (YYYY-MM-DD)"))
}

fn rest_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(" ")
}

fn print_frame(frame: Result<polars::prelude::DataFrame, sprint_planner::PersistenceError>) {
    match frame {
        Ok(df) => println!("{}", render_text_table(&df)),
        Err(e) => println!("Error: {}", e),
    }
}

fn show(store: &Store, what: Option<&str>) -> Result<(), String> {
    match what {
        Some("tasks") => print_frame(tasks_frame(store, store.tasks())),
        Some("engineers") => print_frame(engineers_frame(store.engineers())),
        Some("sprints") => print_frame(sprints_frame(store.sprints())),
        Some("holidays") => print_frame(holidays_frame(sorted_by_date(store.holidays(), |h| {
            h.date
        }))),
        _ => return Err("Usage: show tasks|engineers|sprints|holidays".into()),
    }
    Ok(())
}

fn print_stats(store: &Store) {
    let stats = store.stats();
    println!(
        "Sprints: {} total, {} active | Engineers: {} | Planned capacity: {}%",
        stats.total_sprints, stats.active_sprints, stats.total_engineers, stats.planned_capacity
    );
    println!("Tasks: {}", store.task_stats().to_cli_summary());
}

fn task_command<'a>(store: &mut Store, mut parts: impl Iterator<Item = &'a str>) -> Result<(), String> {
    match parts.next() {
        Some("add") => {
            let usage = "Usage: task add <sprint_id> <assignee> <points> <title...>";
            let (Some(sprint_s), Some(assignee_s), Some(points_s)) =
                (parts.next(), parts.next(), parts.next())
            else {
                return Err(usage.into());
            };
            let sprint_id: i32 = sprint_s.parse().map_err(|_| "Invalid sprint id".to_string())?;
            let assignee: Assignee = assignee_s.parse()?;
            let points: u32 = points_s.parse().map_err(|_| "Invalid story points".to_string())?;
            let mut task = NewTask::new(rest_text(parts), assignee, sprint_id);
            task.story_points = points;
            let tasks = store.add_task(task).map_err(|e| e.to_string())?;
            if let Some(task) = tasks.last() {
                println!("Added task {}.", task.id);
            }
        }
        Some("status") => {
            let id = parse_id(parts.next())?;
            let status: TaskStatus = parts
                .next()
                .ok_or("Usage: task status <id> <status>")?
                .parse()?;
            if store.find_task(id).is_none() {
                return Err(format!("No task with id {id}."));
            }
            store
                .update_task(id, TaskPatch::status(status))
                .map_err(|e| e.to_string())?;
            println!("Task {id} is now {status}.");
        }
        Some("advance") => {
            let id = parse_id(parts.next())?;
            match store.advance_task(id).map_err(|e| e.to_string())? {
                Some(status) => println!("Task {id} is now {status}."),
                None if store.find_task(id).is_none() => {
                    return Err(format!("No task with id {id}."));
                }
                None => println!("Task {id} is already completed."),
            }
        }
        Some("delete") => {
            let id = parse_id(parts.next())?;
            if store.find_task(id).is_none() {
                return Err(format!("No task with id {id}."));
            }
            store.delete_task(id).map_err(|e| e.to_string())?;
            println!("Deleted task {id}.");
        }
        _ => return Err("Usage: task add|status|advance|delete ...".into()),
    }
    Ok(())
}

fn filter_command<'a>(store: &Store, mut parts: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let filter = TaskFilter {
        status: parts
            .next()
            .map(str::parse::<Filter<TaskStatus>>)
            .transpose()?
            .unwrap_or_default(),
        assignee: parts
            .next()
            .map(str::parse::<Filter<Assignee>>)
            .transpose()?
            .unwrap_or_default(),
    };
    let matching = filter_by(store.tasks(), &filter);
    println!("{} of {} tasks match.", matching.len(), store.tasks().len());
    print_frame(tasks_frame(store, matching));
    Ok(())
}

fn engineer_command<'a>(
    store: &mut Store,
    mut parts: impl Iterator<Item = &'a str>,
) -> Result<(), String> {
    match parts.next() {
        Some("add") => {
            let usage = "Usage: engineer add <capacity> <available_days> <name> <role...>";
            let (Some(capacity_s), Some(days_s), Some(name)) =
                (parts.next(), parts.next(), parts.next())
            else {
                return Err(usage.into());
            };
            let mut engineer = NewEngineer::new(name, rest_text(parts));
            engineer.capacity = capacity_s.parse().map_err(|_| "Invalid capacity".to_string())?;
            engineer.available_days = days_s
                .parse()
                .map_err(|_| "Invalid available days".to_string())?;
            let engineers = store.add_engineer(engineer).map_err(|e| e.to_string())?;
            if let Some(engineer) = engineers.last() {
                println!(
                    "Added engineer {} ({:.1} allocated days).",
                    engineer.id,
                    engineer.allocated_days()
                );
            }
        }
        Some("update") => {
            let id = parse_id(parts.next())?;
            let (Some(capacity_s), Some(days_s)) = (parts.next(), parts.next()) else {
                return Err("Usage: engineer update <id> <capacity> <available_days>".into());
            };
            if store.find_engineer(id).is_none() {
                return Err(format!("No engineer with id {id}."));
            }
            let patch = EngineerPatch {
                capacity: Some(capacity_s.parse().map_err(|_| "Invalid capacity".to_string())?),
                available_days: Some(
                    days_s
                        .parse()
                        .map_err(|_| "Invalid available days".to_string())?,
                ),
                ..EngineerPatch::default()
            };
            store.update_engineer(id, patch).map_err(|e| e.to_string())?;
            if let Some(engineer) = store.find_engineer(id) {
                println!(
                    "Engineer {id} updated ({:.1} allocated days).",
                    engineer.allocated_days()
                );
            }
        }
        Some("delete") => {
            let id = parse_id(parts.next())?;
            if store.find_engineer(id).is_none() {
                return Err(format!("No engineer with id {id}."));
            }
            store.delete_engineer(id).map_err(|e| e.to_string())?;
            println!("Deleted engineer {id}.");
        }
        _ => return Err("Usage: engineer add|update|delete ...".into()),
    }
    Ok(())
}

fn sprint_command<'a>(store: &mut Store, mut parts: impl Iterator<Item = &'a str>) -> Result<(), String> {
    match parts.next() {
        Some("add") => {
            let (Some(start_s), Some(end_s)) = (parts.next(), parts.next()) else {
                return Err("Usage: sprint add <YYYY-MM-DD> <YYYY-MM-DD> <name...>".into());
            };
            let sprint = NewSprint::new(rest_text(parts), parse_date(start_s)?, parse_date(end_s)?);
            let sprints = store.add_sprint(sprint).map_err(|e| e.to_string())?;
            if let Some(sprint) = sprints.last() {
                println!(
                    "Added sprint {} ({} working days).",
                    sprint.id,
                    sprint.working_days()
                );
            }
        }
        Some("status") => {
            let id = parse_id(parts.next())?;
            let status: SprintStatus = parts
                .next()
                .ok_or("Usage: sprint status <id> <status>")?
                .parse()?;
            if store.find_sprint(id).is_none() {
                return Err(format!("No sprint with id {id}."));
            }
            store
                .update_sprint(id, SprintPatch::status(status))
                .map_err(|e| e.to_string())?;
            println!("Sprint {id} is now {status}.");
        }
        Some("delete") => {
            let id = parse_id(parts.next())?;
            if store.find_sprint(id).is_none() {
                return Err(format!("No sprint with id {id}."));
            }
            store.delete_sprint(id).map_err(|e| e.to_string())?;
            println!("Deleted sprint {id}.");
        }
        _ => return Err("Usage: sprint add|status|delete ...".into()),
    }
    Ok(())
}

fn holiday_command<'a>(
    store: &mut Store,
    mut parts: impl Iterator<Item = &'a str>,
) -> Result<(), String> {
    match parts.next() {
        Some("add") => {
            let (Some(date_s), Some(type_s)) = (parts.next(), parts.next()) else {
                return Err("Usage: holiday add <YYYY-MM-DD> <type> <name...>".into());
            };
            let holiday_type: HolidayType = type_s.parse()?;
            let holiday = NewHoliday::new(rest_text(parts), parse_date(date_s)?, holiday_type);
            let holidays = store.add_holiday(holiday).map_err(|e| e.to_string())?;
            if let Some(holiday) = holidays.last() {
                println!("Added holiday {}.", holiday.id);
            }
        }
        Some("recurring") => {
            let id = parse_id(parts.next())?;
            let recurring = match parts.next().map(str::to_ascii_lowercase).as_deref() {
                Some("true") => true,
                Some("false") => false,
                _ => return Err("Invalid bool (true|false)".into()),
            };
            if store.find_holiday(id).is_none() {
                return Err(format!("No holiday with id {id}."));
            }
            let patch = HolidayPatch {
                recurring: Some(recurring),
                ..HolidayPatch::default()
            };
            store.update_holiday(id, patch).map_err(|e| e.to_string())?;
            println!("Holiday {id} recurring={recurring}.");
        }
        Some("delete") => {
            let id = parse_id(parts.next())?;
            if store.find_holiday(id).is_none() {
                return Err(format!("No holiday with id {id}."));
            }
            store.delete_holiday(id).map_err(|e| e.to_string())?;
            println!("Deleted holiday {id}.");
        }
        _ => return Err("Usage: holiday add|recurring|delete ...".into()),
    }
    Ok(())
}

fn holidays_by_month(store: &Store) {
    let sorted: Vec<_> = sorted_by_date(store.holidays(), |h| h.date)
        .into_iter()
        .cloned()
        .collect();
    for group in group_by_month(&sorted, |h| h.date) {
        println!("{} ({})", group.label, group.items.len());
        for holiday in group.items {
            let marker = if holiday.recurring { " (recurring)" } else { "" };
            println!(
                "  {} {} [{}]{}",
                holiday.date.format("%a %d"),
                holiday.name,
                holiday.holiday_type.label(),
                marker
            );
        }
    }
}

fn upcoming_command<'a>(store: &Store, mut parts: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let what = parts.next();
    let reference = match parts.next() {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let limit = match parts.next() {
        Some(s) => s.parse().map_err(|_| "Invalid count".to_string())?,
        None => DEFAULT_UPCOMING,
    };
    match what {
        Some("sprints") => {
            print_frame(sprints_frame(upcoming(
                store.sprints(),
                |s| s.start_date,
                reference,
                limit,
            )));
        }
        Some("holidays") => {
            print_frame(holidays_frame(upcoming(
                store.holidays(),
                |h| h.date,
                reference,
                limit,
            )));
        }
        _ => return Err("Usage: upcoming sprints|holidays [YYYY-MM-DD] [n]".into()),
    }
    Ok(())
}

fn workdays_command<'a>(store: &Store, mut parts: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let (Some(start_s), Some(end_s)) = (parts.next(), parts.next()) else {
        return Err("Usage: workdays <YYYY-MM-DD> <YYYY-MM-DD>".into());
    };
    let (start, end) = (parse_date(start_s)?, parse_date(end_s)?);
    let calendar = WorkCalendar::with_holidays(store.holidays());
    println!(
        "Working days: {} ({} after holidays)",
        working_days(start, end),
        calendar.count_working_days(start, end)
    );
    Ok(())
}

fn print_capacity(store: &Store) {
    print_frame(engineers_frame(store.engineers()));
    for engineer in store.engineers() {
        let level = match CapacityLevel::for_capacity(engineer.capacity) {
            CapacityLevel::Overloaded => "overloaded",
            CapacityLevel::High => "high",
            CapacityLevel::Healthy => "healthy",
        };
        println!("{}: {}% ({})", engineer.name, engineer.capacity, level);
    }
    let summary = capacity_summary(store.engineers());
    println!(
        "Average capacity: {:.0}% | Available: {:.1} days | Allocated: {:.1} days",
        summary.average_capacity, summary.total_available_days, summary.total_allocated_days
    );
}

fn day_command(store: &Store, date: Option<&str>) -> Result<(), String> {
    let date = parse_date(date.ok_or("Usage: day <YYYY-MM-DD>")?)?;
    let events = views::events_on(date, store.sprints(), store.holidays());
    if events.is_empty() {
        println!("Nothing scheduled on {date}.");
    }
    for sprint in &events.sprints_starting {
        println!("Sprint starts: {}", sprint.name);
    }
    for holiday in &events.holidays {
        println!("Holiday: {}", holiday.name);
    }
    Ok(())
}

fn export_command<'a>(store: &Store, mut parts: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let format = parts.next();
    let path = parts.next();
    match format {
        Some("json") => {
            let path = path.unwrap_or(DEFAULT_EXPORT_FILE);
            export_to_json(store, path).map_err(|e| e.to_string())?;
            println!("Exported to {path}.");
        }
        Some("csv") => {
            let path = path.unwrap_or("tasks.csv");
            export_tasks_to_csv(store, path).map_err(|e| e.to_string())?;
            println!("Exported tasks to {path}.");
        }
        _ => return Err("Usage: export json|csv [path]".into()),
    }
    Ok(())
}

/// Run one console line. Returns `false` when the session should end.
fn dispatch(store: &mut Store, input: &str) -> Result<bool, String> {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("");
    match cmd {
        "help" => print_help(),
        "quit" | "exit" => return Ok(false),
        "show" => show(store, parts.next())?,
        "stats" => print_stats(store),
        "task" => task_command(store, parts)?,
        "filter" => filter_command(store, parts)?,
        "engineer" => engineer_command(store, parts)?,
        "sprint" => sprint_command(store, parts)?,
        "holiday" => holiday_command(store, parts)?,
        "holidays" => match parts.next() {
            Some("by-month") => holidays_by_month(store),
            _ => return Err("Usage: holidays by-month".into()),
        },
        "upcoming" => upcoming_command(store, parts)?,
        "workdays" => workdays_command(store, parts)?,
        "capacity" => print_capacity(store),
        "day" => day_command(store, parts.next())?,
        "reload" => match store.load_from_storage().map_err(|e| e.to_string())? {
            LoadOutcome::Loaded => println!("Reloaded from storage."),
            LoadOutcome::Missing => println!("Nothing stored yet."),
        },
        "reset" => {
            store.reset_data().map_err(|e| e.to_string())?;
            println!("Data reset to defaults.");
        }
        "export" => export_command(store, parts)?,
        _ => println!("Unknown command. Type 'help'."),
    }
    Ok(true)
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(io::stderr)
        .init();

    let config = args.planner_config();
    debug!(?config, "starting console");
    let storage = match config.open_storage() {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("Cannot open storage: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let seed = match SeedData::bundled() {
        Ok(seed) => seed,
        Err(e) => {
            eprintln!("Bundled seed data is unreadable: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut store: Store = SprintStore::open_with_key(storage, config.storage_key, seed);

    println!("Sprint Planner (CLI) - type 'help' for commands\n");
    print_stats(&store);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match dispatch(&mut store, input) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("Error: {}", e),
        }
    }
    ExitCode::SUCCESS
}
