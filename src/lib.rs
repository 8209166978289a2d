pub mod calendar;
pub mod config;
pub mod engineer;
pub mod export;
pub mod holiday;
pub mod persistence;
pub mod shared;
pub mod sprint;
pub mod stats;
pub mod store;
pub mod table;
pub mod task;
pub mod validation;
pub mod views;

pub use calendar::{WorkCalendar, working_days};
pub use config::{PlannerConfig, StorageBackend};
pub use engineer::{Engineer, EngineerPatch, NewEngineer};
pub use holiday::{Holiday, HolidayPatch, HolidayType, NewHoliday};
pub use persistence::{KeyValueStore, PersistenceError, PersistenceResult, SeedData};
pub use shared::SharedStore;
pub use sprint::{NewSprint, Sprint, SprintPatch, SprintStatus};
pub use stats::{Stats, TaskStats};
pub use store::{IdCounters, LoadOutcome, STORAGE_KEY, SprintStore, StoreError, StoreResult};
pub use task::{Assignee, NewTask, Task, TaskPatch, TaskStatus};
pub use validation::ValidationError;
