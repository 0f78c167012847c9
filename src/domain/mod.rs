pub mod catalog;
pub mod enums;
pub mod task;
pub mod values;

pub use catalog::{
    weekday_number, Category, DaySet, DayType, GoalTracker, RecurringSubtaskTemplate,
    RecurringTaskTemplate, TrackerLink, ALL_CATEGORIES, UNCATEGORIZED,
};
pub use enums::{TimeView, TrackerType};
pub use task::{new_id, DailyLog, Progress, Subtask, Task};
pub use values::{DailyLogs, StatsLog, TrackerValue, GLOBAL_COMPLETION};
