// Purpose: generation run - parameters, key changes and the scheduling loop

pub mod key_change;
pub mod params;
pub mod scheduler;

pub use key_change::KeyChangeRule;
pub use params::{SessionParams, MAX_SESSION_NOTES};
pub use scheduler::{schedule, schedule_with, KeyChange, ScheduledNote, SchedulerState, Session};
