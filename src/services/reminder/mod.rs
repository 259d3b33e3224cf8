//! Reminder scheduling: planning, storage and dispatch.

pub mod dispatcher;
pub mod planner;
pub mod sqlite_store;
pub mod store;

pub use dispatcher::{ReminderDispatcher, ReminderNotifier};
pub use planner::ReminderPlanner;
pub use sqlite_store::SqliteReminderStore;
pub use store::{InMemoryReminderStore, ReminderStore};
