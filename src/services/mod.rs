pub mod database;
pub mod notification;
pub mod record;
pub mod reminder;
pub mod settings;
pub mod status;
pub mod tracker;
