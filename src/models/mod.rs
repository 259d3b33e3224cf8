// Module exports for models

pub mod record;
pub mod reminder;
pub mod settings;
pub mod status;
