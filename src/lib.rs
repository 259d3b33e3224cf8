// License Keeper Library
// Expiry status and reminder scheduling for time-bound license records

pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::LicenseError;
