// Test fixtures - reusable test data
// Shared dates and records for the integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use license_keeper::models::record::Record;
use license_keeper::services::database::Database;

/// Calendar days used across the scenarios
pub mod dates {
    use super::*;

    pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Common expiry date in the scenarios
    pub fn june_1_2025() -> NaiveDate {
        ymd(2025, 6, 1)
    }

    /// Exactly one week before June 1st
    pub fn may_25_2025() -> NaiveDate {
        ymd(2025, 5, 25)
    }

    /// Far enough ahead that every lead time is still in the future
    pub fn march_1_2025() -> NaiveDate {
        ymd(2025, 3, 1)
    }

    pub fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }
}

/// Sample license records
pub mod records {
    use super::*;

    pub fn forklift(expiry: &str) -> Record {
        Record::new("Alice Smith", "Forklift", expiry)
            .unwrap()
            .with_description("Warehouse B")
    }

    pub fn crane(expiry: &str) -> Record {
        Record::new("Bob Jones", "Crane Operator", expiry).unwrap()
    }
}

pub fn memory_db() -> Database {
    let db = Database::new(":memory:").expect("Failed to create database");
    db.initialize_schema().expect("Failed to initialize schema");
    db
}
