//! License record repository.
//! The `RecordRepository` trait is the boundary the tracker depends on;
//! `RecordService` implements it over the SQLite `licenses` table.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::record::{Record, RecordId};

pub mod crud;
pub mod queries;
mod shared;

/// Persistence boundary for license records.
///
/// Mutations addressing a missing id fail with
/// [`LicenseError::RecordNotFound`](crate::error::LicenseError::RecordNotFound).
pub trait RecordRepository {
    fn insert(&self, record: &Record) -> Result<RecordId>;
    fn update(&self, record: &Record) -> Result<()>;
    fn delete(&self, id: RecordId) -> Result<()>;
    fn get_by_id(&self, id: RecordId) -> Result<Option<Record>>;
    /// Every record, soonest expiry first.
    fn get_all(&self) -> Result<Vec<Record>>;
    fn search(&self, query: &str) -> Result<Vec<Record>>;
}

/// Service for managing license records stored in SQLite.
pub struct RecordService<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> RecordService<'a> {
    /// Create a new RecordService with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> RecordRepository for RecordService<'a> {
    fn insert(&self, record: &Record) -> Result<RecordId> {
        let created = self.create(record.clone())?;
        Ok(created.require_id()?)
    }

    fn update(&self, record: &Record) -> Result<()> {
        RecordService::update(self, record)
    }

    fn delete(&self, id: RecordId) -> Result<()> {
        RecordService::delete(self, id)
    }

    fn get_by_id(&self, id: RecordId) -> Result<Option<Record>> {
        self.get(id)
    }

    fn get_all(&self) -> Result<Vec<Record>> {
        self.list_all()
    }

    fn search(&self, query: &str) -> Result<Vec<Record>> {
        RecordService::search(self, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LicenseError;
    use crate::services::database::Database;

    fn setup_test_db() -> Database {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        db
    }

    fn sample_record() -> Record {
        Record::new("Alice Smith", "Forklift", "2025-06-01")
            .unwrap()
            .with_description("Warehouse B")
    }

    #[test]
    fn test_create_record() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        let created = service.create(sample_record()).unwrap();

        assert!(created.id.is_some());
        assert_eq!(created.name, "Alice Smith");
        assert!(created.created_at.is_some());
        assert!(created.updated_at.is_some());
    }

    #[test]
    fn test_create_trims_name_and_type() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        let record = Record::new("  Bob  ", " First Aid ", "2025-06-01").unwrap();
        let created = service.create(record).unwrap();
        let stored = service.get(created.id.unwrap()).unwrap().unwrap();

        assert_eq!(stored.name, "Bob");
        assert_eq!(stored.license_type, "First Aid");
    }

    #[test]
    fn test_create_rejects_invalid_record() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        let mut record = sample_record();
        record.expiry_date = "01/06/2025".to_string();

        let err = service.create(record).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LicenseError>(),
            Some(&LicenseError::InvalidDateFormat("01/06/2025".to_string()))
        );
    }

    #[test]
    fn test_get_record() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        let created = service.create(sample_record()).unwrap();
        let found = service.get(created.id.unwrap()).unwrap().unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.expiry_date, "2025-06-01");
        assert_eq!(found.description, "Warehouse B");
    }

    #[test]
    fn test_get_nonexistent_record() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        assert!(service.get(RecordId(999)).unwrap().is_none());
    }

    #[test]
    fn test_update_record() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        let mut record = service.create(sample_record()).unwrap();
        record.name = "Alice Jones".to_string();
        record.expiry_date = "2026-06-01".to_string();
        service.update(&record).unwrap();

        let updated = service.get(record.id.unwrap()).unwrap().unwrap();
        assert_eq!(updated.name, "Alice Jones");
        assert_eq!(updated.expiry_date, "2026-06-01");
    }

    #[test]
    fn test_update_nonexistent_record() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        let mut record = sample_record();
        record.id = Some(RecordId(999));

        let err = service.update(&record).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LicenseError>(),
            Some(&LicenseError::RecordNotFound(RecordId(999)))
        );
    }

    #[test]
    fn test_update_unsaved_record() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        let err = service.update(&sample_record()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LicenseError>(),
            Some(&LicenseError::UnsavedRecord)
        );
    }

    #[test]
    fn test_delete_record() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        let created = service.create(sample_record()).unwrap();
        let id = created.id.unwrap();

        service.delete(id).unwrap();
        assert!(service.get(id).unwrap().is_none());
    }

    #[test]
    fn test_delete_nonexistent_record() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        let err = service.delete(RecordId(999)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LicenseError>(),
            Some(&LicenseError::RecordNotFound(RecordId(999)))
        );
    }

    #[test]
    fn test_list_all_orders_by_expiry() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        service
            .create(Record::new("Late", "Crane", "2027-01-01").unwrap())
            .unwrap();
        service
            .create(Record::new("Early", "Crane", "2025-01-01").unwrap())
            .unwrap();
        service
            .create(Record::new("Middle", "Crane", "2026-01-01").unwrap())
            .unwrap();

        let names: Vec<_> = service
            .list_all()
            .unwrap()
            .into_iter()
            .map(|record| record.name)
            .collect();
        assert_eq!(names, vec!["Early", "Middle", "Late"]);
    }

    #[test]
    fn test_list_all_loads_legacy_row_with_invalid_date() {
        let db = setup_test_db();
        db.connection()
            .execute(
                "INSERT INTO licenses (name, license_type, expiry_date, description)
                 VALUES ('Legacy', 'Boat', 'next spring', NULL)",
                [],
            )
            .unwrap();
        let service = RecordService::new(db.connection());

        let records = service.list_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].expiry_date, "next spring");
        assert_eq!(records[0].description, "");
        assert!(records[0].created_at.is_none());
        assert!(records[0].expiry().is_err());
    }

    #[test]
    fn test_search_matches_name_or_type() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        service
            .create(Record::new("Alice", "Forklift", "2025-06-01").unwrap())
            .unwrap();
        service
            .create(Record::new("Bob", "First Aid", "2025-07-01").unwrap())
            .unwrap();
        service
            .create(Record::new("Carol Forks", "Crane", "2025-08-01").unwrap())
            .unwrap();

        let by_type = service.search("first").unwrap();
        assert_eq!(by_type.len(), 1);
        assert_eq!(by_type[0].name, "Bob");

        let by_either: Vec<_> = service
            .search("FORK")
            .unwrap()
            .into_iter()
            .map(|record| record.name)
            .collect();
        assert_eq!(by_either, vec!["Alice", "Carol Forks"]);
    }

    #[test]
    fn test_blank_search_returns_everything() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        service.create(sample_record()).unwrap();
        service
            .create(Record::new("Bob", "Crane", "2025-07-01").unwrap())
            .unwrap();

        assert_eq!(service.search("   ").unwrap().len(), 2);
    }

    #[test]
    fn test_search_folds_non_ascii_case() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        service
            .create(Record::new("Élodie Durand", "Grúa", "2025-06-01").unwrap())
            .unwrap();

        for query in ["Élodie", "élodie", "ÉLODIE", "GRÚA"] {
            let found = service.search(query).unwrap();
            assert_eq!(found.len(), 1, "query {:?}", query);
            assert_eq!(found[0].name, "Élodie Durand");
        }
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let db = setup_test_db();
        let service = RecordService::new(db.connection());

        service
            .create(Record::new("Alice", "Forklift", "2025-06-01").unwrap())
            .unwrap();
        service
            .create(Record::new("100% Safe", "Crane", "2025-07-01").unwrap())
            .unwrap();

        assert!(service.search("a_i").unwrap().is_empty());
        assert!(service.search("\\").unwrap().is_empty());

        let percent = service.search("%").unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].name, "100% Safe");
    }

    #[test]
    fn test_repository_trait_roundtrip() {
        let db = setup_test_db();
        let repo: &dyn RecordRepository = &RecordService::new(db.connection());

        let id = repo.insert(&sample_record()).unwrap();
        let stored = repo.get_by_id(id).unwrap().unwrap();
        assert_eq!(stored.name, "Alice Smith");
        assert_eq!(repo.get_all().unwrap().len(), 1);

        repo.delete(id).unwrap();
        assert!(repo.get_all().unwrap().is_empty());
    }
}
