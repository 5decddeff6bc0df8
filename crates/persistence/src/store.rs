//! The storage port.

use async_trait::async_trait;
use domain::models::{
    DailyLog, Document, Event, Incident, NewDailyLog, NewDocument, NewEvent, NewIncident,
    NewResident, NewStaff, NewUser, Resident, Staff, User,
};

use crate::StoreError;

/// Create and read access to every entity collection.
///
/// `create_*` assigns ids (and creation timestamps where the entity has
/// one) and returns the stored record. `get_*` returns `Ok(None)` for an
/// unknown id. `list_*` returns records in insertion order.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // Users

    /// Fails with `Conflict` when the username (ignoring case) or email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn get_user(&self, id: i32) -> Result<Option<User>, StoreError>;
    /// Case-insensitive lookup.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    // Residents

    async fn create_resident(&self, resident: NewResident) -> Result<Resident, StoreError>;
    async fn get_resident(&self, id: i32) -> Result<Option<Resident>, StoreError>;
    async fn list_residents(&self) -> Result<Vec<Resident>, StoreError>;

    // Staff

    /// Fails with `Conflict` when the email is already used by another staff record.
    async fn create_staff(&self, staff: NewStaff) -> Result<Staff, StoreError>;
    async fn get_staff(&self, id: i32) -> Result<Option<Staff>, StoreError>;
    async fn list_staff(&self) -> Result<Vec<Staff>, StoreError>;

    // Daily logs

    async fn create_daily_log(&self, log: NewDailyLog) -> Result<DailyLog, StoreError>;
    async fn get_daily_log(&self, id: &str) -> Result<Option<DailyLog>, StoreError>;
    async fn list_daily_logs(&self) -> Result<Vec<DailyLog>, StoreError>;

    // Incidents

    async fn create_incident(&self, incident: NewIncident) -> Result<Incident, StoreError>;
    async fn get_incident(&self, id: &str) -> Result<Option<Incident>, StoreError>;
    async fn list_incidents(&self) -> Result<Vec<Incident>, StoreError>;

    // Events

    async fn create_event(&self, event: NewEvent) -> Result<Event, StoreError>;
    async fn get_event(&self, id: &str) -> Result<Option<Event>, StoreError>;
    async fn list_events(&self) -> Result<Vec<Event>, StoreError>;

    // Documents

    async fn create_document(&self, document: NewDocument) -> Result<Document, StoreError>;
    async fn get_document(&self, id: &str) -> Result<Option<Document>, StoreError>;
    async fn list_documents(&self) -> Result<Vec<Document>, StoreError>;

    /// Checks that the backend can serve requests.
    async fn ping(&self) -> Result<(), StoreError>;
}
