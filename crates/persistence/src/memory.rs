//! In-memory [`EntityStore`] implementation.
//!
//! All tables sit behind one async `RwLock`, so a create observes and
//! updates ids and uniqueness state in a single critical section.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use domain::models::{
    DailyLog, Document, Event, Incident, NewDailyLog, NewDocument, NewEvent, NewIncident,
    NewResident, NewStaff, NewUser, Resident, Staff, User,
};

use crate::metrics::StoreTimer;
use crate::{EntityStore, StoreError};

/// Records in insertion order with an id index.
#[derive(Debug)]
struct Table<K, V> {
    rows: Vec<V>,
    index: HashMap<K, usize>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V: Clone> Table<K, V> {
    fn insert(&mut self, key: K, row: V) -> V {
        self.index.insert(key, self.rows.len());
        self.rows.push(row.clone());
        row
    }

    fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .get(key)
            .and_then(|&position| self.rows.get(position))
            .cloned()
    }

    fn find(&self, predicate: impl Fn(&V) -> bool) -> Option<V> {
        self.rows.iter().find(|row| predicate(row)).cloned()
    }

    fn list(&self) -> Vec<V> {
        self.rows.clone()
    }
}

/// Monotonic integer id source starting at 1.
#[derive(Debug, Default)]
struct Sequence {
    last: i32,
}

impl Sequence {
    fn next(&mut self) -> Result<i32, StoreError> {
        let next = self
            .last
            .checked_add(1)
            .ok_or_else(|| StoreError::Unavailable("Id sequence exhausted".to_string()))?;
        self.last = next;
        Ok(next)
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<i32, User>,
    residents: Table<i32, Resident>,
    staff: Table<i32, Staff>,
    daily_logs: Table<String, DailyLog>,
    incidents: Table<String, Incident>,
    events: Table<String, Event>,
    documents: Table<String, Document>,
    user_ids: Sequence,
    resident_ids: Sequence,
    staff_ids: Sequence,
}

fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn read<T>(&self, operation: &'static str, f: impl FnOnce(&Tables) -> T) -> T {
        let timer = StoreTimer::new(operation);
        let result = f(&*self.tables.read().await);
        timer.record();
        result
    }

    async fn write<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut Tables) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let timer = StoreTimer::new(operation);
        let result = f(&mut *self.tables.write().await);
        timer.record();
        if let Err(e) = &result {
            tracing::debug!(operation, error = %e, "Store write rejected");
        }
        result
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.write("create_user", |t| {
            if t.users
                .find(|u| u.username.eq_ignore_ascii_case(&user.username))
                .is_some()
            {
                return Err(StoreError::Conflict { field: "username" });
            }
            if t.users
                .find(|u| u.email.eq_ignore_ascii_case(&user.email))
                .is_some()
            {
                return Err(StoreError::Conflict { field: "email" });
            }

            let id = t.user_ids.next()?;
            let record = User {
                id,
                username: user.username,
                email: user.email,
                password_hash: user.password_hash,
                role: user.role,
                name: user.name,
                position: user.position,
                created_at: Utc::now(),
            };
            Ok(t.users.insert(id, record))
        })
        .await
    }

    async fn get_user(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.read("get_user", |t| t.users.get(&id)).await)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read("find_user_by_username", |t| {
                t.users.find(|u| u.username.eq_ignore_ascii_case(username))
            })
            .await)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read("find_user_by_email", |t| {
                t.users.find(|u| u.email.eq_ignore_ascii_case(email))
            })
            .await)
    }

    async fn create_resident(&self, resident: NewResident) -> Result<Resident, StoreError> {
        self.write("create_resident", |t| {
            let id = t.resident_ids.next()?;
            Ok(t.residents.insert(
                id,
                Resident {
                    id,
                    profile: resident,
                },
            ))
        })
        .await
    }

    async fn get_resident(&self, id: i32) -> Result<Option<Resident>, StoreError> {
        Ok(self.read("get_resident", |t| t.residents.get(&id)).await)
    }

    async fn list_residents(&self) -> Result<Vec<Resident>, StoreError> {
        Ok(self.read("list_residents", |t| t.residents.list()).await)
    }

    async fn create_staff(&self, staff: NewStaff) -> Result<Staff, StoreError> {
        self.write("create_staff", |t| {
            if t.staff
                .find(|s| s.details.email.eq_ignore_ascii_case(&staff.email))
                .is_some()
            {
                return Err(StoreError::Conflict { field: "email" });
            }

            let id = t.staff_ids.next()?;
            Ok(t.staff.insert(id, Staff { id, details: staff }))
        })
        .await
    }

    async fn get_staff(&self, id: i32) -> Result<Option<Staff>, StoreError> {
        Ok(self.read("get_staff", |t| t.staff.get(&id)).await)
    }

    async fn list_staff(&self) -> Result<Vec<Staff>, StoreError> {
        Ok(self.read("list_staff", |t| t.staff.list()).await)
    }

    async fn create_daily_log(&self, log: NewDailyLog) -> Result<DailyLog, StoreError> {
        self.write("create_daily_log", |t| {
            let id = new_uuid();
            let record = DailyLog {
                id: id.clone(),
                timestamp: Utc::now(),
                entry: log,
            };
            Ok(t.daily_logs.insert(id, record))
        })
        .await
    }

    async fn get_daily_log(&self, id: &str) -> Result<Option<DailyLog>, StoreError> {
        Ok(self.read("get_daily_log", |t| t.daily_logs.get(id)).await)
    }

    async fn list_daily_logs(&self) -> Result<Vec<DailyLog>, StoreError> {
        Ok(self.read("list_daily_logs", |t| t.daily_logs.list()).await)
    }

    async fn create_incident(&self, incident: NewIncident) -> Result<Incident, StoreError> {
        self.write("create_incident", |t| {
            let id = new_uuid();
            let record = Incident {
                id: id.clone(),
                timestamp: Utc::now(),
                report: incident,
            };
            Ok(t.incidents.insert(id, record))
        })
        .await
    }

    async fn get_incident(&self, id: &str) -> Result<Option<Incident>, StoreError> {
        Ok(self.read("get_incident", |t| t.incidents.get(id)).await)
    }

    async fn list_incidents(&self) -> Result<Vec<Incident>, StoreError> {
        Ok(self.read("list_incidents", |t| t.incidents.list()).await)
    }

    async fn create_event(&self, event: NewEvent) -> Result<Event, StoreError> {
        self.write("create_event", |t| {
            let id = new_uuid();
            let record = Event {
                id: id.clone(),
                details: event,
            };
            Ok(t.events.insert(id, record))
        })
        .await
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>, StoreError> {
        Ok(self.read("get_event", |t| t.events.get(id)).await)
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.read("list_events", |t| t.events.list()).await)
    }

    async fn create_document(&self, document: NewDocument) -> Result<Document, StoreError> {
        self.write("create_document", |t| {
            let id = new_uuid();
            let record = Document {
                id: id.clone(),
                upload_date: Utc::now(),
                file: document,
            };
            Ok(t.documents.insert(id, record))
        })
        .await
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.read("get_document", |t| t.documents.get(id)).await)
    }

    async fn list_documents(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.read("list_documents", |t| t.documents.list()).await)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read("ping", |_| ()).await;
        Ok(())
    }
}
