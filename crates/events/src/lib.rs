//! Event catalog backed by the external document store.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod event;

pub use error::Error;
pub use event::{EventFilter, EventRecord, EventStatus, EventUpdate, Instructor, NewEvent};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use exp3_store::{Collection, DocumentStore};
use tracing::{debug, error, info};
use uuid::Uuid;

/// Collection holding event records.
pub const EVENTS_COLLECTION: &str = "events";

/// Options for creating a new `EventManager`.
pub struct EventManagerOptions<S>
where
    S: DocumentStore,
{
    /// The document store holding the events collection.
    pub store: S,
}

/// Trait for managing the event catalog.
#[async_trait]
pub trait EventManagement
where
    Self: Clone + Send + Sync + 'static,
{
    /// Document store type.
    type Store: DocumentStore;

    /// Creates a new instance of the event manager.
    fn new(options: EventManagerOptions<Self::Store>) -> Self;

    /// Creates an event and returns its ID.
    async fn create_event(&self, event: NewEvent) -> Result<String, Error>;

    /// Gets an event by ID.
    async fn get_event(&self, event_id: &str) -> Result<EventRecord, Error>;

    /// Lists events, optionally filtered.
    async fn list_events(&self, filter: Option<&EventFilter>) -> Result<Vec<EventRecord>, Error>;

    /// Applies a partial update to an event and returns the updated record.
    async fn update_event(&self, event_id: &str, update: EventUpdate)
    -> Result<EventRecord, Error>;

    /// Adds a user to an event's registered users.
    ///
    /// Rejects duplicates and full events without writing anything.
    async fn register_user(&self, event_id: &str, user_id: &str) -> Result<(), Error>;

    /// Removes a user from an event's registered users.
    async fn unregister_user(&self, event_id: &str, user_id: &str) -> Result<(), Error>;

    /// Lists every event the user is registered for.
    async fn list_events_for_user(&self, user_id: &str) -> Result<Vec<EventRecord>, Error>;
}

/// Manages the event catalog.
///
/// Registration is read-check-then-write with no revision guard, so two
/// concurrent registrations for the last place can both succeed.
#[derive(Clone, Debug)]
pub struct EventManager<S>
where
    S: DocumentStore,
{
    events: S::Collection,
}

impl<S> EventManager<S>
where
    S: DocumentStore,
{
    async fn load(&self, event_id: &str) -> Result<Option<EventRecord>, Error> {
        let bytes = self.events.get(event_id).await.map_err(|e| {
            error!(event_id, "failed to read event: {e}");
            Error::Store(e.to_string())
        })?;

        bytes
            .map(|bytes| EventRecord::try_from(bytes).map_err(|e| Error::Codec(e.to_string())))
            .transpose()
    }

    async fn load_existing(&self, event_id: &str) -> Result<EventRecord, Error> {
        self.load(event_id)
            .await?
            .ok_or_else(|| Error::NotFound(event_id.to_string()))
    }

    async fn save(&self, record: EventRecord) -> Result<(), Error> {
        let event_id = record.id.clone();
        let bytes: Bytes = record
            .try_into()
            .map_err(|e: ciborium::ser::Error<std::io::Error>| Error::Codec(e.to_string()))?;

        self.events.put(event_id.clone(), bytes).await.map_err(|e| {
            error!(%event_id, "failed to write event: {e}");
            Error::Store(e.to_string())
        })
    }

    async fn load_all(&self) -> Result<Vec<EventRecord>, Error> {
        let ids = self
            .events
            .ids()
            .await
            .map_err(|e| Error::Store(e.to_string()))?;

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.load(&id).await? {
                records.push(record);
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl<S> EventManagement for EventManager<S>
where
    S: DocumentStore,
{
    type Store = S;

    fn new(EventManagerOptions { store }: EventManagerOptions<S>) -> Self {
        Self {
            events: store.collection(EVENTS_COLLECTION),
        }
    }

    async fn create_event(&self, event: NewEvent) -> Result<String, Error> {
        let event_id = match event.id.clone() {
            Some(id) => {
                if self.load(&id).await?.is_some() {
                    return Err(Error::AlreadyExists(id));
                }
                id
            }
            None => Uuid::new_v4().to_string(),
        };

        let record = event.into_record(event_id.clone(), Utc::now());
        self.save(record).await?;

        info!(%event_id, "created event");
        Ok(event_id)
    }

    async fn get_event(&self, event_id: &str) -> Result<EventRecord, Error> {
        self.load_existing(event_id).await
    }

    async fn list_events(&self, filter: Option<&EventFilter>) -> Result<Vec<EventRecord>, Error> {
        let records = self.load_all().await?;

        Ok(match filter {
            Some(filter) => records
                .into_iter()
                .filter(|record| filter.matches(record))
                .collect(),
            None => records,
        })
    }

    async fn update_event(
        &self,
        event_id: &str,
        update: EventUpdate,
    ) -> Result<EventRecord, Error> {
        let mut record = self.load_existing(event_id).await?;
        update.apply(&mut record);
        record.updated_at = Utc::now();

        self.save(record.clone()).await?;

        debug!(event_id, "updated event");
        Ok(record)
    }

    async fn register_user(&self, event_id: &str, user_id: &str) -> Result<(), Error> {
        let mut record = self.load_existing(event_id).await?;

        if record.is_registered(user_id) {
            return Err(Error::AlreadyRegistered);
        }

        if record.is_full() {
            info!(event_id, user_id, "rejected registration: event is full");
            return Err(Error::Full);
        }

        record.registered_users.push(user_id.to_string());
        record.updated_at = Utc::now();
        self.save(record).await?;

        info!(event_id, user_id, "registered user for event");
        Ok(())
    }

    async fn unregister_user(&self, event_id: &str, user_id: &str) -> Result<(), Error> {
        let mut record = self.load_existing(event_id).await?;

        if !record.is_registered(user_id) {
            return Err(Error::NotRegistered);
        }

        record.registered_users.retain(|id| id != user_id);
        record.updated_at = Utc::now();
        self.save(record).await?;

        info!(event_id, user_id, "cancelled registration");
        Ok(())
    }

    async fn list_events_for_user(&self, user_id: &str) -> Result<Vec<EventRecord>, Error> {
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .filter(|record| record.is_registered(user_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use exp3_store_memory::MemoryStore;

    fn manager(store: &MemoryStore) -> EventManager<MemoryStore> {
        EventManager::new(EventManagerOptions {
            store: store.clone(),
        })
    }

    fn workshop(limit: u32) -> NewEvent {
        NewEvent {
            id: Some("ai-ux-workshop".to_string()),
            title: "AI-Powered UX Design Workshop".to_string(),
            date: "March 15, 2024".to_string(),
            time: "10:00 AM - 4:00 PM EST".to_string(),
            tags: vec!["AI".to_string(), "UX".to_string()],
            price: Some(100),
            xp: Some(500),
            attendee_limit: limit,
            requires_auth: true,
            status: EventStatus::Published,
            ..NewEvent::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryStore::new();
        let events = manager(&store);

        let id = events.create_event(workshop(10)).await.unwrap();
        let record = events.get_event(&id).await.unwrap();

        assert_eq!(id, "ai-ux-workshop");
        assert_eq!(record.title, "AI-Powered UX Design Workshop");
        assert!(record.registered_users.is_empty());
        assert_eq!(record.created_at, record.updated_at);
    }

    #[tokio::test]
    async fn test_create_assigns_random_id() {
        let store = MemoryStore::new();
        let events = manager(&store);

        let id = events
            .create_event(NewEvent {
                title: "Untitled".to_string(),
                ..NewEvent::default()
            })
            .await
            .unwrap();

        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn test_create_rejects_existing_id() {
        let store = MemoryStore::new();
        let events = manager(&store);

        events.create_event(workshop(10)).await.unwrap();

        assert_eq!(
            events.create_event(workshop(10)).await,
            Err(Error::AlreadyExists("ai-ux-workshop".to_string()))
        );
    }

    #[tokio::test]
    async fn test_get_missing_event() {
        let store = MemoryStore::new();
        let events = manager(&store);

        let result = events.get_event("nope").await;

        assert_eq!(result, Err(Error::NotFound("nope".to_string())));
        assert_eq!(result.unwrap_err().to_string(), "Event not found");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_without_writing() {
        let store = MemoryStore::new();
        let events = manager(&store);
        events.create_event(workshop(10)).await.unwrap();

        events.register_user("ai-ux-workshop", "ada").await.unwrap();
        let before = events.get_event("ai-ux-workshop").await.unwrap();

        assert_eq!(
            events.register_user("ai-ux-workshop", "ada").await,
            Err(Error::AlreadyRegistered)
        );
        assert_eq!(events.get_event("ai-ux-workshop").await.unwrap(), before);
        assert_eq!(before.registered_users, vec!["ada".to_string()]);
    }

    #[tokio::test]
    async fn test_register_rejects_full_event_without_writing() {
        let store = MemoryStore::new();
        let events = manager(&store);
        events.create_event(workshop(2)).await.unwrap();

        events.register_user("ai-ux-workshop", "ada").await.unwrap();
        events.register_user("ai-ux-workshop", "grace").await.unwrap();

        let result = events.register_user("ai-ux-workshop", "linus").await;

        assert_eq!(result, Err(Error::Full));
        assert_eq!(result.unwrap_err().to_string(), "Event is full");
        assert_eq!(
            events
                .get_event("ai-ux-workshop")
                .await
                .unwrap()
                .registered_users,
            vec!["ada".to_string(), "grace".to_string()]
        );
    }

    #[tokio::test]
    async fn test_zero_limit_rejects_everyone() {
        let store = MemoryStore::new();
        let events = manager(&store);
        events.create_event(workshop(0)).await.unwrap();

        assert_eq!(
            events.register_user("ai-ux-workshop", "ada").await,
            Err(Error::Full)
        );
    }

    #[tokio::test]
    async fn test_duplicate_check_precedes_capacity_check() {
        let store = MemoryStore::new();
        let events = manager(&store);
        events.create_event(workshop(1)).await.unwrap();
        events.register_user("ai-ux-workshop", "ada").await.unwrap();

        assert_eq!(
            events.register_user("ai-ux-workshop", "ada").await,
            Err(Error::AlreadyRegistered)
        );
    }

    #[tokio::test]
    async fn test_register_missing_event() {
        let store = MemoryStore::new();
        let events = manager(&store);

        assert_eq!(
            events.register_user("nope", "ada").await,
            Err(Error::NotFound("nope".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unregister() {
        let store = MemoryStore::new();
        let events = manager(&store);
        events.create_event(workshop(10)).await.unwrap();

        assert_eq!(
            events.unregister_user("ai-ux-workshop", "ada").await,
            Err(Error::NotRegistered)
        );

        events.register_user("ai-ux-workshop", "ada").await.unwrap();
        events.unregister_user("ai-ux-workshop", "ada").await.unwrap();

        assert!(
            events
                .get_event("ai-ux-workshop")
                .await
                .unwrap()
                .registered_users
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_list_with_filters() {
        let store = MemoryStore::new();
        let events = manager(&store);
        events.create_event(workshop(10)).await.unwrap();
        events
            .create_event(NewEvent {
                id: Some("draft-event".to_string()),
                tags: vec!["Web3".to_string()],
                ..NewEvent::default()
            })
            .await
            .unwrap();
        events
            .create_event(NewEvent {
                id: Some("ux-3toryu".to_string()),
                tags: vec!["Web3".to_string(), "UX".to_string()],
                status: EventStatus::Published,
                instructor: Some(Instructor {
                    id: "inst-1".to_string(),
                    name: "Toryu".to_string(),
                    role: "Designer".to_string(),
                    avatar: String::new(),
                    bio: String::new(),
                }),
                ..NewEvent::default()
            })
            .await
            .unwrap();

        assert_eq!(events.list_events(None).await.unwrap().len(), 3);

        let published = events
            .list_events(Some(&EventFilter::published()))
            .await
            .unwrap();
        assert_eq!(published.len(), 2);

        let web3 = events
            .list_events(Some(&EventFilter {
                tags: vec!["Web3".to_string()],
                ..EventFilter::default()
            }))
            .await
            .unwrap();
        assert_eq!(web3.len(), 1);
        assert_eq!(web3[0].id, "ux-3toryu");

        let drafts = events
            .list_events(Some(&EventFilter {
                status: Some(EventStatus::Draft),
                ..EventFilter::default()
            }))
            .await
            .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, "draft-event");

        let by_instructor = events
            .list_events(Some(&EventFilter {
                instructor_id: Some("inst-1".to_string()),
                ..EventFilter::default()
            }))
            .await
            .unwrap();
        assert_eq!(by_instructor.len(), 1);
    }

    #[tokio::test]
    async fn test_update_event() {
        let store = MemoryStore::new();
        let events = manager(&store);
        events.create_event(workshop(10)).await.unwrap();

        let updated = events
            .update_event(
                "ai-ux-workshop",
                EventUpdate {
                    title: Some("Renamed".to_string()),
                    price: Some(None),
                    ..EventUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.price, None);
        assert_eq!(updated.xp, Some(500));
        assert!(updated.updated_at >= updated.created_at);
        assert_eq!(events.get_event("ai-ux-workshop").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_event() {
        let store = MemoryStore::new();
        let events = manager(&store);

        assert_eq!(
            events
                .update_event("nope", EventUpdate::default())
                .await
                .unwrap_err(),
            Error::NotFound("nope".to_string())
        );
    }

    #[tokio::test]
    async fn test_list_events_for_user() {
        let store = MemoryStore::new();
        let events = manager(&store);
        events.create_event(workshop(10)).await.unwrap();
        events
            .create_event(NewEvent {
                id: Some("other".to_string()),
                attendee_limit: 10,
                ..NewEvent::default()
            })
            .await
            .unwrap();

        events.register_user("other", "ada").await.unwrap();

        let mine = events.list_events_for_user("ada").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "other");
        assert!(events.list_events_for_user("grace").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let store = MemoryStore::new();
        let events = manager(&store);
        events.create_event(workshop(10)).await.unwrap();

        store.set_unavailable(true);

        assert!(matches!(
            events.register_user("ai-ux-workshop", "ada").await,
            Err(Error::Store(_))
        ));

        store.set_unavailable(false);
        assert!(
            events
                .get_event("ai-ux-workshop")
                .await
                .unwrap()
                .registered_users
                .is_empty()
        );
    }

    #[test]
    fn test_record_helpers() {
        let mut record = workshop(1).into_record("id".to_string(), Utc::now());

        assert!(record.is_paid());
        assert_eq!(record.spots_left(), 1);
        assert_eq!(record.detail_path(), "/events/id");

        record.registered_users.push("ada".to_string());
        assert!(record.is_full());
        assert_eq!(record.spots_left(), 0);

        record.price = Some(0);
        assert!(!record.is_paid());
    }

    #[test]
    fn test_record_survives_cbor() {
        let record = workshop(5).into_record("id".to_string(), Utc::now());
        let bytes: Bytes = record.clone().try_into().unwrap();

        assert_eq!(EventRecord::try_from(bytes).unwrap(), record);
    }
}
