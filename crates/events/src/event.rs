use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Publication status of an event.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Not yet visible.
    #[default]
    Draft,

    /// Listed publicly.
    Published,

    /// Called off.
    Cancelled,

    /// Already took place.
    Completed,
}

/// The person running an event.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Instructor {
    /// Instructor ID.
    pub id: String,

    /// Full name.
    pub name: String,

    /// Job title or role.
    pub role: String,

    /// Avatar image URL.
    pub avatar: String,

    /// Short biography.
    pub bio: String,
}

/// A stored event.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct EventRecord {
    /// Unique event ID.
    pub id: String,

    /// Title shown on cards and the detail page.
    pub title: String,

    /// Display date, e.g. "March 15, 2024".
    pub date: String,

    /// Display time, e.g. "10:00 AM - 4:00 PM EST".
    pub time: String,

    /// Delivery format, e.g. "Online" or "In person".
    pub format: String,

    /// Venue, for in-person events.
    pub location: Option<String>,

    /// Long description.
    pub description: String,

    /// Cover image URL.
    pub image_url: String,

    /// Price in EX3 credits. `None` or zero means free.
    pub price: Option<u32>,

    /// Experience points awarded for attending.
    pub xp: Option<u32>,

    /// Maximum number of registered users.
    pub attendee_limit: u32,

    /// Topic tags.
    pub tags: Vec<String>,

    /// Skills taught.
    pub skills: Vec<String>,

    /// Prerequisites.
    pub requirements: Vec<String>,

    /// Who runs the event.
    pub instructor: Option<Instructor>,

    /// Registration happens on this external page instead of in-app.
    pub external_link: Option<Url>,

    /// Link to join once registered.
    pub meeting_link: Option<Url>,

    /// Whether a signed-in session is needed before registering.
    pub requires_auth: bool,

    /// IDs of registered users, in registration order.
    pub registered_users: Vec<String>,

    /// Publication status.
    pub status: EventStatus,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl EventRecord {
    /// True if the event charges a nonzero price.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.price.is_some_and(|price| price > 0)
    }

    /// True if `user_id` is in the registered users.
    #[must_use]
    pub fn is_registered(&self, user_id: &str) -> bool {
        self.registered_users.iter().any(|id| id == user_id)
    }

    /// True if the registered users have reached the attendee limit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.registered_users.len() >= self.attendee_limit as usize
    }

    /// Remaining places before the attendee limit.
    #[must_use]
    pub fn spots_left(&self) -> usize {
        (self.attendee_limit as usize).saturating_sub(self.registered_users.len())
    }

    /// Path of the event's detail page.
    #[must_use]
    pub fn detail_path(&self) -> String {
        format!("/events/{}", self.id)
    }
}

impl TryFrom<Bytes> for EventRecord {
    type Error = ciborium::de::Error<std::io::Error>;

    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        ciborium::de::from_reader(bytes.as_ref())
    }
}

impl TryInto<Bytes> for EventRecord {
    type Error = ciborium::ser::Error<std::io::Error>;

    fn try_into(self) -> Result<Bytes, Self::Error> {
        let mut writer = Vec::new();
        ciborium::ser::into_writer(&self, &mut writer)?;
        Ok(Bytes::from(writer))
    }
}

/// Input for creating an event. Timestamps and registered users are
/// assigned by the manager.
#[derive(Clone, Debug, Default)]
pub struct NewEvent {
    /// Fixed ID to use. A random one is assigned when `None`.
    pub id: Option<String>,

    /// See [`EventRecord::title`].
    pub title: String,

    /// See [`EventRecord::date`].
    pub date: String,

    /// See [`EventRecord::time`].
    pub time: String,

    /// See [`EventRecord::format`].
    pub format: String,

    /// See [`EventRecord::location`].
    pub location: Option<String>,

    /// See [`EventRecord::description`].
    pub description: String,

    /// See [`EventRecord::image_url`].
    pub image_url: String,

    /// See [`EventRecord::price`].
    pub price: Option<u32>,

    /// See [`EventRecord::xp`].
    pub xp: Option<u32>,

    /// See [`EventRecord::attendee_limit`].
    pub attendee_limit: u32,

    /// See [`EventRecord::tags`].
    pub tags: Vec<String>,

    /// See [`EventRecord::skills`].
    pub skills: Vec<String>,

    /// See [`EventRecord::requirements`].
    pub requirements: Vec<String>,

    /// See [`EventRecord::instructor`].
    pub instructor: Option<Instructor>,

    /// See [`EventRecord::external_link`].
    pub external_link: Option<Url>,

    /// See [`EventRecord::meeting_link`].
    pub meeting_link: Option<Url>,

    /// See [`EventRecord::requires_auth`].
    pub requires_auth: bool,

    /// See [`EventRecord::status`].
    pub status: EventStatus,
}

impl NewEvent {
    /// Builds the record the manager stores for this input.
    #[must_use]
    pub fn into_record(self, id: String, now: DateTime<Utc>) -> EventRecord {
        EventRecord {
            id,
            title: self.title,
            date: self.date,
            time: self.time,
            format: self.format,
            location: self.location,
            description: self.description,
            image_url: self.image_url,
            price: self.price,
            xp: self.xp,
            attendee_limit: self.attendee_limit,
            tags: self.tags,
            skills: self.skills,
            requirements: self.requirements,
            instructor: self.instructor,
            external_link: self.external_link,
            meeting_link: self.meeting_link,
            requires_auth: self.requires_auth,
            registered_users: Vec::new(),
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of an event. `None` leaves a field untouched; for optional
/// fields, `Some(None)` clears it.
#[derive(Clone, Debug, Default)]
#[allow(clippy::option_option)]
pub struct EventUpdate {
    /// New title.
    pub title: Option<String>,

    /// New display date.
    pub date: Option<String>,

    /// New display time.
    pub time: Option<String>,

    /// New format.
    pub format: Option<String>,

    /// New venue.
    pub location: Option<Option<String>>,

    /// New description.
    pub description: Option<String>,

    /// New cover image.
    pub image_url: Option<String>,

    /// New price.
    pub price: Option<Option<u32>>,

    /// New XP reward.
    pub xp: Option<Option<u32>>,

    /// New attendee limit.
    pub attendee_limit: Option<u32>,

    /// New tags.
    pub tags: Option<Vec<String>>,

    /// New skills.
    pub skills: Option<Vec<String>>,

    /// New requirements.
    pub requirements: Option<Vec<String>>,

    /// New instructor.
    pub instructor: Option<Option<Instructor>>,

    /// New external registration link.
    pub external_link: Option<Option<Url>>,

    /// New meeting link.
    pub meeting_link: Option<Option<Url>>,

    /// New auth requirement.
    pub requires_auth: Option<bool>,

    /// New status.
    pub status: Option<EventStatus>,
}

impl EventUpdate {
    pub(crate) fn apply(self, record: &mut EventRecord) {
        let Self {
            title,
            date,
            time,
            format,
            location,
            description,
            image_url,
            price,
            xp,
            attendee_limit,
            tags,
            skills,
            requirements,
            instructor,
            external_link,
            meeting_link,
            requires_auth,
            status,
        } = self;

        macro_rules! set {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = $field {
                        record.$field = value;
                    }
                )*
            };
        }

        set!(
            title,
            date,
            time,
            format,
            location,
            description,
            image_url,
            price,
            xp,
            attendee_limit,
            tags,
            skills,
            requirements,
            instructor,
            external_link,
            meeting_link,
            requires_auth,
            status,
        );
    }
}

/// Query filter for listing events.
///
/// When a filter is supplied, events must match `status` (published if
/// unset), the instructor if given, and at least one of `tags` if any are
/// given.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// Required status. Defaults to [`EventStatus::Published`].
    pub status: Option<EventStatus>,

    /// Required instructor ID.
    pub instructor_id: Option<String>,

    /// Any-of tag match.
    pub tags: Vec<String>,
}

impl EventFilter {
    /// A filter for published events only.
    #[must_use]
    pub fn published() -> Self {
        Self::default()
    }

    /// True if `record` passes the filter.
    #[must_use]
    pub fn matches(&self, record: &EventRecord) -> bool {
        if record.status != self.status.unwrap_or(EventStatus::Published) {
            return false;
        }

        if let Some(instructor_id) = &self.instructor_id {
            let matches_instructor = record
                .instructor
                .as_ref()
                .is_some_and(|instructor| &instructor.id == instructor_id);

            if !matches_instructor {
                return false;
            }
        }

        self.tags.is_empty() || self.tags.iter().any(|tag| record.tags.contains(tag))
    }
}
