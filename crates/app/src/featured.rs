use exp3_events::{Error as EventsError, EventManagement, EventStatus, NewEvent};
use tracing::{debug, info};
use url::Url;

use crate::Error;

const FEATURED_ATTENDEE_LIMIT: u32 = 100;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// The events featured on the landing page, in display order.
///
/// # Errors
///
/// Returns [`Error::InvalidLink`] if a built-in link fails to parse.
pub fn featured_events() -> Result<Vec<NewEvent>, Error> {
    Ok(vec![
        NewEvent {
            id: Some("ai-ux-workshop".to_string()),
            title: "AI-Powered UX Design Workshop".to_string(),
            date: "March 15, 2024".to_string(),
            time: "10:00 AM - 4:00 PM EST".to_string(),
            format: "Online".to_string(),
            description: "Join us for an intensive workshop that bridges the gap between AI \
                          technology and UX design. Learn how to leverage artificial intelligence \
                          to enhance user experiences, automate design workflows, and create \
                          more intelligent interfaces."
                .to_string(),
            image_url: "https://images.unsplash.com/photo-1558655146-9f40138edfeb?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&q=80".to_string(),
            price: Some(100),
            xp: Some(500),
            attendee_limit: FEATURED_ATTENDEE_LIMIT,
            tags: strings(&["AI", "UX", "Design"]),
            skills: strings(&[
                "AI Integration",
                "UX Research",
                "Interface Design",
                "Technical Implementation",
            ]),
            requires_auth: true,
            status: EventStatus::Published,
            ..NewEvent::default()
        },
        NewEvent {
            id: Some("ux-3toryu".to_string()),
            title: "UX.3toryu Workshop".to_string(),
            date: "September 2, 2024".to_string(),
            time: "18:00 UTC".to_string(),
            format: "Online".to_string(),
            description: "An immersive workshop exploring the future of Web3 user experiences. \
                          Learn how to design intuitive interfaces for decentralized \
                          applications from industry experts."
                .to_string(),
            image_url: "https://images.unsplash.com/photo-1526304640581-d334cdbbf45e?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&q=80".to_string(),
            attendee_limit: FEATURED_ATTENDEE_LIMIT,
            tags: strings(&["UX", "Web3", "Design"]),
            skills: strings(&[
                "Web3 Design",
                "DApp UX",
                "Token Economics",
                "Smart Contract Integration",
            ]),
            external_link: Some(Url::parse("https://lu.ma/ux3")?),
            status: EventStatus::Published,
            ..NewEvent::default()
        },
    ])
}

/// Creates any featured event missing from the catalog. Existing events are
/// left as they are.
///
/// # Errors
///
/// Returns the first catalog error other than the event already existing.
pub async fn seed_featured_events<M>(events: &M) -> Result<(), Error>
where
    M: EventManagement,
{
    for event in featured_events()? {
        match events.create_event(event).await {
            Ok(event_id) => info!(%event_id, "seeded featured event"),
            Err(EventsError::AlreadyExists(event_id)) => {
                debug!(%event_id, "featured event already present");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
