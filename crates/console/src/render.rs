use std::fmt::Write;

use exp3_events::EventRecord;
use exp3_registration::{CallToAction, Effect};

/// One line of the event list: index, title, schedule, price, XP and the
/// register button.
pub fn event_line(index: usize, event: &EventRecord, action: &CallToAction) -> String {
    let mut line = format!("[{index}] {} | {} {}", event.title, event.date, event.time);

    if let Some(price) = event.price.filter(|price| *price > 0) {
        let _ = write!(line, " | {price} EX3");
    }

    if let Some(xp) = event.xp {
        let _ = write!(line, " | +{xp} XP");
    }

    if action.is_enabled() {
        let _ = write!(line, " | [{action}]");
    } else {
        let _ = write!(line, " | ({action})");
    }

    line
}

/// The event detail page.
pub fn event_detail(event: &EventRecord) -> String {
    let mut page = format!("{}\n{} {}\n", event.title, event.date, event.time);

    if !event.format.is_empty() {
        let _ = writeln!(page, "format: {}", event.format);
    }
    if let Some(location) = &event.location {
        let _ = writeln!(page, "location: {location}");
    }
    if let Some(instructor) = &event.instructor {
        let _ = writeln!(page, "instructor: {} ({})", instructor.name, instructor.role);
    }
    if !event.tags.is_empty() {
        let _ = writeln!(page, "tags: {}", event.tags.join(", "));
    }
    if !event.skills.is_empty() {
        let _ = writeln!(page, "skills: {}", event.skills.join(", "));
    }
    let _ = writeln!(page, "spots left: {}", event.spots_left());
    if !event.description.is_empty() {
        let _ = writeln!(page, "\n{}", event.description);
    }

    page
}

/// What the UI does in response to an effect.
pub fn effect(effect: &Effect) -> String {
    match effect {
        Effect::OpenExternal { url } => format!("opening {url} in a new window (no opener)"),
        Effect::OpenMeeting { url } => format!("joining meeting at {url}"),
        Effect::PresentAuth { index } => {
            format!("sign in to register for event {index} (`connect` or `close-auth`)")
        }
        Effect::PresentPayment {
            index,
            title,
            price,
        } => format!(
            "pay {price} EX3 for \"{title}\" [{index}] (`pay` or `close-payment`)"
        ),
        Effect::ShowDetail { path } => format!("navigating to {path}"),
        Effect::Registered { index } => format!("registered for event {index}"),
        Effect::None => "nothing to do".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use exp3_app::featured_events;

    fn featured(index: usize) -> EventRecord {
        featured_events().unwrap()[index]
            .clone()
            .into_record(format!("event-{index}"), Default::default())
    }

    #[test]
    fn test_event_line() {
        assert_eq!(
            event_line(0, &featured(0), &CallToAction::ConnectToRegister),
            "[0] AI-Powered UX Design Workshop | March 15, 2024 10:00 AM - 4:00 PM EST \
             | 100 EX3 | +500 XP | [Connect to Register]"
        );
        assert_eq!(
            event_line(1, &featured(1), &CallToAction::Registered),
            "[1] UX.3toryu Workshop | September 2, 2024 18:00 UTC | (Registered)"
        );
    }

    #[test]
    fn test_event_detail() {
        let page = event_detail(&featured(1));

        assert!(page.starts_with("UX.3toryu Workshop\n"));
        assert!(page.contains("tags: UX, Web3, Design"));
        assert!(page.contains("spots left: 100"));
    }

    #[test]
    fn test_effect() {
        assert_eq!(effect(&Effect::None), "nothing to do");
        assert_eq!(
            effect(&Effect::PresentPayment {
                index: 0,
                title: "Workshop".to_string(),
                price: 100,
            }),
            "pay 100 EX3 for \"Workshop\" [0] (`pay` or `close-payment`)"
        );
    }
}
