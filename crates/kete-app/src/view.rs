//! Text rendering for the terminal front end.
//!
//! Pure functions from session state and events to printable strings.

use kete_chat::{ChatError, ResultGrid, Transcript};
use kete_core::events::SessionEvent;
use kete_core::types::{Message, Sender};

const USER_PREFIX: &str = "you  >";
const BOT_PREFIX: &str = "kete >";

pub fn render_message(message: &Message) -> String {
    let prefix = match message.sender() {
        Sender::User => USER_PREFIX,
        Sender::Bot => BOT_PREFIX,
    };
    format!("{} {}", prefix, message.text())
}

pub fn render_transcript(transcript: &Transcript) -> String {
    if transcript.is_empty() {
        return "(no messages yet)".to_string();
    }
    transcript
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text to print for an event, if any.
///
/// User messages are not echoed since the user just typed them.
pub fn render_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::MessageAppended { message, .. } if !message.is_from_user() => {
            Some(render_message(message))
        }
        SessionEvent::OrderOpened { order, .. } => Some(format!(
            "+-- Order details ------------------------------\n\
             | Please confirm the order details below:\n\
             | {}\n\
             +-- /confirm to confirm, /close to dismiss -----",
            order
        )),
        SessionEvent::OrderClosed {
            order, confirmed, ..
        } => Some(if *confirmed {
            format!("Order confirmed: {}", order)
        } else {
            "Order dialog closed.".to_string()
        }),
        SessionEvent::ResultsChanged { results, .. } => {
            let shown = results.iter().filter(|r| r.is_displayable()).count();
            Some(format!(
                "{} result(s), {} with images. Type /results to list them.",
                results.len(),
                shown
            ))
        }
        _ => None,
    }
}

pub fn render_grid(grid: &ResultGrid) -> String {
    let tiles = grid.tiles();
    if tiles.is_empty() {
        return "(no results to show)".to_string();
    }
    let mut out = tiles
        .iter()
        .map(|tile| {
            format!(
                "[{}] {}\n     preview: {}\n     link:    {}",
                tile.id, tile.title, tile.preview_url, tile.link_url
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let hidden = grid.hidden_count();
    if hidden > 0 {
        out.push_str(&format!("\n({} result(s) without images not shown)", hidden));
    }
    out
}

pub fn render_rejection(err: &ChatError) -> String {
    match err {
        ChatError::EmptyInput => "Type something to search for.".to_string(),
        ChatError::SubmitInFlight => "Still waiting for the previous answer...".to_string(),
        other => format!("Not sent: {}", other),
    }
}
