pub mod contact;
pub mod export;
pub mod extract;
pub mod store;

use chrono::{ DateTime, Local, Utc };

pub use contact::ContactLinkBuilder;
pub use extract::{ digit_value, extract_phone, normalize_phone };
pub use store::LeadStore;

const EXCERPT_ELLIPSIS: &str = "...";

/// A prospective-customer contact captured from a user message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lead {
    pub captured_at: DateTime<Utc>,
    pub phone: String,
    pub normalized_phone: String,
    pub source_excerpt: String,
}

impl Lead {
    /// Scans `message` and builds a lead from the first phone-like substring.
    pub fn capture(message: &str, excerpt_len: usize) -> Option<Self> {
        let phone = extract_phone(message)?;
        Some(Self {
            captured_at: Utc::now(),
            phone: phone.to_string(),
            normalized_phone: normalize_phone(phone),
            source_excerpt: excerpt(message, excerpt_len),
        })
    }

    /// `HH:MM` in server local time, as shown in the dashboard table.
    pub fn display_time(&self) -> String {
        self.captured_at.with_timezone(&Local).format("%H:%M").to_string()
    }
}

/// First `max_chars` characters of `message`, with an ellipsis when cut.
pub fn excerpt(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}{}", &message[..idx], EXCERPT_ELLIPSIS),
        None => message.to_string(),
    }
}
