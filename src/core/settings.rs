//! The singleton configuration record.
//!
//! Exactly one settings row exists system-wide. It is created implicitly at
//! first read if absent and replaced wholesale on save.

use serde::{Deserialize, Serialize};

use super::domain::CardImageFit;

/// Prefix marking a contact number as disabled without deleting it.
pub const DISABLED_NUMBER_PREFIX: &str = "OFF:";

/// Minimum length for a contact number entry to count as active.
pub const MIN_ACTIVE_NUMBER_LEN: usize = 8;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Ordered contact-channel endpoints. Entries may carry the disable
    /// prefix; selection must skip inactive entries.
    pub whatsapp_numbers: Vec<String>,
    pub google_maps_url: String,
    pub background_image_url: Option<String>,
    pub background_position: Option<String>,
    pub card_image_fit: CardImageFit,
}

impl AppSettings {
    /// An entry is active unless it carries the disable prefix or is too
    /// short to be a dialable number.
    pub fn is_active_number(entry: &str) -> bool {
        !entry.starts_with(DISABLED_NUMBER_PREFIX) && entry.len() >= MIN_ACTIVE_NUMBER_LEN
    }

    /// Active entries in their configured order.
    pub fn active_numbers(&self) -> impl Iterator<Item = &str> {
        self.whatsapp_numbers
            .iter()
            .map(String::as_str)
            .filter(|n| Self::is_active_number(n))
    }

    /// Whether any attendant is reachable at all.
    pub fn has_active_number(&self) -> bool {
        self.active_numbers().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_and_short_entries_are_inactive() {
        let settings = AppSettings {
            whatsapp_numbers: vec![
                "OFF:5598981489667".into(),
                "123".into(),
                "5598981489667".into(),
            ],
            ..Default::default()
        };
        let active: Vec<&str> = settings.active_numbers().collect();
        assert_eq!(active, vec!["5598981489667"]);
        assert!(settings.has_active_number());
    }

    #[test]
    fn no_active_numbers_when_all_disabled() {
        let settings = AppSettings {
            whatsapp_numbers: vec!["OFF:5598981489667".into()],
            ..Default::default()
        };
        assert!(!settings.has_active_number());
    }

    #[test]
    fn defaults_match_first_read_creation() {
        let settings: AppSettings = serde_json::from_str("{}").unwrap();
        assert!(settings.whatsapp_numbers.is_empty());
        assert_eq!(settings.card_image_fit, CardImageFit::Cover);
    }
}
