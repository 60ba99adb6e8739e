//! Structural validation of init data.

use std::fmt;

use chrono::{DateTime, Utc};
use url::form_urlencoded;

use crate::error::InitDataError;

/// Marker every genuine payload carries for its signature.
pub const HASH_MARKER: &str = "hash=";

/// Marker every genuine payload carries for its issue time.
pub const AUTH_DATE_MARKER: &str = "auth_date=";

/// Characters kept by [`preview`].
const PREVIEW_CHARS: usize = 60;

/// Whether `candidate` looks like a Telegram init data payload.
///
/// True iff the value is non-empty and contains both `hash=` and
/// `auth_date=`. This is a sanity check, not a signature check.
pub fn is_valid(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.contains(HASH_MARKER)
        && candidate.contains(AUTH_DATE_MARKER)
}

/// Bounded preview of a possibly secret value, safe to log.
///
/// Returns `(empty)` for an empty value, otherwise at most the first 60
/// characters followed by `…` when truncated.
pub fn preview(value: &str) -> String {
    if value.is_empty() {
        return "(empty)".to_string();
    }
    let mut chars = value.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

/// A payload that passed [`is_valid`].
///
/// `Debug` prints only a preview so the full payload never reaches logs by
/// accident.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct InitData(String);

impl InitData {
    /// Wrap `value` if it is valid.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        is_valid(&value).then_some(Self(value))
    }

    /// The raw payload, as sent in `X-Telegram-Init-Data`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Decoded value of the first `name` field, if present.
    pub fn field(&self, name: &str) -> Option<String> {
        form_urlencoded::parse(self.0.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Issue time from `auth_date`.
    ///
    /// Informational only; expiry is enforced server-side.
    pub fn auth_date(&self) -> Option<DateTime<Utc>> {
        let secs = self.field("auth_date")?.parse::<i64>().ok()?;
        DateTime::from_timestamp(secs, 0)
    }

    /// See [`preview`].
    pub fn preview(&self) -> String {
        preview(&self.0)
    }
}

impl TryFrom<String> for InitData {
    type Error = InitDataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InitDataError::Invalid)
    }
}

impl AsRef<str> for InitData {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for InitData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InitData").field(&self.preview()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENUINE: &str = "query_id=AAE&user=%7B%22id%22%3A42%7D&auth_date=1700000000&hash=deadbeef";

    #[test]
    fn test_valid_requires_both_markers() {
        assert!(is_valid("auth_date=1&hash=x"));
        assert!(is_valid(GENUINE));
        assert!(!is_valid("auth_date=1"));
        assert!(!is_valid("hash=x"));
        assert!(!is_valid("user=bob"));
    }

    #[test]
    fn test_empty_is_invalid() {
        assert!(!is_valid(""));
    }

    #[test]
    fn test_markers_are_substrings() {
        // No parsing: markers may appear anywhere.
        assert!(is_valid("xauth_date=yhash=z"));
        assert!(!is_valid("hash auth_date"));
    }

    #[test]
    fn test_init_data_new_rejects_invalid() {
        assert!(InitData::new("").is_none());
        assert!(InitData::new("hash=abc").is_none());
        assert!(InitData::try_from("auth_date=1".to_string()).is_err());
        assert_eq!(InitData::new(GENUINE).unwrap().as_str(), GENUINE);
    }

    #[test]
    fn test_field_decodes() {
        let data = InitData::new(GENUINE).unwrap();
        assert_eq!(data.field("user").as_deref(), Some("{\"id\":42}"));
        assert_eq!(data.field("hash").as_deref(), Some("deadbeef"));
        assert_eq!(data.field("missing"), None);
    }

    #[test]
    fn test_auth_date() {
        let data = InitData::new(GENUINE).unwrap();
        assert_eq!(data.auth_date().unwrap().timestamp(), 1_700_000_000);

        let garbled = InitData::new("auth_date=soon&hash=x").unwrap();
        assert!(garbled.auth_date().is_none());
    }

    #[test]
    fn test_preview_bounds() {
        assert_eq!(preview(""), "(empty)");
        assert_eq!(preview("short"), "short");

        let exact = "a".repeat(60);
        assert_eq!(preview(&exact), exact);

        let long = "b".repeat(61);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), 61);
        assert!(shown.ends_with('…'));
    }

    #[test]
    fn test_preview_counts_chars_not_bytes() {
        let wide = "é".repeat(70);
        assert_eq!(preview(&wide), format!("{}…", "é".repeat(60)));
    }

    #[test]
    fn test_debug_is_redacted() {
        let long = format!("auth_date=1&hash={}", "f".repeat(100));
        let data = InitData::new(long.clone()).unwrap();
        let printed = format!("{:?}", data);
        assert!(!printed.contains(&long));
        assert!(printed.contains('…'));
    }
}
