//! Launch URL probing.
//!
//! Telegram and our own deep links pass launch parameters either in the
//! query string or in the hash fragment (which survives server-side
//! routing untouched).

use url::{form_urlencoded, Url};

use crate::error::Result;
use crate::validator::is_valid;

/// Keys carrying a whole init data payload, in lookup order.
pub const PAYLOAD_KEYS: [&str; 2] = ["init_data", "tgWebAppData"];

/// Launch fields a fragment may carry individually, in rebuild order.
pub const FRAGMENT_FIELDS: [&str; 10] = [
    "user",
    "receiver",
    "chat",
    "chat_type",
    "chat_instance",
    "start_param",
    "can_send_after",
    "auth_date",
    "hash",
    "query_id",
];

/// Query keys carrying the deep-link start parameter, in lookup order.
pub const START_PARAM_KEYS: [&str; 3] = ["start_param", "tgWebAppStartParam", "startapp"];

/// The URL the app was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchUrl {
    url: Url,
}

impl LaunchUrl {
    pub fn parse(input: &str) -> Result<Self> {
        Ok(Self {
            url: Url::parse(input)?,
        })
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// First non-empty `init_data` or `tgWebAppData` query value, decoded.
    pub fn query_candidate(&self) -> Option<String> {
        let params = decode(self.url.query().unwrap_or_default());
        first_non_empty(&params, &PAYLOAD_KEYS)
    }

    /// Whether the URL has a non-empty hash fragment.
    pub fn has_fragment(&self) -> bool {
        self.url.fragment().is_some_and(|f| !f.is_empty())
    }

    /// Payload rebuilt from individual launch fields in the fragment.
    ///
    /// Only attempted when the fragment carries both `hash` and `auth_date`.
    /// Fields are taken from [`FRAGMENT_FIELDS`] in that order, empty values
    /// skipped, and re-encoded as a query string.
    ///
    /// The web client joined the decoded `key=value` strings as-is; here
    /// values are percent-encoded again, so a decoded value holding `&` or
    /// `=` (the `user` JSON, say) cannot split into extra fields when the
    /// backend parses the payload.
    pub fn fragment_composite(&self) -> Option<String> {
        let params = self.fragment_params();
        if lookup(&params, "hash").is_none() || lookup(&params, "auth_date").is_none() {
            return None;
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut appended = 0;
        for key in FRAGMENT_FIELDS {
            if let Some(value) = lookup(&params, key).filter(|v| !v.is_empty()) {
                serializer.append_pair(key, value);
                appended += 1;
            }
        }
        (appended > 0).then(|| serializer.finish())
    }

    /// First non-empty `init_data` or `tgWebAppData` fragment value, decoded.
    pub fn fragment_payload(&self) -> Option<String> {
        first_non_empty(&self.fragment_params(), &PAYLOAD_KEYS)
    }

    /// Best fragment candidate: the rebuilt payload when it validates,
    /// otherwise the embedded payload key.
    pub fn fragment_candidate(&self) -> Option<String> {
        self.fragment_composite()
            .filter(|composite| is_valid(composite))
            .or_else(|| self.fragment_payload())
    }

    /// Deep-link start parameter from the query string.
    pub fn start_param(&self) -> Option<String> {
        let params = decode(self.url.query().unwrap_or_default());
        first_non_empty(&params, &START_PARAM_KEYS)
    }

    fn fragment_params(&self) -> Vec<(String, String)> {
        decode(self.url.fragment().unwrap_or_default())
    }
}

fn decode(input: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(input.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// First value for `key`; repeated keys after the first are ignored.
fn lookup<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn first_non_empty(params: &[(String, String)], keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| lookup(params, key))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
