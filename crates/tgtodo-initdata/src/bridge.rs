//! Host bridge capabilities.

use url::form_urlencoded;

/// Read-only view of what the Telegram host injected into the page.
pub trait WebAppBridge: Send + Sync {
    /// Raw init data, absent when not launched inside Telegram.
    fn init_data(&self) -> Option<String>;

    /// Start parameter from the host's parsed (unverified) launch data.
    fn start_param(&self) -> Option<String> {
        None
    }
}

/// No host present, e.g. a plain browser preview.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBridge;

impl WebAppBridge for NoBridge {
    fn init_data(&self) -> Option<String> {
        None
    }
}

/// A bridge exposing a fixed payload.
#[derive(Debug, Default, Clone)]
pub struct StaticBridge {
    init_data: Option<String>,
}

impl StaticBridge {
    pub fn new(init_data: impl Into<String>) -> Self {
        Self {
            init_data: Some(init_data.into()),
        }
    }

    /// Bridge exposing `init_data` when set.
    pub fn from_option(init_data: Option<String>) -> Self {
        Self { init_data }
    }
}

impl WebAppBridge for StaticBridge {
    fn init_data(&self) -> Option<String> {
        self.init_data.clone()
    }

    fn start_param(&self) -> Option<String> {
        let raw = self.init_data.as_deref()?;
        form_urlencoded::parse(raw.as_bytes())
            .find(|(key, _)| key == "start_param")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_bridge_is_empty() {
        assert_eq!(NoBridge.init_data(), None);
        assert_eq!(NoBridge.start_param(), None);
    }

    #[test]
    fn test_static_bridge_start_param() {
        let bridge = StaticBridge::new("start_param=task_42&auth_date=1&hash=ff");
        assert_eq!(bridge.start_param().as_deref(), Some("task_42"));

        let bare = StaticBridge::new("auth_date=1&hash=ff");
        assert_eq!(bare.start_param(), None);
    }

    #[test]
    fn test_static_bridge_from_option() {
        assert_eq!(StaticBridge::from_option(None).init_data(), None);
        assert_eq!(
            StaticBridge::from_option(Some("x".into())).init_data().as_deref(),
            Some("x")
        );
    }
}
