//! Debug console for QA sessions and test harnesses.
//!
//! Production code paths never touch this module. Bootstrap or test code
//! registers a [`DebugConsole`] explicitly when it wants to force, inspect
//! or clear the payload outside Telegram.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::resolver::{InitDataResolver, Source, DEBUG_INIT_DATA_STORAGE_KEY};
use crate::validator::{is_valid, preview};

/// Restarts the app so every consumer picks up a new payload.
pub trait PageReloader: Send + Sync {
    fn reload(&self);
}

impl<F> PageReloader for F
where
    F: Fn() + Send + Sync,
{
    fn reload(&self) {
        self()
    }
}

/// Redacted view of one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidatePreview {
    pub preview: String,
    pub valid: bool,
}

impl CandidatePreview {
    fn of(value: Option<&str>) -> Self {
        let value = value.unwrap_or_default();
        Self {
            preview: preview(value),
            valid: is_valid(value),
        }
    }
}

/// What each source holds and what resolution produced.
#[derive(Debug, Clone, Serialize)]
pub struct InitDataSnapshot {
    pub bridge: CandidatePreview,
    pub stored: CandidatePreview,
    pub debug_override: CandidatePreview,
    pub resolved: CandidatePreview,
    pub source: Option<Source>,
    pub auth_date: Option<DateTime<Utc>>,
}

/// Force, inspect and clear the payload behind a resolver.
pub struct DebugConsole {
    resolver: Arc<InitDataResolver>,
    reloader: Box<dyn PageReloader>,
}

impl DebugConsole {
    pub fn register(resolver: Arc<InitDataResolver>, reloader: impl PageReloader + 'static) -> Self {
        info!("Init data debug console registered");
        Self {
            resolver,
            reloader: Box::new(reloader),
        }
    }

    /// Force `value` as the payload and reload.
    ///
    /// Invalid values change nothing and do not reload, and neither does a
    /// value that storage refused under both keys. Returns whether the
    /// override was stored.
    pub fn set_mock_init_data(&self, value: &str) -> bool {
        if !is_valid(value) {
            warn!("Invalid mock init data, expect hash/auth_date fields");
            return false;
        }
        let persisted = self.resolver.persist(value);
        let recorded = self.resolver.write_key(DEBUG_INIT_DATA_STORAGE_KEY, value);
        if !persisted && !recorded {
            warn!("Mock init data could not be stored, not reloading");
            return false;
        }
        info!(preview = %preview(value), "Mock init data stored, reloading");
        self.resolver.reset();
        self.reloader.reload();
        true
    }

    /// Snapshot every candidate without exposing full payloads.
    ///
    /// Runs a resolution, so a stale stored value may be evicted as a side
    /// effect, exactly as a normal request would.
    pub fn inspect_init_data(&self) -> InitDataSnapshot {
        let bridge = self.resolver.bridge_init_data();
        let stored = self.resolver.read_stored();
        let debug_override = self.resolver.read_key(DEBUG_INIT_DATA_STORAGE_KEY);
        let resolution = self.resolver.resolve_detailed();

        let snapshot = InitDataSnapshot {
            bridge: CandidatePreview::of(bridge.as_deref()),
            stored: CandidatePreview::of(stored.as_deref()),
            debug_override: CandidatePreview::of(debug_override.as_deref()),
            resolved: CandidatePreview::of(resolution.as_ref().map(|r| r.init_data.as_str())),
            source: resolution.as_ref().map(|r| r.source),
            auth_date: resolution.as_ref().and_then(|r| r.init_data.auth_date()),
        };
        info!(
            bridge = %snapshot.bridge.preview,
            stored = %snapshot.stored.preview,
            resolved = %snapshot.resolved.preview,
            resolved_valid = snapshot.resolved.valid,
            "Init data snapshot"
        );
        snapshot
    }

    /// Remove cached and overridden payloads and forget the resolution.
    pub fn clear_init_data(&self) {
        self.resolver.evict();
        self.resolver.remove_key(DEBUG_INIT_DATA_STORAGE_KEY);
        self.resolver.reset();
        info!("Cleared cached init data");
    }
}
