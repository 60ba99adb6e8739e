//! The init data resolver.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tgtodo_persistence::KeyValueStore;
use tracing::{debug, warn};

use crate::bridge::WebAppBridge;
use crate::launch::LaunchUrl;
use crate::validator::{is_valid, preview, InitData};

/// Storage key for the last payload that resolved.
pub const INIT_DATA_STORAGE_KEY: &str = "tg_todo_web_init_data";

/// Storage key for a payload forced through the debug console.
pub const DEBUG_INIT_DATA_STORAGE_KEY: &str = "tg_todo_debug_init_data";

/// Where a resolved payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Bridge,
    Query,
    Fragment,
    Storage,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Bridge => "bridge",
            Source::Query => "query",
            Source::Fragment => "fragment",
            Source::Storage => "storage",
        }
    }
}

/// A resolved payload and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub init_data: InitData,
    pub source: Source,
}

/// Locates, validates and caches the launch payload.
///
/// Build one per application lifetime and share it (`Arc`) with whatever
/// attaches credentials to requests. The first successful resolution is
/// memoized; later calls return it without touching the bridge, the URL or
/// storage until [`reset`](Self::reset) is called.
pub struct InitDataResolver {
    store: Arc<dyn KeyValueStore>,
    bridge: Arc<dyn WebAppBridge>,
    launch: Option<LaunchUrl>,
    resolved: Mutex<Option<Resolution>>,
}

impl InitDataResolver {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        bridge: Arc<dyn WebAppBridge>,
        launch: Option<LaunchUrl>,
    ) -> Self {
        Self {
            store,
            bridge,
            launch,
            resolved: Mutex::new(None),
        }
    }

    /// The launch payload, or `None` when no source holds a valid one.
    pub fn resolve(&self) -> Option<InitData> {
        self.resolve_detailed().map(|r| r.init_data)
    }

    /// Like [`resolve`](Self::resolve), yielding an empty string when absent.
    pub fn resolve_or_empty(&self) -> String {
        self.resolve().map(InitData::into_inner).unwrap_or_default()
    }

    /// Resolve and report which source won.
    pub fn resolve_detailed(&self) -> Option<Resolution> {
        let mut slot = self.slot();
        if let Some(cached) = slot.as_ref() {
            return Some(cached.clone());
        }
        let found = self.locate();
        if let Some(resolution) = &found {
            *slot = Some(resolution.clone());
        }
        found
    }

    /// Forget the memoized payload; the next call probes all sources again.
    pub fn reset(&self) {
        *self.slot() = None;
    }

    /// Deep-link start parameter: host launch data first, then the URL.
    pub fn start_param(&self) -> Option<String> {
        self.bridge
            .start_param()
            .filter(|p| !p.is_empty())
            .or_else(|| self.launch.as_ref().and_then(LaunchUrl::start_param))
    }

    /// Raw bridge value, valid or not.
    pub fn bridge_init_data(&self) -> Option<String> {
        self.bridge.init_data()
    }

    /// Store `value` as the last known payload if it validates.
    ///
    /// Invalid values are ignored. Returns whether the value was written.
    pub fn persist(&self, value: &str) -> bool {
        self.write_key(INIT_DATA_STORAGE_KEY, value)
    }

    /// Stored payload, valid or not. Storage failures read as absent.
    pub fn read_stored(&self) -> Option<String> {
        self.read_key(INIT_DATA_STORAGE_KEY)
    }

    /// Drop the stored payload.
    pub fn evict(&self) {
        self.remove_key(INIT_DATA_STORAGE_KEY);
    }

    pub(crate) fn read_key(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read init data storage");
                None
            }
        }
    }

    pub(crate) fn write_key(&self, key: &str, value: &str) -> bool {
        if !is_valid(value) {
            return false;
        }
        match self.store.set(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Failed to persist init data");
                false
            }
        }
    }

    pub(crate) fn remove_key(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key, error = %e, "Failed to remove init data from storage");
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Resolution>> {
        self.resolved.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn locate(&self) -> Option<Resolution> {
        let bridged = self.bridge.init_data().unwrap_or_default();
        if let Some(init_data) = InitData::new(bridged.as_str()) {
            self.persist(init_data.as_str());
            debug!(source = "bridge", "Using init data from host bridge");
            return Some(Resolution {
                init_data,
                source: Source::Bridge,
            });
        }
        if !bridged.is_empty() {
            debug!(preview = %preview(&bridged), "Bridge init data missing hash/auth_date");
        }

        if let Some(resolution) = self.locate_in_url() {
            self.persist(resolution.init_data.as_str());
            debug!(source = resolution.source.as_str(), "Using init data from launch url");
            return Some(resolution);
        }

        self.locate_in_storage()
    }

    fn locate_in_url(&self) -> Option<Resolution> {
        let launch = self.launch.as_ref()?;

        if let Some(init_data) = launch.query_candidate().and_then(InitData::new) {
            return Some(Resolution {
                init_data,
                source: Source::Query,
            });
        }

        if !launch.has_fragment() {
            return None;
        }
        launch
            .fragment_candidate()
            .and_then(InitData::new)
            .map(|init_data| Resolution {
                init_data,
                source: Source::Fragment,
            })
    }

    /// Last known payload, then a debug override. Stale entries are evicted.
    fn locate_in_storage(&self) -> Option<Resolution> {
        for key in [INIT_DATA_STORAGE_KEY, DEBUG_INIT_DATA_STORAGE_KEY] {
            let Some(stored) = self.read_key(key) else {
                continue;
            };
            match InitData::new(stored) {
                Some(init_data) => {
                    debug!(key, preview = %init_data.preview(), "Falling back to stored init data");
                    return Some(Resolution {
                        init_data,
                        source: Source::Storage,
                    });
                }
                None => {
                    debug!(key, "Dropping stale init data from storage");
                    self.remove_key(key);
                }
            }
        }
        debug!("Init data not found");
        None
    }
}
