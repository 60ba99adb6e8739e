//! Telegram init data resolution.
//!
//! A Mini App authenticates every backend call with the signed launch
//! payload ("init data") Telegram hands to the page. Depending on how the
//! app was opened the payload lives in different places, so the
//! [`InitDataResolver`] probes them in a fixed order:
//!
//! 1. the host bridge ([`WebAppBridge`]), freshest and most trusted
//! 2. the launch URL query (`init_data`, then `tgWebAppData`)
//! 3. the launch URL hash fragment, either rebuilt from individual launch
//!    fields or read from an embedded `init_data`/`tgWebAppData` key
//! 4. durable storage, holding the last value that resolved
//!
//! Only structurally valid payloads (containing `hash=` and `auth_date=`)
//! are accepted or persisted. Signature checks are the backend's job.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tgtodo_initdata::{InitDataResolver, LaunchUrl, NoBridge};
//! use tgtodo_persistence::MemoryStore;
//!
//! let launch = LaunchUrl::parse(
//!     "https://app/?init_data=query_id%3Dabc%26auth_date%3D1700000000%26hash%3Ddeadbeef",
//! )
//! .unwrap();
//! let resolver = InitDataResolver::new(Arc::new(MemoryStore::new()), Arc::new(NoBridge), Some(launch));
//!
//! let init_data = resolver.resolve().unwrap();
//! assert_eq!(init_data.as_str(), "query_id=abc&auth_date=1700000000&hash=deadbeef");
//! ```

pub mod bridge;
pub mod debug;
pub mod error;
pub mod launch;
pub mod resolver;
pub mod validator;

pub use bridge::{NoBridge, StaticBridge, WebAppBridge};
pub use debug::{CandidatePreview, DebugConsole, InitDataSnapshot, PageReloader};
pub use error::{InitDataError, Result};
pub use launch::LaunchUrl;
pub use resolver::{
    InitDataResolver, Resolution, Source, DEBUG_INIT_DATA_STORAGE_KEY, INIT_DATA_STORAGE_KEY,
};
pub use validator::{is_valid, preview, InitData};
