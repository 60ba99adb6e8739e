//! Durable key-value storage for tg-todo.
//!
//! Stands in for the browser's local storage: a flat string-to-string map
//! with last-write-wins semantics. [`FileStore`] keeps the map in a single
//! JSON file rewritten atomically (write to temp file, then rename).
//!
//! # Example
//!
//! ```no_run
//! use tgtodo_persistence::{FileStore, KeyValueStore};
//!
//! let store = FileStore::new("/home/user/.tg-todo/state/storage.json");
//! store.set("greeting", "hello").unwrap();
//! assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hello"));
//! store.remove("greeting").unwrap();
//! ```

pub mod atomic;
pub mod error;
pub mod store;

pub use error::{PersistenceError, Result};
pub use store::{FileStore, KeyValueStore, MemoryStore};
