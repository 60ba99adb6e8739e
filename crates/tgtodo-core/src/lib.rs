//! Core configuration for the tg-todo Mini App client.
//!
//! Locates the local state directory, the env file holding secrets and the
//! backend base URL shared by every tg-todo interface.

pub mod config;
