//! tg-todo command-line client.
//!
//! Runs the init data resolver outside Telegram (from a launch URL, a
//! bridge value or the local storage file) and calls the backend with the
//! result, which makes it handy for reproducing what the Mini App sends.

pub mod cli;
pub mod commands;
