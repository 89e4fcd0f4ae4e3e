//! Analysis history.
//!
//! This module owns the collection of past analyses, its persisted form and
//! the operations the front end triggers on it.

pub mod codec;
pub mod store;

pub use store::{HistoryError, HistoryStore};
