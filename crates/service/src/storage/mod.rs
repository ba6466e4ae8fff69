//! Storage abstractions for service layer
//!
//! Reusable file-backed stores that persist small collections as JSON.

pub mod json_list_store;

pub use json_list_store::{JsonListStore, ReadMode, WriteMode};
