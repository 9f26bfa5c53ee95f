//! Storage abstractions for service layer
//!
//! File-backed stores for small collections persisted as a single JSON document.

pub mod json_vec_store;
