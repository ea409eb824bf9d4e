//! Whole-file JSON persistence.

mod json;

pub use json::JsonStore;
