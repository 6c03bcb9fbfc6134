//! Storage module for uploaded photos
//!
//! Keeps image bytes in memory, keyed by attachment handle.

mod image_storage;

pub use image_storage::{ImageStorage, StoredImage};
