//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for storage used by the feature layer.

pub mod storage;
