//! Modkit - sprite library generation and Workshop mod packaging
//!
//! This library turns a folder of hand-drawn sprite sheets into:
//! - Sliced sprite metadata (one row of equal-width frames per sheet)
//! - A packed sprite atlas (PNG + JSON metadata)
//! - A sprite library mapping (category, frame index) -> sprite
//! - An `AdditionalNames.json` sidecar
//! - An uncompressed `.customer` bundle ready for Workshop upload
//!
//! The pipeline components are stateless and side-effect-scoped to explicit
//! file paths; interactive state lives in [`session::SessionState`] and the
//! Workshop boundary is the [`workshop::WorkshopClient`] trait.

pub mod atlas;
pub mod bundle;
pub mod category;
pub mod config;
pub mod importer;
pub mod library;
pub mod matcher;
pub mod meta;
pub mod paths;
pub mod pipeline;
pub mod session;
pub mod slicer;
pub mod workshop;
