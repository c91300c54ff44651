//! publicspace - public/private land classification for the Netherlands
//!
//! This library classifies every parcel of land inside an area of interest
//! as public or private, combining the BGT and TOP10NL datasets through an
//! ordered list of classification rules.
//!
//! # Overview
//!
//! - [`rules`] holds the ordered rules and runs them against a
//!   [`overlay::ClassifiedSurface`], which keeps the classified fragments
//!   free of overlap using a [`grid::TileGrid`].
//! - [`merge`] and [`export`] turn the fragments into a detailed and an
//!   aggregate output layer.
//! - [`source`] and [`provider`] read and download the input layers.
//! - [`classify`] runs one area of interest end to end; [`batch`] runs many.
//!
//! ```ignore
//! use publicspace::classify::{AoiPaths, Classifier};
//! use publicspace::overlay::SurfaceConfig;
//!
//! let paths = AoiPaths::for_aoi("output".as_ref(), "utrecht_area0");
//! let result = Classifier::new(SurfaceConfig::default()).run_paths(&paths)?;
//! ```

pub mod batch;
pub mod classify;
pub mod config;
pub mod export;
pub mod feature;
pub mod grid;
pub mod log;
pub mod logging;
pub mod merge;
pub mod overlay;
pub mod provider;
pub mod rules;
pub mod source;

/// Version of the publicspace library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
