#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Comparative survey analysis.
//!
//! Builds the `GET /analyses` request from a hackathon selection and a
//! list of filter combinations, then reshapes the per-hackathon payload
//! into the section → question → per-hackathon tree that charts and tables
//! render from. Sparse data is gated by the first hackathon: a question or
//! sub-question whose first entry has zero participants is dropped.
//!
//! Everything here is synchronous and free of I/O except
//! [`manifest::load_manifest`] and [`export::save_chart_image`].

pub mod export;
pub mod manifest;
pub mod mapper;
pub mod presentation;
pub mod request;
pub mod stats;

pub use hackathon_survey_analysis_models as models;

pub use manifest::{default_manifest, load_manifest};
pub use mapper::{map_sections, split_empty_analyses};
pub use request::{AnalysisRequest, build_analysis_request, validate_filters};

/// Errors raised by the fallible parts of this crate.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A filter combination was rejected before dispatch.
    #[error(transparent)]
    Validation(#[from] request::RequestValidationError),

    /// Filters could not be encoded for the query string.
    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    /// A section manifest could not be parsed.
    #[error("Manifest parse error: {0}")]
    Manifest(#[from] toml::de::Error),

    /// Manifest or export file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A chart could not be rasterized.
    #[error(transparent)]
    Export(#[from] export::ExportError),
}
