#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session state for the analysis front end.
//!
//! Services are plain values handed to their users: the
//! [`AnalysisController`] owns its [`AnalysisSource`], and cross-component
//! notifications go through explicit [`EventChannel`] subscriptions.
//!
//! [`AnalysisSource`]: hackathon_survey_client::AnalysisSource

pub mod controller;
pub mod events;
pub mod store;

pub use controller::{AnalysisController, AnalysisView, LoadState, RefreshOutcome};
pub use events::{EventChannel, FilterEvents, Subscription};
pub use store::SessionStore;

use hackathon_survey_analysis::AnalysisError;
use hackathon_survey_analysis::request::RequestValidationError;
use hackathon_survey_client::ClientError;

/// Errors surfaced by a refresh.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A filter combination was rejected; nothing was sent.
    #[error(transparent)]
    Validation(#[from] RequestValidationError),

    /// The request could not be built.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// The analyses could not be loaded.
    #[error("Analysis could not be loaded: {0}")]
    Client(#[from] ClientError),
}
