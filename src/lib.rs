//! Client for creating events on the PUK360 backend.
//!
//! [`services::form::CreateEventForm`] holds the draft being edited and runs
//! the submission: field-presence validation, bearer-token lookup through a
//! [`services::credentials::CredentialStore`], and one authenticated
//! `POST /api/events` through a [`services::api::EventTransport`].

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::{AppError, AppResult, SubmitError};
pub use models::{CreateEventRequest, DraftEvent, EventStatus, Field};
pub use services::form::{CreateEventForm, FormState, SubmitOutcome};
