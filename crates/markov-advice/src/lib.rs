//! Symptom-based advice for heart-failure patients.
//!
//! An [`AdviceRequest`] carries five symptom findings. Once validated into
//! a [`BnInput`] they are entered as evidence into an influence diagram and
//! the [`AdviceService`] returns the state label of the optimal decision.

pub mod error;
pub mod request;
pub mod service;

pub use error::AdviceError;
pub use request::{AdviceRequest, BnInput, Grade, Syncope};
pub use service::AdviceService;
