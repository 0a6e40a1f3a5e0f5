//! Display formatting for domain models and collections.
//!
//! Domain models carry their own `Display` implementations; collections
//! get newtype wrappers so empty-list handling and ordering live in one
//! place. All interface layers (currently the CLI) print through these
//! types rather than formatting models themselves.
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (PlanSummaries, Stages,
//!   Tasks, Templates, History)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models

pub mod collections;
pub mod datetime;
pub mod models;

pub use collections::{History, PlanSummaries, Stages, Tasks, Templates};
pub use datetime::LocalDateTime;
