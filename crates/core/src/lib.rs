//! Domain layer for the draft post creator.
//!
//! Holds everything that does not perform I/O: the error taxonomy, the
//! capability traits the request flow is wired against, submission
//! validation, sanitizers, and the rules applied to remote image probes.

pub mod auth;
pub mod error;
pub mod image_probe;
pub mod ports;
pub mod sanitize;
pub mod submission;
pub mod types;
