//! Draft post creator API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! create-post flow and its production collaborators) so integration tests
//! and the binary entrypoint can both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod media;
pub mod remote;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
