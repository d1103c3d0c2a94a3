//! Auction insights API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! assistant pipeline, background jobs) so integration tests and the binary
//! entrypoint can both access them.

pub mod assistant;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
