//! Mediastamp API library
//!
//! HTTP surface of the service: the byte-range streaming responder, the
//! upload orchestrator, logo management, and thin folder routes, plus app
//! state and setup. The binary in `main.rs` wires this together with
//! configuration from the environment.

pub mod api_doc;
pub mod error;
pub mod handlers;
pub mod range;
pub mod setup;
pub mod state;
pub mod telemetry;
