//! newsclf Server
//!
//! HTTP endpoint in front of the news category classifier.
//!
//! `GET /` answers liveness probes, `POST /predict` classifies one article
//! and appends the request, scores and latency to the request log.
//! [`ServiceState`] is built once before the listener binds and released
//! once after it stops.

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::ServerConfig;
pub use routes::create_router;
pub use state::ServiceState;
