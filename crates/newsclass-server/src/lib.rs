//! newsclass Server
//!
//! HTTP host for the newsclass inference service. Loads the model artifact
//! once at startup and serves `POST /prediction` plus liveness, readiness,
//! label and Prometheus endpoints.

pub mod cli;
pub mod config;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use routes::create_router;
pub use server::{init_holder, run_server};
pub use state::AppState;
