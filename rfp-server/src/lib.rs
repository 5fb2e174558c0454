//! `rfp-server` exposes the RFP assistant over HTTP: upload documents, ask
//! for improved RFP content, and send accept / reject / edit feedback.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod telemetry;

pub use config::AppConfig;
pub use server::{AppState, app_router, build_state, run_server};
