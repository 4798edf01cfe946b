//! Director Core Library
//!
//! Typed client, session state and renderers for the AI reporting director.

pub mod client;
pub mod config;
pub mod error;
pub mod health;
pub mod model;
pub mod notes;
pub mod render;
pub mod session;

pub use client::{ApiClient, DirectorApi};
pub use config::ClientConfig;
pub use error::{DirectorError, DirectorResult};
pub use health::{ConnectionStatus, HealthMonitor, ProbeReport};
pub use session::Session;
