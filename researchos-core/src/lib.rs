pub mod backend;
pub mod candid;
pub mod config;
pub mod error;
pub mod fallback;
pub mod gateway;
pub mod models;

pub use backend::{create_backend, BackendError, CanisterBackend, DfxBackend, RelayBackend};
pub use config::{BackendSettings, HttpConfig, ResearchConfig};
pub use error::ResearchError;
pub use gateway::{QueryGateway, DEFAULT_TOPIC};
pub use models::{
    reference_sources, HealthState, HealthStatus, LogEntry, ResponseEnvelope, Severity, Source,
};
