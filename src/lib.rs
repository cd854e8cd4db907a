//! azurelite
//!
//! Terminal dashboard for browsing, creating, and managing simulated cloud
//! resources. Lifecycle actions run as two-phase operations on the tokio
//! runtime; nothing leaves the process.

pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod notification;
pub mod profile;
pub mod resource;
pub mod ui;

/// Version injected at compile time via AZURELITE_VERSION env var (set by CI),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("AZURELITE_VERSION") {
    Some(v) => v,
    None => "dev",
};
