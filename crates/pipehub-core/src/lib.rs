//! pipehub-core - Core library for PipeHub account settings
//!
//! This crate contains the account entities, the HTTP transport and the
//! settings controller that keeps the local drafts in sync with the backend.
//! Front ends (the CLI today) only render state and call controller
//! operations.

pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod transport;
pub mod util;

pub use config::ClientConfig;
pub use controller::{Acknowledgement, SettingsController, SettingsShell};
pub use error::{Error, Result};
pub use models::{ChannelEdit, NotificationChannel, ProfileEdit, UserProfile};
pub use transport::{HttpTransport, SettingsTransport};
