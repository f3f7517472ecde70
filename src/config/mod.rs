//! Configuration management for the client runtime
//!
//! This module handles loading and managing configuration settings for the
//! request client, session store, notifier and the diagnostic binary.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{ApiSettings, LoggingSettings, NotificationSettings, SessionSettings, Settings};
