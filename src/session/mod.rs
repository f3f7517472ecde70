//! Session token lifecycle
//!
//! This module owns the bearer token used by the request client: storing it
//! with an expiry, validating its structure and embedded claims on every read,
//! and raising a re-authentication prompt when the session runs out.

pub mod clock;
pub mod navigator;
pub mod store;
pub mod token;

pub use clock::{AnchoredClock, Clock, ManualClock};
pub use navigator::{LoggingNavigator, Navigator};
pub use store::{SESSION_EXPIRED_MESSAGE, SessionStore, SessionStoreBuilder};
pub use token::{CredentialClaims, TokenRecord, decode_claims, is_live_credential};
