//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

/// Test helper functions
pub mod helpers {
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use std::sync::Arc;
    use tempfile::TempDir;
    use veteran_client::{ClientRuntime, Settings, notify::NullSurface};

    /// Unsigned three-segment credential expiring `exp_offset_secs` from now
    pub fn credential(exp_offset_secs: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = serde_json::json!({
            "sub": "veteran-42",
            "iat": now,
            "exp": now + exp_offset_secs,
        });
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(claims.to_string())
        )
    }

    /// Settings pointing at a mock server, with storage inside `dir`
    pub fn create_test_settings(base_url: &str, dir: &TempDir) -> Settings {
        let mut settings = Settings::default();
        settings.api.base_url = base_url.to_string();
        settings.api.timeout_ms = 2000;
        settings.session.storage_dir = Some(dir.path().to_path_buf());
        settings
    }

    /// Runtime that renders notifications nowhere
    pub fn create_test_runtime(base_url: &str, dir: &TempDir) -> ClientRuntime {
        ClientRuntime::builder(create_test_settings(base_url, dir))
            .surface(Arc::new(NullSurface))
            .build()
            .expect("test runtime should build")
    }
}
