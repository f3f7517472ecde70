//! Random nonce generation

/// Number of random bytes in a nonce
const NONCE_BYTES: usize = 16;

/// Generate a random 128-bit nonce rendered as lowercase hex
///
/// Falls back to a time-derived value if the OS random source is unavailable;
/// nonces tag stored records and are not a security boundary.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    if let Err(e) = getrandom::fill(&mut bytes) {
        tracing::warn!("OS random source unavailable ({}), using time-derived nonce", e);
        let nanos = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_le_bytes();
        bytes[..nanos.len()].copy_from_slice(&nanos);
    }

    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_format() {
        let nonce = generate_nonce();
        assert_eq!(nonce.len(), NONCE_BYTES * 2);
        assert!(nonce.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_nonces_differ() {
        assert_ne!(generate_nonce(), generate_nonce());
    }
}
