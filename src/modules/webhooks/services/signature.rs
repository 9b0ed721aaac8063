use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::core::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Verify a Square webhook signature.
///
/// Square signs `notification_url || body` with HMAC-SHA256 under the
/// subscription's signature key and sends the base64 digest in the
/// `x-square-hmacsha256-signature` header. Comparison is constant-time.
pub fn verify_signature(
    signature_key: &str,
    notification_url: &str,
    body: &str,
    signature: &str,
) -> Result<()> {
    if signature_key.is_empty() {
        return Err(AppError::Configuration(
            "Webhook signature key is not configured".to_string(),
        ));
    }

    let provided = BASE64
        .decode(signature)
        .map_err(|_| AppError::validation("Invalid webhook signature encoding"))?;

    let mut mac = HmacSha256::new_from_slice(signature_key.as_bytes())
        .map_err(|e| AppError::internal(format!("Failed to initialize HMAC: {}", e)))?;
    mac.update(notification_url.as_bytes());
    mac.update(body.as_bytes());

    mac.verify_slice(&provided)
        .map_err(|_| AppError::validation("Invalid webhook signature"))
}
