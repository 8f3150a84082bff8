//! Ed25519 verification of interaction webhook requests.
//!
//! The platform signs `timestamp ‖ raw body` with the application key and
//! sends the signature as hex in `X-Signature-Ed25519`.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "X-Signature-Ed25519";
/// Header carrying the signed timestamp.
pub const TIMESTAMP_HEADER: &str = "X-Signature-Timestamp";

/// Errors raised while loading the application public key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublicKeyError {
    /// The key is not valid hex.
    #[error("public key is not hex: {0}")]
    NotHex(String),
    /// The key does not decode to a curve point.
    #[error("public key is not a valid Ed25519 key")]
    Invalid,
}

/// Reasons a request signature is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// The signature header is not 64 bytes of hex.
    #[error("malformed signature header")]
    Malformed,
    /// The signature does not match the body.
    #[error("signature mismatch")]
    Mismatch,
}

/// Verifier bound to the application's public key.
#[derive(Debug, Clone)]
pub struct InteractionVerifier {
    key: VerifyingKey,
}

impl InteractionVerifier {
    /// Wrap an already decoded key.
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Decode the hex public key shown in the developer portal.
    ///
    /// # Errors
    ///
    /// Returns [`PublicKeyError`] when the text is not a 32-byte Ed25519 key.
    pub fn from_hex(public_key: &str) -> Result<Self, PublicKeyError> {
        let bytes = hex::decode(public_key.trim())
            .map_err(|error| PublicKeyError::NotHex(error.to_string()))?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| PublicKeyError::Invalid)?;
        let key = VerifyingKey::from_bytes(&bytes).map_err(|_| PublicKeyError::Invalid)?;
        Ok(Self { key })
    }

    /// Check `signature_hex` over `timestamp ‖ body`.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the header is malformed or the
    /// signature does not verify.
    pub fn verify(
        &self,
        timestamp: &str,
        body: &[u8],
        signature_hex: &str,
    ) -> Result<(), SignatureError> {
        let bytes = hex::decode(signature_hex).map_err(|_| SignatureError::Malformed)?;
        let bytes: [u8; 64] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| SignatureError::Malformed)?;
        let signature = Signature::from_bytes(&bytes);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);
        self.key
            .verify(&message, &signature)
            .map_err(|_| SignatureError::Mismatch)
    }
}
