//! Request signing for authenticated venue calls
//!
//! The venue expects the query/body parameters joined as `key=value` pairs
//! with `&`, in the exact order sent, signed with the account's RSA key
//! (PKCS#1 v1.5 padding, SHA-256 digest) and base64-encoded. A single byte
//! of difference and every authenticated call fails, so the canonical
//! string is built from the caller's ordering verbatim.

use crate::config::BinanceConfig;
use crate::error::{BotError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;

/// Deterministic signer over ordered request parameters
#[derive(Clone)]
pub struct RequestSigner {
    key: SigningKey<Sha256>,
}

impl RequestSigner {
    /// Load the signing key from PEM text (PKCS#8 or PKCS#1)
    pub fn from_pem(pem: &str) -> Result<Self> {
        let key = match RsaPrivateKey::from_pkcs8_pem(pem) {
            Ok(key) => key,
            Err(_) => RsaPrivateKey::from_pkcs1_pem(pem)
                .map_err(|e| BotError::Signing(format!("invalid private key: {}", e)))?,
        };

        Ok(Self {
            key: SigningKey::new(key),
        })
    }

    /// Load the signing key from a PEM file
    pub fn from_pem_file(path: &str) -> Result<Self> {
        let pem = std::fs::read_to_string(path)
            .map_err(|e| BotError::Signing(format!("cannot read key file {}: {}", path, e)))?;
        Self::from_pem(&pem)
    }

    /// Sign ordered parameters, returning the base64 signature.
    ///
    /// Callers insert `timestamp` last and never include `signature`.
    pub fn sign(&self, params: &[(String, String)]) -> Result<String> {
        let payload = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        if !payload.is_ascii() {
            return Err(BotError::Signing(
                "payload contains non-ASCII bytes".into(),
            ));
        }

        let signature = self
            .key
            .try_sign(payload.as_bytes())
            .map_err(|e| BotError::Signing(format!("signing failed: {}", e)))?;

        Ok(BASE64.encode(signature.to_bytes()))
    }
}

/// API key plus signing key, loaded once at startup and shared read-only
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub signer: RequestSigner,
}

impl Credentials {
    pub fn load(config: &BinanceConfig) -> Result<Self> {
        Ok(Self {
            api_key: config.api_key.clone(),
            signer: RequestSigner::from_pem_file(&config.private_key_path)?,
        })
    }
}
