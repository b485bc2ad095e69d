//! HMAC-SHA256 signed session tokens.
//!
//! Tokens are `base64url(claims_json).base64url(signature)` where the
//! signature is HMAC-SHA256 (RFC 2104) over the encoded claims. Verification
//! compares signatures in constant time and rejects expired claims.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CommonError, CommonResult};

const BLOCK_SIZE: usize = 64;
const MIN_SECRET_LEN: usize = 32;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject: the user id.
    pub sub: String,
    /// Email address of the authenticated user.
    pub email: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims valid from `now` for `ttl_seconds`.
    pub fn new(sub: impl Into<String>, email: impl Into<String>, now: i64, ttl_seconds: i64) -> Self {
        Self { sub: sub.into(), email: email.into(), iat: now, exp: now + ttl_seconds }
    }
}

/// Signs and verifies session tokens with a shared secret.
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").field("secret", &"[REDACTED]").finish()
    }
}

impl TokenSigner {
    /// Create a signer from a shared secret (at least 32 bytes).
    pub fn new(secret: &[u8]) -> CommonResult<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(CommonError::invalid_input(format!(
                "session secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        Ok(Self { secret: secret.to_vec() })
    }

    /// Produce a signed token for the given claims.
    pub fn sign(&self, claims: &SessionClaims) -> CommonResult<String> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
        let signature = URL_SAFE_NO_PAD.encode(hmac_sha256(&self.secret, payload.as_bytes()));
        Ok(format!("{payload}.{signature}"))
    }

    /// Verify a token's signature and expiry, returning its claims.
    ///
    /// `now` is the current unix time in seconds.
    pub fn verify(&self, token: &str, now: i64) -> CommonResult<SessionClaims> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| CommonError::invalid_input("malformed session token"))?;

        let provided = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| CommonError::invalid_input("malformed token signature"))?;
        let expected = hmac_sha256(&self.secret, payload.as_bytes());

        if !constant_time_eq(&provided, &expected) {
            return Err(CommonError::invalid_input("session token signature mismatch"));
        }

        let claims_bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| CommonError::invalid_input("malformed token payload"))?;
        let claims: SessionClaims = serde_json::from_slice(&claims_bytes)?;

        if claims.exp <= now {
            return Err(CommonError::invalid_input("session token expired"));
        }

        Ok(claims)
    }
}

/// HMAC-SHA256 per RFC 2104.
fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut block_key = [0u8; BLOCK_SIZE];
    if key.len() > BLOCK_SIZE {
        block_key[..32].copy_from_slice(&Sha256::digest(key));
    } else {
        block_key[..key.len()].copy_from_slice(key);
    }

    let mut inner = Sha256::new();
    let ipad: Vec<u8> = block_key.iter().map(|b| b ^ 0x36).collect();
    inner.update(&ipad);
    inner.update(message);
    let inner_hash = inner.finalize();

    let mut outer = Sha256::new();
    let opad: Vec<u8> = block_key.iter().map(|b| b ^ 0x5c).collect();
    outer.update(&opad);
    outer.update(inner_hash);
    outer.finalize().into()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
