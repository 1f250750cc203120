//! Lightweight signed session tokens.
//!
//! Format: `base64url(json claims).base64url(hmac_sha256(json claims))`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::model::Id;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Id,
    pub sid: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(thiserror::Error, Debug)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("bad signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("invalid claims: {0}")]
    Claims(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct TokenSigner {
    key: [u8; 32],
}

impl TokenSigner {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length.
        HmacSha256::new_from_slice(&self.key).expect("hmac key of any size")
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        let payload = serde_json::to_vec(claims)?;
        let mut mac = self.mac();
        mac.update(&payload);
        let sig = mac.finalize().into_bytes();
        Ok(format!("{}.{}", URL_SAFE_NO_PAD.encode(&payload), URL_SAFE_NO_PAD.encode(sig)))
    }

    /// Check the signature and expiry against `now` (unix seconds).
    pub fn verify(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let (p1, p2) = token.split_once('.').ok_or(TokenError::Malformed)?;
        if p2.contains('.') {
            return Err(TokenError::Malformed);
        }
        let payload = URL_SAFE_NO_PAD.decode(p1).map_err(|_| TokenError::Malformed)?;
        let sig = URL_SAFE_NO_PAD.decode(p2).map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac();
        mac.update(&payload);
        mac.verify_slice(&sig).map_err(|_| TokenError::BadSignature)?;

        let claims: Claims = serde_json::from_slice(&payload)?;
        if claims.exp <= now {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp: i64) -> Claims {
        Claims { sub: 7, sid: "01HZX".into(), iat: 100, exp }
    }

    #[test]
    fn issued_tokens_verify() {
        let signer = TokenSigner::new([3; 32]);
        let token = signer.issue(&claims(200)).unwrap();
        assert_eq!(signer.verify(&token, 150).unwrap(), claims(200));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let signer = TokenSigner::new([3; 32]);
        let token = signer.issue(&claims(200)).unwrap();
        assert!(matches!(signer.verify(&token, 200), Err(TokenError::Expired)));
    }

    #[test]
    fn tampering_breaks_the_signature() {
        let signer = TokenSigner::new([3; 32]);
        let token = signer.issue(&claims(200)).unwrap();
        let (_, sig) = token.split_once('.').unwrap();
        let forged = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&Claims { sub: 1, ..claims(200) }).unwrap());
        assert!(matches!(signer.verify(&format!("{forged}.{sig}"), 150), Err(TokenError::BadSignature)));

        let other = TokenSigner::new([4; 32]);
        assert!(matches!(other.verify(&token, 150), Err(TokenError::BadSignature)));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let signer = TokenSigner::new([3; 32]);
        for bad in ["", "abc", "a.b.c", "!!.??"] {
            assert!(matches!(signer.verify(bad, 0), Err(TokenError::Malformed)), "{bad}");
        }
    }
}
