// marley-service/src/utils/signed_urls.rs
//
// Keyed-digest URL tokens for the object store, standing in for the
// managed provider's signed upload/playback URLs. A token authorizes one
// purpose (upload or read) on one bucket/path until its expiry.
use crate::models::ServiceError;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Upload,
    Read,
}

impl Purpose {
    fn as_str(&self) -> &'static str {
        match self {
            Purpose::Upload => "upload",
            Purpose::Read => "read",
        }
    }
}

fn signing_key() -> String {
    env::var("UPLOAD_SIGNING_KEY").unwrap_or_else(|_| "marley_upload_signing_key".to_string())
}

fn digest(purpose: Purpose, bucket: &str, path: &str, expires: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(signing_key().as_bytes());
    hasher.update(purpose.as_str().as_bytes());
    hasher.update(bucket.as_bytes());
    hasher.update(path.as_bytes());
    hasher.update(expires.to_string().as_bytes());

    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

pub struct SignedUrl {
    pub path: String,
    pub url: String,
    pub token: String,
    pub expires: i64,
}

fn base_url() -> String {
    env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:9090".to_string())
}

/// Issue a signed URL valid for `ttl_secs` seconds.
pub fn sign(purpose: Purpose, bucket: &str, path: &str, ttl_secs: i64) -> SignedUrl {
    let expires = Utc::now().timestamp() + ttl_secs;
    let token = digest(purpose, bucket, path, expires);
    SignedUrl {
        path: path.to_string(),
        url: format!(
            "{}/storage/{}/{}?token={}&expires={}",
            base_url(),
            bucket,
            path,
            token,
            expires
        ),
        token,
        expires,
    }
}

/// Unsigned public URL, for objects served without a token (screenshots).
pub fn public_url(bucket: &str, path: &str) -> String {
    format!("{}/storage/{}/{}", base_url(), bucket, path)
}

/// Verify a presented token against purpose, bucket, path and expiry.
pub fn verify(
    purpose: Purpose,
    bucket: &str,
    path: &str,
    token: &str,
    expires: i64,
) -> Result<(), ServiceError> {
    if expires < Utc::now().timestamp() {
        return Err(ServiceError::Forbidden("Signed URL has expired".to_string()));
    }

    let expected = digest(purpose, bucket, path, expires);
    if expected != token {
        return Err(ServiceError::Forbidden("Invalid storage token".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_url_round_trips() {
        let signed = sign(Purpose::Upload, "videos", "p1/clip.mp4", 3600);
        verify(Purpose::Upload, "videos", "p1/clip.mp4", &signed.token, signed.expires)
            .expect("freshly signed token should verify");
    }

    #[test]
    fn token_is_bound_to_purpose_and_path() {
        let signed = sign(Purpose::Upload, "videos", "p1/clip.mp4", 3600);

        assert!(verify(Purpose::Read, "videos", "p1/clip.mp4", &signed.token, signed.expires).is_err());
        assert!(verify(Purpose::Upload, "videos", "p1/other.mp4", &signed.token, signed.expires).is_err());
        assert!(verify(Purpose::Upload, "screenshots", "p1/clip.mp4", &signed.token, signed.expires).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let signed = sign(Purpose::Read, "videos", "p1/clip.mp4", -10);
        assert!(verify(Purpose::Read, "videos", "p1/clip.mp4", &signed.token, signed.expires).is_err());
    }
}
