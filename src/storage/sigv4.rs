//! SigV4 authentication for the managed CQL endpoint
//!
//! The endpoint authenticates CQL sessions with a SASL-style exchange: the
//! client announces `SigV4`, the server answers with a nonce, and the client
//! replies with an AWS Signature Version 4 computed over that nonce for the
//! `cassandra` service.

use super::client::StoreError;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// First token sent by the client to select the SigV4 mechanism
pub const INITIAL_RESPONSE: &[u8] = b"SigV4\0\0";

const SERVICE: &str = "cassandra";
const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const EXPIRES_SECS: u32 = 900;

/// Static AWS credentials scoped to one region
#[derive(Clone)]
pub struct SigV4Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: String,
}

impl fmt::Debug for SigV4Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigV4Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("region", &self.region)
            .finish()
    }
}

/// Signs server nonces for the CQL authentication exchange
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    credentials: SigV4Credentials,
}

impl SigV4Signer {
    pub fn new(credentials: SigV4Credentials) -> Self {
        Self { credentials }
    }

    /// Answer a server challenge of the form `nonce=<value>[,...]`
    pub fn respond(&self, challenge: &[u8], timestamp: DateTime<Utc>) -> Result<String, StoreError> {
        let nonce = extract_nonce(challenge)?;
        let amz_date = format_timestamp(timestamp);
        let signature = self.signature(&nonce, timestamp)?;

        let mut response = format!(
            "signature={},access_key={},amzdate={}",
            signature, self.credentials.access_key_id, amz_date
        );
        if let Some(token) = &self.credentials.session_token {
            response.push_str(",session_token=");
            response.push_str(token);
        }
        Ok(response)
    }

    fn credential_scope(&self, timestamp: DateTime<Utc>) -> String {
        format!(
            "{}/{}/{}/aws4_request",
            timestamp.format("%Y%m%d"),
            self.credentials.region,
            SERVICE
        )
    }

    fn canonical_request(&self, nonce: &str, timestamp: DateTime<Utc>) -> String {
        let query = format!(
            "X-Amz-Algorithm={}&X-Amz-Credential={}%2F{}&X-Amz-Date={}&X-Amz-Expires={}",
            ALGORITHM,
            self.credentials.access_key_id,
            encode(&self.credential_scope(timestamp)),
            encode(&format_timestamp(timestamp)),
            EXPIRES_SECS
        );
        let nonce_hash = hex::encode(Sha256::digest(nonce.as_bytes()));
        format!(
            "PUT\n/authenticate\n{}\nhost:{}\n\nhost\n{}",
            query, SERVICE, nonce_hash
        )
    }

    fn string_to_sign(&self, nonce: &str, timestamp: DateTime<Utc>) -> String {
        let request_hash = hex::encode(Sha256::digest(
            self.canonical_request(nonce, timestamp).as_bytes(),
        ));
        format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            format_timestamp(timestamp),
            self.credential_scope(timestamp),
            request_hash
        )
    }

    fn signature(&self, nonce: &str, timestamp: DateTime<Utc>) -> Result<String, StoreError> {
        let date_stamp = timestamp.format("%Y%m%d").to_string();
        let k_date = hmac_sha256(
            format!("AWS4{}", self.credentials.secret_access_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = hmac_sha256(&k_date, self.credentials.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, SERVICE.as_bytes())?;
        let k_signing = hmac_sha256(&k_service, b"aws4_request")?;

        let signature = hmac_sha256(
            &k_signing,
            self.string_to_sign(nonce, timestamp).as_bytes(),
        )?;
        Ok(hex::encode(signature))
    }
}

/// Pull the nonce out of a server challenge
pub fn extract_nonce(challenge: &[u8]) -> Result<String, StoreError> {
    let text = std::str::from_utf8(challenge)
        .map_err(|e| StoreError::Internal(format!("Auth challenge is not UTF-8: {}", e)))?;

    text.split(',')
        .find_map(|part| part.trim().strip_prefix("nonce="))
        .filter(|nonce| !nonce.is_empty())
        .map(str::to_string)
        .ok_or_else(|| StoreError::Internal(format!("Auth challenge has no nonce: {}", text)))
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, StoreError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| StoreError::Internal(format!("HMAC key error: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
