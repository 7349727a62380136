//! Admin shared-secret verification.
//!
//! The supplied credential and the configured secret are each run through
//! HMAC-SHA256 under the same fixed key, and the two tags are compared
//! with [`Mac::verify_slice`], which runs in constant time. This keeps the
//! comparison from leaking how many leading bytes matched.

use anyhow::{anyhow, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use faqdesk_core::resolver::CredentialCheck;

type HmacSha256 = Hmac<Sha256>;

const TAG_KEY: &[u8] = b"faqdesk-admin-secret";

/// The configured admin secret, stored only as its HMAC tag.
pub struct AdminSecret {
    tag: Vec<u8>,
}

impl AdminSecret {
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("admin secret must not be empty");
        }
        Ok(Self {
            tag: tag_for(secret.as_bytes())?,
        })
    }
}

fn mac_over(secret: &[u8]) -> Result<HmacSha256> {
    let mut mac =
        HmacSha256::new_from_slice(TAG_KEY).map_err(|e| anyhow!("invalid hmac key: {}", e))?;
    mac.update(secret);
    Ok(mac)
}

fn tag_for(secret: &[u8]) -> Result<Vec<u8>> {
    Ok(mac_over(secret)?.finalize().into_bytes().to_vec())
}

impl CredentialCheck for AdminSecret {
    fn verify(&self, provided: &str) -> bool {
        match mac_over(provided.as_bytes()) {
            Ok(mac) => mac.verify_slice(&self.tag).is_ok(),
            Err(_) => false,
        }
    }
}
