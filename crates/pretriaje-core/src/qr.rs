//! QR entry tokens.
//!
//! Two token shapes open a session. A campaign's current token is the short
//! random string printed in the rotating QR code. A stateless token is a
//! base64url JSON blob `{"c": campaign_id, "e": expiry_ms}` that can be
//! checked without looking the campaign up.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::QrError;
use crate::models::campaign::Campaign;

/// Lifetime of a freshly rotated campaign token.
pub const ROTATED_TOKEN_TTL: SignedDuration = SignedDuration::from_hours(12);

/// Generate a new 8-character campaign token.
pub fn issue_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(8);
    token
}

/// Replace the campaign's current token and push its expiry forward.
pub fn rotate(campaign: &mut Campaign, now: Timestamp) -> String {
    let token = issue_token();
    campaign.qr_token_current = token.clone();
    campaign.qr_token_expires_at = Some(now + ROTATED_TOKEN_TTL);
    token
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatelessToken {
    /// Campaign id.
    pub c: String,
    /// Expiry in Unix milliseconds.
    pub e: i64,
}

impl StatelessToken {
    pub fn new(campaign_id: impl Into<String>, expires_at: Timestamp) -> Self {
        Self {
            c: campaign_id.into(),
            e: expires_at.as_millisecond(),
        }
    }

    pub fn encode(&self) -> String {
        // Serializing two plain fields cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Returns `None` for anything that is not a base64url JSON token.
    pub fn decode(token: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(token.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Decide whether `token` may open a session for `campaign_id`.
///
/// A stateless token for this campaign that has not expired is accepted
/// outright. Any expired stateless token is rejected. Otherwise the token must
/// match the campaign's current, unexpired token.
pub fn validate_entry(
    campaign: Option<&Campaign>,
    campaign_id: &str,
    token: &str,
    now: Timestamp,
) -> Result<(), QrError> {
    let now_ms = now.as_millisecond();
    if let Some(stateless) = StatelessToken::decode(token) {
        if stateless.e <= now_ms {
            return Err(QrError::Expired);
        }
        if stateless.c == campaign_id {
            return Ok(());
        }
    }

    let campaign = campaign.ok_or(QrError::CampaignNotFound)?;
    if campaign.qr_token_current != token {
        return Err(QrError::InvalidToken);
    }
    if let Some(expires_at) = campaign.qr_token_expires_at
        && expires_at < now
    {
        return Err(QrError::Expired);
    }
    Ok(())
}
