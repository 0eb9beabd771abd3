// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::Context;
use anyhow::bail;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde::Serialize;

/// Body of a successful client-credentials token response.
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

/// The subset of access-token claims the analyzer reports on.
///
/// `roles` carries the application permissions granted to the client; the
/// other fields are descriptive. Anything else in the payload is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TokenClaims {
    pub roles: Option<Vec<String>>,
    pub app_displayname: Option<String>,
    pub aud: Option<String>,
}

/// Decodes the payload segment of a JWT-shaped access token.
///
/// The token is not validated in any way; this only base64url-decodes the
/// middle segment and parses it as JSON so embedded claims can be shown.
pub fn decode_token_claims(access_token: &str) -> anyhow::Result<TokenClaims> {
    let mut segments = access_token.split('.');
    let payload = match (segments.next(), segments.next()) {
        (Some(_header), Some(payload)) => payload,
        _ => bail!("token is not in JWT format"),
    };

    // Issuers are inconsistent about padding the segment.
    let decoded = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .context("token payload is not valid base64url")?;

    serde_json::from_slice(&decoded).context("token payload is not valid JSON")
}
