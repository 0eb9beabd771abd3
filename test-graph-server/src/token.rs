// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

#[derive(Deserialize, JsonSchema)]
pub struct TokenPathParam {
    tenant_id: String,
}

#[derive(Deserialize, JsonSchema)]
pub struct TokenForm {
    pub grant_type: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: Option<String>,
}

#[endpoint {
    method = POST,
    path = "/oauth2/{tenant_id}/v2.0/token",
    content_type = "application/x-www-form-urlencoded",
}]
pub async fn issue_token(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<TokenPathParam>,
    body: TypedBody<TokenForm>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    let config = &apictx.config;
    let path_param = path_param.into_inner();
    let form = body.into_inner();

    if form.grant_type != "client_credentials" {
        return json_response(
            StatusCode::BAD_REQUEST,
            serde_json::json!({
                "error": "unsupported_grant_type",
                "error_description":
                    "Only the client_credentials grant is supported.",
            }),
        );
    }

    if path_param.tenant_id != config.tenant_id
        || form.client_id != config.client_id
        || form.client_secret != config.client_secret
    {
        return json_response(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({
                "error": "invalid_client",
                "error_description":
                    "AADSTS7000215: Invalid client secret provided.",
            }),
        );
    }

    let access_token = if config.malformed_token {
        String::from("not-a-well-formed-token")
    } else {
        mint_token(config)
    };

    let response = graph_probe::TokenResponse {
        access_token,
        token_type: Some(String::from("Bearer")),
        expires_in: Some(3599),
    };

    json_response(StatusCode::OK, serde_json::to_value(&response).unwrap())
}

/// Builds a JWT-shaped token: base64url header and claims plus a fake
/// signature segment. Nothing verifies it; the analyzer only decodes the
/// claims.
fn mint_token(config: &MockConfig) -> String {
    let header = serde_json::json!({ "typ": "JWT", "alg": "none" });

    let now = Utc::now().timestamp();
    let mut claims = serde_json::Map::new();
    claims.insert(String::from("aud"), "https://graph.microsoft.com".into());
    claims.insert(String::from("appid"), config.client_id.clone().into());
    claims.insert(
        String::from("app_displayname"),
        "Graph Probe Test App".into(),
    );
    claims.insert(String::from("iat"), now.into());
    claims.insert(String::from("exp"), (now + 3599).into());
    if !config.grants.roles.is_empty() {
        claims.insert(String::from("roles"), config.grants.roles.clone().into());
    }

    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(serde_json::Value::Object(claims).to_string()),
        URL_SAFE_NO_PAD.encode("mock-signature"),
    )
}
