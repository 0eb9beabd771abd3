// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A mock of the Azure AD token endpoint and a handful of Microsoft Graph
//! resource collections, just enough for exercising the connection
//! analyzer. Which collections the fake tenant grants is configurable per
//! server instance.

use std::net::SocketAddr;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use dropshot::ApiDescription;
use dropshot::Body;
use dropshot::ConfigDropshot;
use dropshot::HttpError;
use dropshot::HttpServer;
use dropshot::Path;
use dropshot::Query;
use dropshot::RequestContext;
use dropshot::ServerBuilder;
use dropshot::TypedBody;
use dropshot::endpoint;
use http::Response;
use http::StatusCode;
use schemars::JsonSchema;
use serde::Deserialize;
use slog::Drain;
use uuid::Uuid;

mod resources;
mod token;

pub use resources::*;
pub use token::*;

/// Which Graph collections the fake tenant has granted to the client,
/// and the role claims embedded in tokens it issues.
#[derive(Clone, Debug)]
pub struct Grants {
    pub organization: bool,
    pub directory_objects: bool,
    pub users: bool,
    pub groups: bool,
    pub drives: bool,
    pub sites: bool,
    pub mail_users: bool,
    pub messages: bool,
    pub teams: bool,
    pub roles: Vec<String>,
}

impl Grants {
    pub fn all() -> Self {
        Self {
            organization: true,
            directory_objects: true,
            users: true,
            groups: true,
            drives: true,
            sites: true,
            mail_users: true,
            messages: true,
            teams: true,
            roles: vec![
                String::from("Directory.Read.All"),
                String::from("User.Read.All"),
                String::from("Mail.Read"),
            ],
        }
    }

    pub fn none() -> Self {
        Self {
            organization: false,
            directory_objects: false,
            users: false,
            groups: false,
            drives: false,
            sites: false,
            mail_users: false,
            messages: false,
            teams: false,
            roles: Vec::new(),
        }
    }
}

/// The one app registration the mock token endpoint accepts.
#[derive(Clone, Debug)]
pub struct MockConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub grants: Grants,
    /// Issue a token whose payload segment does not decode, for exercising
    /// the analyzer's claim-parse failure path.
    pub malformed_token: bool,
}

impl MockConfig {
    pub fn new(grants: Grants) -> Self {
        Self {
            tenant_id: String::from("test-tenant"),
            client_id: String::from("test-client"),
            client_secret: String::from("test-secret"),
            grants,
            malformed_token: false,
        }
    }
}

pub struct ServerContext {
    pub config: MockConfig,
}

pub fn create_http_server(
    bind_addr: Option<SocketAddr>,
    config: MockConfig,
) -> anyhow::Result<HttpServer<Arc<ServerContext>>> {
    let config_dropshot = ConfigDropshot {
        bind_address: bind_addr.unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 0))),
        ..Default::default()
    };

    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let log = slog::Logger::root(drain, slog::o!("component" => "graph-probe-test-server"));

    let mut api = ApiDescription::new();
    register_endpoints(&mut api)?;

    let server = ServerBuilder::new(api, Arc::new(ServerContext { config }), log)
        .config(config_dropshot)
        .start()
        .map_err(|e| anyhow::anyhow!("failed to start mock server: {e}"))?;

    Ok(server)
}

fn register_endpoints(api: &mut ApiDescription<Arc<ServerContext>>) -> anyhow::Result<()> {
    api.register(issue_token).map_err(anyhow::Error::msg)?;
    api.register(get_service_root).map_err(anyhow::Error::msg)?;
    api.register(get_organization).map_err(anyhow::Error::msg)?;
    api.register(get_directory_objects).map_err(anyhow::Error::msg)?;
    api.register(list_users).map_err(anyhow::Error::msg)?;
    api.register(list_user_messages).map_err(anyhow::Error::msg)?;
    api.register(list_groups).map_err(anyhow::Error::msg)?;
    api.register(list_drives).map_err(anyhow::Error::msg)?;
    api.register(list_sites).map_err(anyhow::Error::msg)?;
    api.register(list_teams).map_err(anyhow::Error::msg)?;
    Ok(())
}

pub(crate) fn json_response(
    status: StatusCode,
    body: serde_json::Value,
) -> Result<Response<Body>, HttpError> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(body.to_string().into())
        .unwrap())
}

/// Graph-style error body for a collection the tenant has not granted.
pub(crate) fn request_denied() -> Result<Response<Body>, HttpError> {
    json_response(
        StatusCode::FORBIDDEN,
        serde_json::json!({
            "error": {
                "code": "Authorization_RequestDenied",
                "message": "Insufficient privileges to complete the operation.",
            }
        }),
    )
}

/// Rejects requests that carry no bearer token at all. The token contents
/// are not checked; grants are what gate the collections.
pub(crate) fn require_bearer(
    rqctx: &RequestContext<Arc<ServerContext>>,
) -> Option<Result<Response<Body>, HttpError>> {
    let authorized = rqctx
        .request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("Bearer "));

    if authorized {
        None
    } else {
        Some(json_response(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({
                "error": {
                    "code": "InvalidAuthenticationToken",
                    "message": "Access token is empty.",
                }
            }),
        ))
    }
}

/// The OData query options the analyzer sends.
#[derive(Deserialize, JsonSchema)]
pub struct GraphQueryParams {
    #[serde(rename = "$top")]
    pub top: Option<u32>,

    #[serde(rename = "$filter")]
    pub filter: Option<String>,

    #[serde(rename = "$select")]
    pub select: Option<String>,
}
