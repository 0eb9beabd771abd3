// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

#[endpoint {
    method = GET,
    path = "/v1.0"
}]
pub async fn get_service_root(
    rqctx: RequestContext<Arc<ServerContext>>,
) -> Result<Response<Body>, HttpError> {
    if let Some(denied) = require_bearer(&rqctx) {
        return denied;
    }

    json_response(
        StatusCode::OK,
        serde_json::json!({
            "value": [
                { "name": "users", "kind": "EntitySet", "url": "users" },
                { "name": "groups", "kind": "EntitySet", "url": "groups" },
                { "name": "drives", "kind": "EntitySet", "url": "drives" },
                { "name": "sites", "kind": "EntitySet", "url": "sites" },
                { "name": "teams", "kind": "EntitySet", "url": "teams" },
                { "name": "organization", "kind": "EntitySet", "url": "organization" },
                { "name": "me", "kind": "Singleton", "url": "me" },
            ]
        }),
    )
}

#[endpoint {
    method = GET,
    path = "/v1.0/organization"
}]
pub async fn get_organization(
    rqctx: RequestContext<Arc<ServerContext>>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    if let Some(denied) = require_bearer(&rqctx) {
        return denied;
    }
    if !apictx.config.grants.organization {
        return request_denied();
    }

    json_response(
        StatusCode::OK,
        serde_json::json!({
            "value": [
                {
                    "id": Uuid::new_v4(),
                    "displayName": "Dunder Mifflin",
                    "verifiedDomains": [
                        { "name": "dundermifflin.com", "isDefault": true }
                    ],
                }
            ]
        }),
    )
}

#[endpoint {
    method = GET,
    path = "/v1.0/directoryObjects"
}]
pub async fn get_directory_objects(
    rqctx: RequestContext<Arc<ServerContext>>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    if let Some(denied) = require_bearer(&rqctx) {
        return denied;
    }
    if !apictx.config.grants.directory_objects {
        return request_denied();
    }

    json_response(
        StatusCode::OK,
        serde_json::json!({
            "value": [
                { "id": Uuid::new_v4(), "@odata.type": "#microsoft.graph.user" },
                { "id": Uuid::new_v4(), "@odata.type": "#microsoft.graph.group" },
            ]
        }),
    )
}

#[endpoint {
    method = GET,
    path = "/v1.0/users"
}]
pub async fn list_users(
    rqctx: RequestContext<Arc<ServerContext>>,
    query_params: Query<GraphQueryParams>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    if let Some(denied) = require_bearer(&rqctx) {
        return denied;
    }
    let query_params = query_params.into_inner();

    // A `$filter` on mail is how the analyzer looks for mail-enabled
    // accounts; that variant is gated on the mail grant instead.
    let granted = if query_params.filter.is_some() {
        apictx.config.grants.mail_users
    } else {
        apictx.config.grants.users
    };
    if !granted {
        return request_denied();
    }

    let users = sample_users();
    let limit = query_params.top.unwrap_or(users.len() as u32) as usize;
    let users: Vec<_> = users.into_iter().take(limit).collect();

    json_response(StatusCode::OK, serde_json::json!({ "value": users }))
}

#[derive(Deserialize, JsonSchema)]
pub struct MessagesPathParam {
    pub user_id: String,
}

#[endpoint {
    method = GET,
    path = "/v1.0/users/{user_id}/messages"
}]
pub async fn list_user_messages(
    rqctx: RequestContext<Arc<ServerContext>>,
    _path_param: Path<MessagesPathParam>,
    _query_params: Query<GraphQueryParams>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    if let Some(denied) = require_bearer(&rqctx) {
        return denied;
    }
    if !apictx.config.grants.messages {
        return request_denied();
    }

    json_response(
        StatusCode::OK,
        serde_json::json!({
            "value": [
                {
                    "id": Uuid::new_v4(),
                    "subject": "Quarterly sales numbers",
                    "isRead": false,
                },
                {
                    "id": Uuid::new_v4(),
                    "subject": "Party planning committee",
                    "isRead": true,
                },
            ]
        }),
    )
}

#[endpoint {
    method = GET,
    path = "/v1.0/groups"
}]
pub async fn list_groups(
    rqctx: RequestContext<Arc<ServerContext>>,
    _query_params: Query<GraphQueryParams>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    if let Some(denied) = require_bearer(&rqctx) {
        return denied;
    }
    if !apictx.config.grants.groups {
        return request_denied();
    }

    json_response(
        StatusCode::OK,
        serde_json::json!({
            "value": [
                { "id": Uuid::new_v4(), "displayName": "Sales" },
                { "id": Uuid::new_v4(), "displayName": "Accounting" },
            ]
        }),
    )
}

#[endpoint {
    method = GET,
    path = "/v1.0/drives"
}]
pub async fn list_drives(
    rqctx: RequestContext<Arc<ServerContext>>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    if let Some(denied) = require_bearer(&rqctx) {
        return denied;
    }
    if !apictx.config.grants.drives {
        return request_denied();
    }

    json_response(
        StatusCode::OK,
        serde_json::json!({
            "value": [
                { "id": Uuid::new_v4(), "driveType": "documentLibrary", "name": "Documents" },
            ]
        }),
    )
}

#[endpoint {
    method = GET,
    path = "/v1.0/sites"
}]
pub async fn list_sites(
    rqctx: RequestContext<Arc<ServerContext>>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    if let Some(denied) = require_bearer(&rqctx) {
        return denied;
    }
    if !apictx.config.grants.sites {
        return request_denied();
    }

    json_response(
        StatusCode::OK,
        serde_json::json!({
            "value": [
                { "id": Uuid::new_v4(), "displayName": "Scranton Branch" },
            ]
        }),
    )
}

#[endpoint {
    method = GET,
    path = "/v1.0/teams"
}]
pub async fn list_teams(
    rqctx: RequestContext<Arc<ServerContext>>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    if let Some(denied) = require_bearer(&rqctx) {
        return denied;
    }
    if !apictx.config.grants.teams {
        return request_denied();
    }

    json_response(
        StatusCode::OK,
        serde_json::json!({
            "value": [
                { "id": Uuid::new_v4(), "displayName": "Office Admin" },
            ]
        }),
    )
}

fn sample_users() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({
            "id": Uuid::new_v4(),
            "displayName": "Dwight Schrute",
            "mail": "dschrute@dundermifflin.com",
        }),
        serde_json::json!({
            "id": Uuid::new_v4(),
            "displayName": "Jim Halpert",
            "mail": "jhalpert@dundermifflin.com",
        }),
        serde_json::json!({
            "id": Uuid::new_v4(),
            "displayName": "Pam Beesly",
            "mail": "pbeesly@dundermifflin.com",
        }),
    ]
}
