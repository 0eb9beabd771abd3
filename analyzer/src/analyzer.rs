// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::Context;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use serde::Deserialize;

use graph_probe::AnalysisResults;
use graph_probe::Credentials;
use graph_probe::Endpoints;
use graph_probe::ServiceCategory;
use graph_probe::ServiceStatus;
use graph_probe::TokenResponse;
use graph_probe::decode_token_claims;

/// Drives the probe sequence: one token request, then a fixed series of
/// independent GETs, each classified by HTTP status. Progress is echoed to
/// the console as it happens; everything learned lands in the returned
/// [`AnalysisResults`].
pub struct Analyzer {
    endpoints: Endpoints,
    client: Client,
}

enum TokenOutcome {
    Issued(TokenResponse),
    Rejected { status: u16, body: String },
}

enum PageAccess {
    Granted(ListPage),
    Denied(u16),
}

enum MailAccess {
    Granted(Vec<MailUser>),
    Denied(u16),
}

/// A Graph collection response; only the entry count and (for the service
/// root) the entry kinds matter here.
#[derive(Deserialize)]
struct ListPage {
    #[serde(default)]
    value: Vec<serde_json::Value>,
}

impl ListPage {
    fn kind_count(&self, kind: &str) -> usize {
        self.value
            .iter()
            .filter(|entry| entry.get("kind").and_then(|k| k.as_str()) == Some(kind))
            .count()
    }
}

#[derive(Deserialize)]
struct MailUserPage {
    #[serde(default)]
    value: Vec<MailUser>,
}

#[derive(Deserialize)]
struct MailUser {
    id: String,
}

impl Analyzer {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints, client: Client::new() }
    }

    /// Runs the full probe sequence. Authentication failure short-circuits
    /// the resource probes; after that every step is independent and a
    /// fault in one never aborts the rest.
    pub fn run(&self, credentials: &Credentials) -> AnalysisResults {
        let mut results = AnalysisResults::new();

        println!("\n🔑 TESTING AUTHENTICATION...");
        let token = match self.acquire_token(credentials, &mut results) {
            Some(token) => token,
            None => return results,
        };

        println!("\n🌐 TESTING SERVICE ROOT ACCESS...");
        self.probe_service_root(&token, &mut results);

        println!("\n📁 TESTING DIRECTORY ACCESS...");
        self.probe_directory(&token, &mut results);

        println!("\n👤 TESTING USERS ACCESS...");
        self.probe_listing(
            &token,
            &mut results,
            ServiceCategory::Users,
            "users?$top=5",
            "Users data",
            |n| format!("Users data accessible (sample of {n} users)"),
        );

        println!("\n👥 TESTING GROUPS ACCESS...");
        self.probe_listing(
            &token,
            &mut results,
            ServiceCategory::Groups,
            "groups?$top=5",
            "Groups data",
            |n| format!("Groups data accessible (sample of {n} groups)"),
        );

        println!("\n📄 TESTING FILES ACCESS...");
        self.probe_listing(
            &token,
            &mut results,
            ServiceCategory::Files,
            "drives",
            "Drives",
            |n| format!("Drives accessible ({n} drives)"),
        );

        println!("\n🌐 TESTING SHAREPOINT SITES ACCESS...");
        self.probe_listing(
            &token,
            &mut results,
            ServiceCategory::Sites,
            "sites",
            "SharePoint sites",
            |n| format!("SharePoint sites accessible ({n} sites)"),
        );

        println!("\n✉️ TESTING MAIL ACCESS...");
        self.probe_mail(&token, &mut results);

        println!("\n👥 TESTING TEAMS ACCESS...");
        self.probe_listing(
            &token,
            &mut results,
            ServiceCategory::Teams,
            "teams",
            "Teams",
            |n| format!("Teams accessible ({n} teams)"),
        );

        results
    }

    fn acquire_token(
        &self,
        credentials: &Credentials,
        results: &mut AnalysisResults,
    ) -> Option<String> {
        match self.request_token(credentials) {
            Ok(TokenOutcome::Issued(token)) => {
                results.authentication.status = ServiceStatus::Success;
                results.authentication.details.push(format!(
                    "Token type: {}",
                    token.token_type.as_deref().unwrap_or("Unknown")
                ));
                results.authentication.details.push(match token.expires_in {
                    Some(seconds) => format!("Expires in: {seconds} seconds"),
                    None => String::from("Expires in: Unknown"),
                });

                inspect_claims(&token.access_token, results);

                println!("✅ Authentication successful");
                Some(token.access_token)
            }

            Ok(TokenOutcome::Rejected { status, body }) => {
                results.authentication.status = ServiceStatus::Failed;
                results.authentication.details.push(format!("Status code: {status}"));
                results.authentication.details.push(format!("Error: {body}"));

                println!("❌ Authentication failed: {status}");
                println!("Error details: {body}");
                None
            }

            Err(error) => {
                results.authentication.status = ServiceStatus::Error;
                results.authentication.details.push(format!("Exception: {error:#}"));

                println!("❌ Authentication error: {error:#}");
                None
            }
        }
    }

    fn request_token(&self, credentials: &Credentials) -> anyhow::Result<TokenOutcome> {
        let response = self
            .client
            .post(&self.endpoints.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("scope", self.endpoints.scope.as_str()),
            ])
            .send()
            .context("token request failed")?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Ok(TokenOutcome::Rejected { status: status.as_u16(), body });
        }

        let token: TokenResponse =
            response.json().context("token response is not valid JSON")?;
        Ok(TokenOutcome::Issued(token))
    }

    fn probe_service_root(&self, token: &str, results: &mut AnalysisResults) {
        match self.fetch_page(token, "") {
            Ok(PageAccess::Granted(page)) => {
                let entity_sets = page.kind_count("EntitySet");
                let singletons = page.kind_count("Singleton");

                println!("✅ Service root access successful");
                results.authentication.details.push(format!(
                    "Available endpoints: {} total ({entity_sets} EntitySets, {singletons} Singletons)",
                    page.value.len()
                ));
            }

            Ok(PageAccess::Denied(status)) => {
                println!("❌ Service root access failed: {status}");
                results
                    .authentication
                    .details
                    .push(format!("Service root not accessible ({status})"));
            }

            Err(error) => {
                println!("❌ Service root access error: {error:#}");
                results
                    .authentication
                    .details
                    .push(format!("Service root error: {error:#}"));
            }
        }
    }

    /// Directory gets its status from the organization endpoint; the
    /// directoryObjects check only contributes a detail line.
    fn probe_directory(&self, token: &str, results: &mut AnalysisResults) {
        self.probe_listing(
            token,
            results,
            ServiceCategory::Directory,
            "organization",
            "Organization data",
            |n| format!("Organization data accessible ({n} organizations)"),
        );

        match self.fetch_page(token, "directoryObjects") {
            Ok(PageAccess::Granted(_)) => {
                println!("✅ Directory objects accessible");
                results.add_detail(ServiceCategory::Directory, "Directory objects accessible");
            }

            Ok(PageAccess::Denied(status)) => {
                println!("❌ Directory objects not accessible: {status}");
                results.add_detail(
                    ServiceCategory::Directory,
                    format!("Directory objects not accessible ({status})"),
                );
            }

            Err(error) => {
                println!("❌ Directory objects error: {error:#}");
                results.add_detail(
                    ServiceCategory::Directory,
                    format!("Directory objects error: {error:#}"),
                );
            }
        }
    }

    fn probe_listing<F>(
        &self,
        token: &str,
        results: &mut AnalysisResults,
        category: ServiceCategory,
        path: &str,
        label: &str,
        granted_detail: F,
    ) where
        F: FnOnce(usize) -> String,
    {
        match self.fetch_page(token, path) {
            Ok(PageAccess::Granted(page)) => {
                let detail = granted_detail(page.value.len());
                println!("✅ {detail}");
                results.set_status(category, ServiceStatus::Available);
                results.add_detail(category, detail);
            }

            Ok(PageAccess::Denied(status)) => {
                println!("❌ {label} not accessible: {status}");
                results.set_status(category, ServiceStatus::Limited);
                results.add_detail(category, format!("{label} not accessible ({status})"));
            }

            Err(error) => {
                println!("❌ {label} error: {error:#}");
                results.add_detail(category, format!("{label} error: {error:#}"));
            }
        }
    }

    /// Mail is probed in two stages: first the mail-enabled users, then the
    /// first such user's mailbox. The second stage only runs when the first
    /// returned anyone.
    fn probe_mail(&self, token: &str, results: &mut AnalysisResults) {
        let mail_users = match self.fetch_mail_users(token) {
            Ok(MailAccess::Granted(users)) => {
                let detail = format!("Mail users accessible ({} users with mail)", users.len());
                println!("✅ {detail}");
                results.set_status(ServiceCategory::Mail, ServiceStatus::Available);
                results.add_detail(ServiceCategory::Mail, detail);
                users
            }

            Ok(MailAccess::Denied(status)) => {
                println!("❌ Mail users not accessible: {status}");
                results.set_status(ServiceCategory::Mail, ServiceStatus::Limited);
                results.add_detail(
                    ServiceCategory::Mail,
                    format!("Mail users not accessible ({status})"),
                );
                return;
            }

            Err(error) => {
                println!("❌ Mail access error: {error:#}");
                results
                    .add_detail(ServiceCategory::Mail, format!("Mail access error: {error:#}"));
                return;
            }
        };

        let Some(user) = mail_users.first() else {
            return;
        };

        match self.fetch_status(token, &format!("users/{}/messages?$top=5", user.id)) {
            Ok(200) => {
                println!("✅ Mailbox content accessible");
                results.add_detail(ServiceCategory::Mail, "Mailbox content accessible");
            }

            Ok(status) => {
                println!("❌ Mailbox content not accessible: {status}");
                results.add_detail(
                    ServiceCategory::Mail,
                    format!("Mailbox content not accessible ({status})"),
                );
            }

            Err(error) => {
                println!("❌ Mailbox access error: {error:#}");
                results.add_detail(
                    ServiceCategory::Mail,
                    format!("Mailbox access error: {error:#}"),
                );
            }
        }
    }

    fn fetch_mail_users(&self, token: &str) -> anyhow::Result<MailAccess> {
        let response = self
            .client
            .get(self.endpoints.resource_url("users"))
            .query(&[
                ("$filter", "mail ne null"),
                ("$select", "id,displayName,mail"),
                ("$top", "5"),
            ])
            .bearer_auth(token)
            .send()
            .context("mail users request failed")?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(MailAccess::Denied(status.as_u16()));
        }

        let page: MailUserPage =
            response.json().context("mail users response is not a Graph collection")?;
        Ok(MailAccess::Granted(page.value))
    }

    fn fetch_page(&self, token: &str, path: &str) -> anyhow::Result<PageAccess> {
        let response = self.get(token, path)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(PageAccess::Denied(status.as_u16()));
        }

        let page: ListPage =
            response.json().context("response body is not a Graph collection")?;
        Ok(PageAccess::Granted(page))
    }

    fn fetch_status(&self, token: &str, path: &str) -> anyhow::Result<u16> {
        Ok(self.get(token, path)?.status().as_u16())
    }

    fn get(&self, token: &str, path: &str) -> anyhow::Result<Response> {
        // The service root is probed without the trailing slash.
        let url = if path.is_empty() {
            self.endpoints.graph_base.trim_end_matches('/').to_string()
        } else {
            self.endpoints.resource_url(path)
        };

        self.client
            .get(&url)
            .bearer_auth(token)
            .send()
            .with_context(|| format!("GET {url} failed"))
    }
}

fn inspect_claims(access_token: &str, results: &mut AnalysisResults) {
    match decode_token_claims(access_token) {
        Ok(claims) => {
            if let Some(roles) = claims.roles {
                results
                    .authentication
                    .details
                    .push(format!("Application has {} role(s)", roles.len()));
                results.permissions = roles;
            }

            if let Some(name) = claims.app_displayname {
                results.authentication.details.push(format!("App name: {name}"));
            }

            if let Some(audience) = claims.aud {
                results.authentication.details.push(format!("Audience: {audience}"));
            }
        }

        Err(error) => {
            results
                .authentication
                .details
                .push(format!("Could not parse token payload: {error:#}"));
        }
    }
}
