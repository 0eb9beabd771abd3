// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Where token and resource requests are sent.
///
/// Defaults to the Microsoft endpoints; tests and the CLI overrides point
/// this at a mock server instead.
#[derive(Clone, Debug)]
pub struct Endpoints {
    pub token_url: String,
    pub graph_base: String,
    pub scope: String,
}

impl Endpoints {
    pub fn microsoft(tenant_id: &str) -> Self {
        Self {
            token_url: format!(
                "https://login.microsoftonline.com/{tenant_id}/oauth2/v2.0/token"
            ),
            graph_base: String::from("https://graph.microsoft.com/v1.0/"),
            scope: String::from("https://graph.microsoft.com/.default"),
        }
    }

    pub fn with_base(token_url: String, graph_base: String) -> Self {
        Self {
            token_url,
            graph_base: Self::normalize_base(graph_base),
            scope: String::from("https://graph.microsoft.com/.default"),
        }
    }

    /// Resource paths are joined onto the base, so the base must end in a
    /// slash.
    pub fn normalize_base(graph_base: String) -> String {
        if graph_base.ends_with('/') { graph_base } else { format!("{graph_base}/") }
    }

    pub fn resource_url(&self, path: &str) -> String {
        format!("{}{}", self.graph_base, path)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_microsoft_endpoints() {
        let endpoints = Endpoints::microsoft("11111111-2222-3333-4444-555555555555");

        assert_eq!(
            endpoints.token_url,
            "https://login.microsoftonline.com/11111111-2222-3333-4444-555555555555/oauth2/v2.0/token"
        );
        assert_eq!(
            endpoints.resource_url("users?$top=5"),
            "https://graph.microsoft.com/v1.0/users?$top=5"
        );
    }

    #[test]
    fn test_base_is_normalized() {
        let endpoints = Endpoints::with_base(
            String::from("http://127.0.0.1:4567/oauth2/t/v2.0/token"),
            String::from("http://127.0.0.1:4567/v1.0"),
        );

        assert_eq!(endpoints.resource_url("teams"), "http://127.0.0.1:4567/v1.0/teams");
    }

    #[test]
    fn test_service_root_is_the_bare_base() {
        let endpoints = Endpoints::microsoft("tenant");

        assert_eq!(endpoints.resource_url(""), "https://graph.microsoft.com/v1.0/");
    }
}
