// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end runs of the analyzer against the in-process mock Graph
//! server, with the grant set varied per test.

use graph_probe::AnalysisResults;
use graph_probe::Credentials;
use graph_probe::Endpoints;
use graph_probe::ServiceCategory;
use graph_probe::ServiceStatus;
use graph_probe::write_report;
use graph_probe_analyzer::Analyzer;
use graph_probe_test_server::Grants;
use graph_probe_test_server::MockConfig;
use graph_probe_test_server::create_http_server;

fn test_credentials() -> Credentials {
    Credentials {
        tenant_id: String::from("test-tenant"),
        client_id: String::from("test-client"),
        client_secret: String::from("test-secret"),
    }
}

/// Starts the mock server on a multi-threaded runtime, runs the blocking
/// analyzer against it from this thread, then shuts the server down.
fn run_against_mock(config: MockConfig, credentials: &Credentials) -> AnalysisResults {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");

    let server = {
        let _guard = rt.enter();
        create_http_server(None, config).expect("mock server")
    };
    let addr = server.local_addr();

    let endpoints = Endpoints::with_base(
        format!("http://{addr}/oauth2/{}/v2.0/token", credentials.tenant_id),
        format!("http://{addr}/v1.0"),
    );

    let results = Analyzer::new(endpoints).run(credentials);

    rt.block_on(server.close()).expect("closing mock server");

    results
}

#[test]
fn full_grants_report_every_service_available() {
    let credentials = test_credentials();
    let results = run_against_mock(MockConfig::new(Grants::all()), &credentials);

    assert_eq!(results.authentication.status, ServiceStatus::Success);
    assert!(
        results
            .authentication
            .details
            .iter()
            .any(|d| d == "Token type: Bearer")
    );

    for (category, result) in results.services() {
        assert_eq!(result.status, ServiceStatus::Available, "category {category}");
    }
    assert_eq!(results.available_services(), 7);
    assert_eq!(results.inaccessible_services(), 0);

    // Role claims from the token surface verbatim.
    for role in Grants::all().roles {
        assert!(results.permissions.contains(&role), "missing role {role}");
    }

    // The second mail stage ran and found the mailbox readable.
    assert!(
        results
            .mail
            .details
            .iter()
            .any(|d| d == "Mailbox content accessible")
    );

    // Nothing to recommend when everything is reachable.
    assert!(results.recommendations().is_empty());
}

#[test]
fn denied_collections_report_limited_never_available() {
    let mut grants = Grants::all();
    grants.users = false;
    grants.teams = false;

    let credentials = test_credentials();
    let results = run_against_mock(MockConfig::new(grants), &credentials);

    assert_eq!(results.users.status, ServiceStatus::Limited);
    assert!(results.users.details.iter().any(|d| d.contains("(403)")));
    assert_eq!(results.teams.status, ServiceStatus::Limited);

    // Collections that stayed granted are unaffected.
    assert_eq!(results.groups.status, ServiceStatus::Available);
    assert_eq!(results.files.status, ServiceStatus::Available);

    let recommendations = results.recommendations().join("\n");
    assert!(recommendations.contains("User.Read.All"));
    assert!(recommendations.contains("Team.ReadBasic.All"));
    assert!(!recommendations.contains("Group.Read.All"));
}

#[test]
fn no_grants_and_no_roles_leave_everything_limited() {
    let credentials = test_credentials();
    let results = run_against_mock(MockConfig::new(Grants::none()), &credentials);

    // Authentication itself still succeeds; the token just grants nothing.
    assert_eq!(results.authentication.status, ServiceStatus::Success);
    assert!(results.permissions.is_empty());
    assert!(
        !results
            .authentication
            .details
            .iter()
            .any(|d| d.starts_with("Application has")),
        "no roles claim should mean no role count detail"
    );

    for (category, result) in results.services() {
        assert_eq!(result.status, ServiceStatus::Limited, "category {category}");
    }
    assert_eq!(results.recommendations().len(), 8);
}

#[test]
fn denied_mail_users_skip_the_mailbox_stage() {
    let mut grants = Grants::all();
    grants.mail_users = false;

    let credentials = test_credentials();
    let results = run_against_mock(MockConfig::new(grants), &credentials);

    assert_eq!(results.mail.status, ServiceStatus::Limited);
    assert!(
        !results
            .mail
            .details
            .iter()
            .any(|d| d.contains("Mailbox content"))
    );
}

#[test]
fn readable_mail_users_with_unreadable_mailbox_stay_available() {
    let mut grants = Grants::all();
    grants.messages = false;

    let credentials = test_credentials();
    let results = run_against_mock(MockConfig::new(grants), &credentials);

    assert_eq!(results.mail.status, ServiceStatus::Available);
    assert!(
        results
            .mail
            .details
            .iter()
            .any(|d| d.contains("Mailbox content not accessible"))
    );
}

#[test]
fn rejected_credentials_short_circuit_resource_probes() {
    let mut credentials = test_credentials();
    credentials.client_secret = String::from("wrong-secret");

    let results = run_against_mock(MockConfig::new(Grants::all()), &credentials);

    assert_eq!(results.authentication.status, ServiceStatus::Failed);
    assert!(
        results
            .authentication
            .details
            .iter()
            .any(|d| d == "Status code: 401")
    );

    // No resource probe ran.
    for (category, result) in results.services() {
        assert_eq!(result.status, ServiceStatus::NotTested, "category {category}");
        assert!(result.details.is_empty(), "category {category}");
    }
    assert!(results.permissions.is_empty());
}

#[test]
fn malformed_token_payload_does_not_abort_the_run() {
    let mut config = MockConfig::new(Grants::all());
    config.malformed_token = true;

    let credentials = test_credentials();
    let results = run_against_mock(config, &credentials);

    assert_eq!(results.authentication.status, ServiceStatus::Success);
    assert!(
        results
            .authentication
            .details
            .iter()
            .any(|d| d.starts_with("Could not parse token payload"))
    );
    assert!(results.permissions.is_empty());

    // The probes still ran with the opaque bearer token.
    assert_eq!(results.users.status, ServiceStatus::Available);
}

#[test]
fn report_file_contains_each_service_section() {
    let mut grants = Grants::all();
    grants.sites = false;

    let credentials = test_credentials();
    let results = run_against_mock(MockConfig::new(grants), &credentials);

    let dir = std::env::temp_dir().join(format!("graph-probe-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create report dir");

    let path = write_report(&results, &dir).expect("write report");

    let name = path.file_name().and_then(|n| n.to_str()).expect("report file name");
    assert!(name.starts_with("graph_api_report_"));
    assert!(name.ends_with(".txt"));

    let report = std::fs::read_to_string(&path).expect("read report");
    assert!(report.contains("AUTHENTICATION:"));
    for (category, result) in results.services() {
        let section =
            format!("{}: {}", category.to_string().to_uppercase(), result.status);
        assert!(report.contains(&section), "missing section {section}");
    }
    assert!(report.contains("SITES: Limited"));
    assert!(report.contains("PERMISSIONS:"));
    assert!(report.contains("- User.Read.All"));

    std::fs::remove_dir_all(&dir).expect("remove report dir");
}

#[test]
fn service_root_breakdown_lands_in_auth_details() {
    let credentials = test_credentials();
    let results = run_against_mock(MockConfig::new(Grants::all()), &credentials);

    assert!(
        results
            .authentication
            .details
            .iter()
            .any(|d| d.starts_with("Available endpoints:") && d.contains("Singleton")),
        "auth details: {:?}",
        results.authentication.details
    );
}

// ServiceCategory is re-exported so callers can address individual results;
// make sure the probe order covers every category exactly once.
#[test]
fn services_iterate_in_probe_order() {
    let results = AnalysisResults::new();
    let categories: Vec<ServiceCategory> =
        results.services().iter().map(|(c, _)| *c).collect();

    assert_eq!(categories, ServiceCategory::ALL.to_vec());
}
