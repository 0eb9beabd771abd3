// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;

use graph_probe::AnalysisResults;
use graph_probe::Credentials;
use graph_probe::Endpoints;
use graph_probe::ServiceStatus;
use graph_probe::write_report;
use graph_probe_analyzer::Analyzer;
use graph_probe_analyzer::prompt;

#[derive(Debug, Parser)]
#[clap(about = "Microsoft Graph API connection analyzer")]
struct Args {
    /// Azure AD tenant ID (prompted for when absent)
    #[clap(long, env = "GRAPH_TENANT_ID")]
    tenant_id: Option<String>,

    /// Application (client) ID (prompted for when absent)
    #[clap(long, env = "GRAPH_CLIENT_ID")]
    client_id: Option<String>,

    /// Client secret (prompted for when absent)
    #[clap(long, env = "GRAPH_CLIENT_SECRET")]
    client_secret: Option<String>,

    /// Override the OAuth2 token endpoint, e.g. to point at a mock server
    #[clap(long)]
    token_url: Option<String>,

    /// Override the Graph API base URL
    #[clap(long)]
    graph_url: Option<String>,

    /// Directory the report file is written into
    #[clap(long, default_value = ".")]
    report_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let opt: Args = Args::try_parse()?;

    banner("MICROSOFT GRAPH API CONNECTION ANALYZER");
    println!("This utility tests your Microsoft Graph API connection capabilities");
    println!("and provides detailed information about what your connection can access.");
    println!("{}", "-".repeat(70));

    let tenant_id = match opt.tenant_id {
        Some(value) => value,
        None => prompt("Enter your Azure AD Tenant ID: ")?,
    };
    let client_id = match opt.client_id {
        Some(value) => value,
        None => prompt("Enter your Application (client) ID: ")?,
    };
    let client_secret = match opt.client_secret {
        Some(value) => value,
        None => prompt("Enter your Client Secret: ")?,
    };

    let credentials = Credentials { tenant_id, client_id, client_secret };

    let mut endpoints = Endpoints::microsoft(&credentials.tenant_id);
    if let Some(token_url) = opt.token_url {
        endpoints.token_url = token_url;
    }
    if let Some(graph_url) = opt.graph_url {
        endpoints.graph_base = Endpoints::normalize_base(graph_url);
    }

    let analyzer = Analyzer::new(endpoints);
    let results = analyzer.run(&credentials);

    print_summary(&results);
    print_recommendations(&results);

    match write_report(&results, &opt.report_dir) {
        Ok(path) => println!("\nDetailed report saved to: {}", path.display()),
        Err(error) => println!("\nCould not save report to file: {error:#}"),
    }

    banner("THANK YOU FOR USING THE GRAPH API CONNECTION ANALYZER");

    Ok(())
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(70));
    println!("{title:^70}");
    println!("{}", "=".repeat(70));
}

fn print_summary(results: &AnalysisResults) {
    banner("MICROSOFT GRAPH API CONNECTION SUMMARY");

    println!("\nAuthentication: {}", results.authentication.status);

    println!("\nServices Access Summary:");
    println!("✅ Available: {}", results.available_services());
    println!("⚠️ Limited: {}", results.limited_services());
    println!("❌ Inaccessible: {}", results.inaccessible_services());

    println!("\nDetailed Access Report:");
    for (category, result) in results.services() {
        let marker =
            if result.status == ServiceStatus::Available { "✅" } else { "❌" };
        println!("\n{marker} {}: {}", category.to_string().to_uppercase(), result.status);
        for detail in &result.details {
            println!("   - {detail}");
        }
    }
}

fn print_recommendations(results: &AnalysisResults) {
    banner("PERMISSIONS RECOMMENDATIONS");

    for recommendation in results.recommendations() {
        println!("• {recommendation}");
    }

    println!("\nNote: After adding permissions, an admin must grant consent in the Azure portal");
}
