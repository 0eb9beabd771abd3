// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use chrono::DateTime;
use chrono::Local;

use super::*;

/// Renders the plain-text report: one AUTHENTICATION section, one section
/// per resource category, and the permission list from the token.
pub fn render_report(results: &AnalysisResults, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();

    out.push_str("MICROSOFT GRAPH API CONNECTION REPORT\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');
    out.push_str(&format!(
        "Generated on: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    out.push_str("AUTHENTICATION:\n");
    out.push_str(&format!("Status: {}\n", results.authentication.status));
    for detail in &results.authentication.details {
        out.push_str(&format!("- {detail}\n"));
    }

    out.push_str("\nSERVICE ACCESS SUMMARY:\n");
    for (category, result) in results.services() {
        out.push_str(&format!(
            "{}: {}\n",
            category.to_string().to_uppercase(),
            result.status
        ));
        for detail in &result.details {
            out.push_str(&format!("- {detail}\n"));
        }
        out.push('\n');
    }

    out.push_str("\nPERMISSIONS:\n");
    if results.permissions.is_empty() {
        out.push_str("No permissions detected in token\n");
    } else {
        for permission in &results.permissions {
            out.push_str(&format!("- {permission}\n"));
        }
    }

    out
}

/// Writes the report into `dir` as `graph_api_report_<YYYYMMDD_HHMMSS>.txt`
/// and returns the path.
pub fn write_report(results: &AnalysisResults, dir: &Path) -> anyhow::Result<PathBuf> {
    let now = Local::now();
    let path = dir.join(format!("graph_api_report_{}.txt", now.format("%Y%m%d_%H%M%S")));

    fs::write(&path, render_report(results, now))
        .with_context(|| format!("writing report to {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    fn sample_results() -> AnalysisResults {
        let mut results = AnalysisResults::new();
        results.authentication.status = ServiceStatus::Success;
        results.authentication.details.push(String::from("Token type: Bearer"));
        results.set_status(ServiceCategory::Users, ServiceStatus::Available);
        results.add_detail(
            ServiceCategory::Users,
            "Users data accessible (sample of 3 users)",
        );
        results.set_status(ServiceCategory::Sites, ServiceStatus::Limited);
        results.add_detail(ServiceCategory::Sites, "SharePoint sites not accessible (403)");
        results.permissions.push(String::from("User.Read.All"));
        results
    }

    #[test]
    fn test_report_has_a_section_per_category() {
        let generated_at = Local.with_ymd_and_hms(2026, 8, 7, 12, 30, 0).unwrap();
        let report = render_report(&sample_results(), generated_at);

        assert!(report.contains("Generated on: 2026-08-07 12:30:00"));
        assert!(report.contains("AUTHENTICATION:\nStatus: Success"));
        for category in ServiceCategory::ALL {
            let heading = format!("{}:", category.to_string().to_uppercase());
            assert!(report.contains(&heading), "missing section {heading}");
        }
        assert!(report.contains("USERS: Available"));
        assert!(report.contains("SITES: Limited"));
        assert!(report.contains("- User.Read.All"));
    }

    #[test]
    fn test_report_notes_missing_permissions() {
        let mut results = sample_results();
        results.permissions.clear();

        let generated_at = Local.with_ymd_and_hms(2026, 8, 7, 12, 30, 0).unwrap();
        let report = render_report(&results, generated_at);

        assert!(report.contains("No permissions detected in token"));
    }

    #[test]
    fn test_write_report_uses_timestamped_filename() {
        let dir = std::env::temp_dir()
            .join(format!("graph-probe-report-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();

        let path = write_report(&sample_results(), &dir).unwrap();

        let name = path.file_name().and_then(|n| n.to_str()).unwrap();
        assert!(name.starts_with("graph_api_report_"));
        assert!(name.ends_with(".txt"));

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("SERVICE ACCESS SUMMARY:"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
