// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

/// Outcome of probing one part of the API: a status plus the ordered list of
/// human-readable detail lines recorded along the way.
#[derive(Clone, Debug)]
pub struct ProbeResult {
    pub status: ServiceStatus,
    pub details: Vec<String>,
}

impl ProbeResult {
    pub fn new() -> Self {
        Self { status: ServiceStatus::NotTested, details: Vec::new() }
    }
}

impl Default for ProbeResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one analyzer run learned, accumulated in place as the probe
/// sequence advances. Records exist only for the run's duration; the flat
/// text report is the only thing persisted.
#[derive(Clone, Debug, Default)]
pub struct AnalysisResults {
    pub authentication: ProbeResult,
    pub directory: ProbeResult,
    pub users: ProbeResult,
    pub groups: ProbeResult,
    pub files: ProbeResult,
    pub sites: ProbeResult,
    pub mail: ProbeResult,
    pub teams: ProbeResult,

    /// Role claims extracted from the access token, verbatim.
    pub permissions: Vec<String>,
}

impl AnalysisResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service(&self, category: ServiceCategory) -> &ProbeResult {
        match category {
            ServiceCategory::Directory => &self.directory,
            ServiceCategory::Users => &self.users,
            ServiceCategory::Groups => &self.groups,
            ServiceCategory::Files => &self.files,
            ServiceCategory::Sites => &self.sites,
            ServiceCategory::Mail => &self.mail,
            ServiceCategory::Teams => &self.teams,
        }
    }

    pub fn service_mut(&mut self, category: ServiceCategory) -> &mut ProbeResult {
        match category {
            ServiceCategory::Directory => &mut self.directory,
            ServiceCategory::Users => &mut self.users,
            ServiceCategory::Groups => &mut self.groups,
            ServiceCategory::Files => &mut self.files,
            ServiceCategory::Sites => &mut self.sites,
            ServiceCategory::Mail => &mut self.mail,
            ServiceCategory::Teams => &mut self.teams,
        }
    }

    pub fn set_status(&mut self, category: ServiceCategory, status: ServiceStatus) {
        self.service_mut(category).status = status;
    }

    pub fn add_detail(&mut self, category: ServiceCategory, detail: impl Into<String>) {
        self.service_mut(category).details.push(detail.into());
    }

    /// The service results in probe order.
    pub fn services(&self) -> [(ServiceCategory, &ProbeResult); 7] {
        [
            (ServiceCategory::Directory, &self.directory),
            (ServiceCategory::Users, &self.users),
            (ServiceCategory::Groups, &self.groups),
            (ServiceCategory::Files, &self.files),
            (ServiceCategory::Sites, &self.sites),
            (ServiceCategory::Mail, &self.mail),
            (ServiceCategory::Teams, &self.teams),
        ]
    }

    pub fn available_services(&self) -> usize {
        self.count_with_status(ServiceStatus::Available)
    }

    pub fn limited_services(&self) -> usize {
        self.count_with_status(ServiceStatus::Limited)
    }

    pub fn inaccessible_services(&self) -> usize {
        ServiceCategory::ALL.len() - self.available_services() - self.limited_services()
    }

    fn count_with_status(&self, status: ServiceStatus) -> usize {
        self.services().iter().filter(|(_, r)| r.status == status).count()
    }

    /// Application permissions to suggest for every category that did not
    /// come back fully available.
    pub fn recommendations(&self) -> Vec<&'static str> {
        let mut recommendations = Vec::new();

        if self.directory.status != ServiceStatus::Available {
            recommendations.push(
                "To access organization data: Add 'Organization.Read.All' permission",
            );
            recommendations.push(
                "To access directory objects: Add 'Directory.Read.All' permission",
            );
        }

        if self.users.status != ServiceStatus::Available {
            recommendations.push("To access user data: Add 'User.Read.All' permission");
        }

        if self.groups.status != ServiceStatus::Available {
            recommendations.push("To access groups: Add 'Group.Read.All' permission");
        }

        if self.files.status != ServiceStatus::Available {
            recommendations.push("To access files and drives: Add 'Files.Read.All' permission");
        }

        if self.sites.status != ServiceStatus::Available {
            recommendations.push("To access SharePoint sites: Add 'Sites.Read.All' permission");
        }

        if self.mail.status != ServiceStatus::Available {
            recommendations.push("To access mailboxes: Add 'Mail.Read' permission");
        }

        if self.teams.status != ServiceStatus::Available {
            recommendations.push("To access teams: Add 'Team.ReadBasic.All' permission");
        }

        recommendations
    }
}
