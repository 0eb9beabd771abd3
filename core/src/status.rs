// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// How far a probe got against one part of the API.
///
/// Authentication uses `Success`/`Failed`/`Error`; the resource categories
/// use `Available`/`Limited`. Everything starts out as `NotTested`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceStatus {
    NotTested,
    Success,
    Available,
    Limited,
    Failed,
    Error,
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let label = match self {
            ServiceStatus::NotTested => "Not tested",
            ServiceStatus::Success => "Success",
            ServiceStatus::Available => "Available",
            ServiceStatus::Limited => "Limited",
            ServiceStatus::Failed => "Failed",
            ServiceStatus::Error => "Error",
        };

        write!(f, "{label}")
    }
}

/// The probed Graph resource categories, in probe order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ServiceCategory {
    Directory,
    Users,
    Groups,
    Files,
    Sites,
    Mail,
    Teams,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 7] = [
        ServiceCategory::Directory,
        ServiceCategory::Users,
        ServiceCategory::Groups,
        ServiceCategory::Files,
        ServiceCategory::Sites,
        ServiceCategory::Mail,
        ServiceCategory::Teams,
    ];
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            ServiceCategory::Directory => "directory",
            ServiceCategory::Users => "users",
            ServiceCategory::Groups => "groups",
            ServiceCategory::Files => "files",
            ServiceCategory::Sites => "sites",
            ServiceCategory::Mail => "mail",
            ServiceCategory::Teams => "teams",
        };

        write!(f, "{name}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(ServiceStatus::NotTested.to_string(), "Not tested");
        assert_eq!(ServiceStatus::Available.to_string(), "Available");
        assert_eq!(ServiceStatus::Limited.to_string(), "Limited");
    }

    #[test]
    fn test_category_order_matches_probe_order() {
        assert_eq!(ServiceCategory::ALL.len(), 7);
        assert_eq!(ServiceCategory::ALL[0], ServiceCategory::Directory);
        assert_eq!(ServiceCategory::ALL[6], ServiceCategory::Teams);
    }
}
