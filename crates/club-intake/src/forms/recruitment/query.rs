use serde::Deserialize;

use super::domain::{ApplicationStatus, Domain, RecruitmentApplication};
use crate::forms::query::{first_value, non_blank, PageRequest};

/// Raw query string accepted by the recruitment list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub domain: Option<String>,
    pub year_level: Option<String>,
}

/// Typed application filter; each `None` field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    /// Matches applications whose selected domains include this one.
    pub domain: Option<Domain>,
    /// Compared verbatim against the stored year level label.
    pub year_level: Option<String>,
}

impl ApplicationFilter {
    pub fn matches(&self, application: &RecruitmentApplication) -> bool {
        self.status.map_or(true, |status| status == application.status)
            && self.domain.map_or(true, |domain| {
                application.details.selected_domains.contains(&domain)
            })
            && self.year_level.as_deref().map_or(true, |level| {
                application.details.year_level.label() == level
            })
    }
}

impl ApplicationListQuery {
    /// Builds the query from decoded query-string pairs, first value wins.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            page: first_value(pairs, "page"),
            limit: first_value(pairs, "limit"),
            status: first_value(pairs, "status"),
            domain: first_value(pairs, "domain"),
            year_level: first_value(pairs, "yearLevel"),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_params(self.page.as_deref(), self.limit.as_deref())
    }

    /// Status and domain values outside their enumerations are dropped silently.
    pub fn filter(&self) -> ApplicationFilter {
        ApplicationFilter {
            status: non_blank(&self.status).and_then(ApplicationStatus::parse),
            domain: non_blank(&self.domain).and_then(Domain::parse),
            year_level: non_blank(&self.year_level).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_filter_from_known_values() {
        let query = ApplicationListQuery {
            status: Some("waitlisted".to_string()),
            domain: Some("pr-social".to_string()),
            year_level: Some("3rd Year".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.filter(),
            ApplicationFilter {
                status: Some(ApplicationStatus::Waitlisted),
                domain: Some(Domain::PrSocial),
                year_level: Some("3rd Year".to_string()),
            }
        );
    }

    #[test]
    fn drops_unknown_status_and_domain() {
        let query = ApplicationListQuery {
            status: Some("approved".to_string()),
            domain: Some("design".to_string()),
            ..Default::default()
        };
        assert_eq!(query.filter(), ApplicationFilter::default());
    }

    #[test]
    fn deserializes_camel_case_year_level() {
        let query: ApplicationListQuery =
            serde_json::from_value(serde_json::json!({ "yearLevel": "1st Year", "page": "2" }))
                .expect("query parses");
        assert_eq!(query.filter().year_level.as_deref(), Some("1st Year"));
        assert_eq!(query.page_request().page, 2);
    }
}
