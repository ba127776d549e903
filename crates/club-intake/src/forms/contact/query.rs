use serde::Deserialize;

use super::domain::ContactStatus;
use crate::forms::query::{first_value, non_blank, PageRequest};

/// Raw query string accepted by the contact list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
}

/// Typed contact filter; `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
}

impl ContactFilter {
    pub fn matches(&self, status: ContactStatus) -> bool {
        self.status.map_or(true, |wanted| wanted == status)
    }
}

impl ContactListQuery {
    /// Builds the query from decoded query-string pairs, first value wins.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            page: first_value(pairs, "page"),
            limit: first_value(pairs, "limit"),
            status: first_value(pairs, "status"),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_params(self.page.as_deref(), self.limit.as_deref())
    }

    /// Unknown status values are dropped rather than rejected.
    pub fn filter(&self) -> ContactFilter {
        ContactFilter {
            status: non_blank(&self.status).and_then(ContactStatus::parse),
        }
    }
}
