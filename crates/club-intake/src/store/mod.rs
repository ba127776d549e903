//! Persistence backends for the form repositories.
//!
//! [`mongo`] talks to the real document store through one pooled client; [`memory`] keeps
//! records in process and enforces the same uniqueness rules, for development and tests.

pub mod memory;
pub mod mongo;

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Identifier assigned to a stored record (hex form of the document `_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn generate() -> Self {
        Self(ObjectId::new().to_hex())
    }
}

impl From<ObjectId> for RecordId {
    fn from(value: ObjectId) -> Self {
        Self(value.to_hex())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current time truncated to the millisecond precision the document store keeps, so a
/// record reads back the same from either backend.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Skip/limit pair applied after filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub limit: u64,
}

/// One bucket of a grouped count, shaped like a `$group` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    #[serde(rename = "_id")]
    pub key: String,
    pub count: u64,
}

/// Orders buckets by descending count, then key, so reports are stable across backends.
pub(crate) fn sort_groups(groups: &mut [GroupCount]) {
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A unique index rejected the write.
    #[error("record already exists")]
    Conflict,
    /// The store refused a field value.
    #[error("record rejected by store: {0}")]
    Rejected(String),
    /// The store could not be reached or an operation ran past its budget.
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("repository failure: {0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct_hex() {
        let first = RecordId::generate();
        let second = RecordId::generate();
        assert_ne!(first, second);
        assert_eq!(first.0.len(), 24);
        assert!(first.0.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn timestamps_carry_whole_milliseconds() {
        let now = timestamp_now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn groups_sort_by_count_then_key() {
        let mut groups = vec![
            GroupCount {
                key: "technical".to_string(),
                count: 1,
            },
            GroupCount {
                key: "coding".to_string(),
                count: 3,
            },
            GroupCount {
                key: "management".to_string(),
                count: 1,
            },
        ];
        sort_groups(&mut groups);
        let keys: Vec<_> = groups.iter().map(|group| group.key.as_str()).collect();
        assert_eq!(keys, ["coding", "management", "technical"]);
    }
}
