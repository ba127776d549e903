use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::RecordId;

/// Raw recruitment payload as posted by the application form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecruitmentSubmission {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub student_id: Option<String>,
    pub year_level: Option<String>,
    pub major: Option<String>,
    pub selected_domains: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub previous_experience: Option<String>,
    pub skills: Option<String>,
    pub motivation: Option<String>,
    pub availability: Option<String>,
    pub project_ideas: Option<String>,
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub additional_info: Option<String>,
}

/// Club team an applicant wants to join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    Coding,
    Technical,
    PrSocial,
    Management,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Self::Coding,
        Self::Technical,
        Self::PrSocial,
        Self::Management,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Domain::Coding => "coding",
            Domain::Technical => "technical",
            Domain::PrSocial => "pr-social",
            Domain::Management => "management",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|domain| domain.label() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearLevel {
    #[serde(rename = "1st Year")]
    First,
    #[serde(rename = "2nd Year")]
    Second,
    #[serde(rename = "3rd Year")]
    Third,
    #[serde(rename = "4th Year")]
    Fourth,
    #[serde(rename = "Graduate Student")]
    Graduate,
}

impl YearLevel {
    pub const ALL: [YearLevel; 5] = [
        Self::First,
        Self::Second,
        Self::Third,
        Self::Fourth,
        Self::Graduate,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            YearLevel::First => "1st Year",
            YearLevel::Second => "2nd Year",
            YearLevel::Third => "3rd Year",
            YearLevel::Fourth => "4th Year",
            YearLevel::Graduate => "Graduate Student",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == raw)
    }
}

/// Self-reported experience band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "Beginner (0-1 years)")]
    Beginner,
    #[serde(rename = "Intermediate (1-3 years)")]
    Intermediate,
    #[serde(rename = "Advanced (3+ years)")]
    Advanced,
    #[serde(rename = "Expert (5+ years)")]
    Expert,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Expert,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner (0-1 years)",
            ExperienceLevel::Intermediate => "Intermediate (1-3 years)",
            ExperienceLevel::Advanced => "Advanced (3+ years)",
            ExperienceLevel::Expert => "Expert (5+ years)",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == raw)
    }
}

/// High level status tracked through the review workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    UnderReview,
    Accepted,
    Rejected,
    Waitlisted,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        Self::Pending,
        Self::UnderReview,
        Self::Accepted,
        Self::Rejected,
        Self::Waitlisted,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::UnderReview => "under-review",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Waitlisted => "waitlisted",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == raw)
    }
}

/// Applicant-supplied part of an application, trimmed and checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub student_id: String,
    pub year_level: YearLevel,
    pub major: String,
    #[serde(default)]
    pub selected_domains: Vec<Domain>,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub previous_experience: String,
    #[serde(default)]
    pub skills: String,
    pub motivation: String,
    pub availability: String,
    #[serde(default)]
    pub project_ideas: String,
    #[serde(default)]
    pub portfolio_url: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub additional_info: String,
}

/// Application ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub details: ApplicantDetails,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
}

impl NewApplication {
    pub fn with_id(self, id: RecordId) -> RecruitmentApplication {
        RecruitmentApplication {
            id,
            details: self.details,
            status: self.status,
            submitted_at: self.submitted_at,
            review: ReviewMetadata::default(),
        }
    }
}

/// Fields written by the external review workflow; absent until then.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
}

/// Stored application as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitmentApplication {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(flatten)]
    pub details: ApplicantDetails,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub review: ReviewMetadata,
}
