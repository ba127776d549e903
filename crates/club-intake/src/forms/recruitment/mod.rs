//! Membership recruitment form: validation, duplicate guard, storage contract, reports.

pub mod domain;
pub mod guard;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

pub use domain::{
    ApplicantDetails, ApplicationStatus, Domain, ExperienceLevel, NewApplication,
    RecruitmentApplication, RecruitmentSubmission, ReviewMetadata, YearLevel,
};
pub use guard::UniquenessGuard;
pub use query::{ApplicationFilter, ApplicationListQuery};
pub use repository::{ApplicationGrouping, RecruitmentRepository};
pub use router::recruitment_router;
pub use service::{ApplicationPage, ApplicationStatistics, RecruitmentService};
pub use validation::validate_application;
