use chrono::{DateTime, Utc};

use super::domain::{
    ApplicantDetails, ApplicationStatus, Domain, ExperienceLevel, NewApplication,
    RecruitmentSubmission, YearLevel,
};
use crate::forms::validation::{normalize_email, FieldCheck, ValidationError};

pub const NAME_MAX: usize = 50;
pub const PHONE_MAX: usize = 20;
pub const STUDENT_ID_MAX: usize = 20;
pub const MAJOR_MAX: usize = 100;
pub const LONG_TEXT_MAX: usize = 1000;
pub const SHORT_TEXT_MAX: usize = 500;
pub const URL_MAX: usize = 200;

/// Turns a raw application into a storable record stamped with `received_at`.
pub fn validate_application(
    submission: RecruitmentSubmission,
    received_at: DateTime<Utc>,
) -> Result<NewApplication, ValidationError> {
    let mut check = FieldCheck::default();

    let first_name = check.required("firstName", submission.first_name);
    let last_name = check.required("lastName", submission.last_name);
    let email = check.required("email", submission.email);
    let phone = check.required("phone", submission.phone);
    let student_id = check.required("studentId", submission.student_id);
    let year_level = check.required("yearLevel", submission.year_level);
    let major = check.required("major", submission.major);
    let experience_level = check.required("experienceLevel", submission.experience_level);
    let motivation = check.required("motivation", submission.motivation);
    let availability = check.required("availability", submission.availability);
    check.ensure_present()?;

    let email = normalize_email(&email)?;

    let raw_domains = submission.selected_domains.unwrap_or_default();
    if raw_domains.is_empty() {
        return Err(ValidationError::NoDomainsSelected);
    }

    let mut selected_domains = Vec::with_capacity(raw_domains.len());
    for raw in &raw_domains {
        match Domain::parse(raw.trim()) {
            Some(domain) if !selected_domains.contains(&domain) => selected_domains.push(domain),
            Some(_) => {}
            None => check.reject("selectedDomains", format!("`{raw}` is not a recognized domain")),
        }
    }

    let year_level = YearLevel::parse(&year_level);
    if year_level.is_none() {
        check.reject("yearLevel", "must be one of the listed year levels");
    }
    let experience_level = ExperienceLevel::parse(&experience_level);
    if experience_level.is_none() {
        check.reject("experienceLevel", "must be one of the listed experience levels");
    }

    check.max_len("firstName", &first_name, NAME_MAX);
    check.max_len("lastName", &last_name, NAME_MAX);
    check.max_len("phone", &phone, PHONE_MAX);
    check.max_len("studentId", &student_id, STUDENT_ID_MAX);
    check.max_len("major", &major, MAJOR_MAX);
    check.max_len("motivation", &motivation, LONG_TEXT_MAX);
    check.max_len("availability", &availability, SHORT_TEXT_MAX);

    let previous_experience =
        check.optional("previousExperience", submission.previous_experience, LONG_TEXT_MAX);
    let skills = check.optional("skills", submission.skills, SHORT_TEXT_MAX);
    let project_ideas = check.optional("projectIdeas", submission.project_ideas, LONG_TEXT_MAX);
    let portfolio_url = check.optional("portfolioUrl", submission.portfolio_url, URL_MAX);
    let github_url = check.optional("githubUrl", submission.github_url, URL_MAX);
    let linkedin_url = check.optional("linkedinUrl", submission.linkedin_url, URL_MAX);
    let additional_info =
        check.optional("additionalInfo", submission.additional_info, LONG_TEXT_MAX);

    check.finish()?;

    let Some((year_level, experience_level)) = year_level.zip(experience_level) else {
        return Err(ValidationError::Invalid(Vec::new()));
    };

    Ok(NewApplication {
        details: ApplicantDetails {
            first_name,
            last_name,
            email,
            phone,
            student_id,
            year_level,
            major,
            selected_domains,
            experience_level,
            previous_experience,
            skills,
            motivation,
            availability,
            project_ideas,
            portfolio_url,
            github_url,
            linkedin_url,
            additional_info,
        },
        status: ApplicationStatus::Pending,
        submitted_at: received_at,
    })
}
