use crate::infra::connect;
use chrono::Duration;
use clap::Args;
use club_intake::config::AppConfig;
use club_intake::error::AppError;
use club_intake::forms::contact::{ContactRepository, ContactStatus, NewContactMessage};
use club_intake::forms::recruitment::{
    ApplicantDetails, ApplicationStatus, Domain, ExperienceLevel, NewApplication,
    RecruitmentRepository, YearLevel,
};
use club_intake::store::{timestamp_now, RepositoryError};
use club_intake::telemetry;
use tracing::{info, warn};

#[derive(Args, Debug, Default)]
pub(crate) struct SeedArgs {
    /// Delete every stored contact message and application before inserting
    #[arg(long)]
    pub(crate) reset: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct SeedSummary {
    pub(crate) contacts: usize,
    pub(crate) applications: usize,
    pub(crate) skipped: usize,
}

pub(crate) async fn run_init_db() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = connect(&config).await?;
    let result = store.ensure_indexes().await;
    store.shutdown().await;
    result?;

    info!(database = %config.database.name, "collections and indexes initialized");
    Ok(())
}

pub(crate) async fn run_seed(args: SeedArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = connect(&config).await?;
    let outcome = async {
        store.ensure_indexes().await?;
        if args.reset {
            let removed = store.clear().await?;
            info!(removed, "cleared existing records");
        }
        insert_samples(store.contacts().as_ref(), store.applications().as_ref()).await
    }
    .await;
    store.shutdown().await;

    let summary = outcome?;
    info!(
        contacts = summary.contacts,
        applications = summary.applications,
        skipped = summary.skipped,
        "database seeded"
    );
    Ok(())
}

/// Inserts the sample records. Applications that collide with a stored one are skipped.
pub(crate) async fn insert_samples<C, R>(
    contacts: &C,
    applications: &R,
) -> Result<SeedSummary, AppError>
where
    C: ContactRepository,
    R: RecruitmentRepository,
{
    let mut summary = SeedSummary::default();

    for message in sample_contacts() {
        contacts.create(message).await?;
        summary.contacts += 1;
    }

    for application in sample_applications() {
        let student_id = application.details.student_id.clone();
        match applications.create(application).await {
            Ok(_) => summary.applications += 1,
            Err(RepositoryError::Conflict) => {
                warn!(%student_id, "sample application already stored; skipping");
                summary.skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(summary)
}

fn sample_contacts() -> Vec<NewContactMessage> {
    let now = timestamp_now();
    vec![
        NewContactMessage {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            subject: "Question about IoT Projects".to_string(),
            message: "I am interested in learning more about your IoT projects and how I can get involved.".to_string(),
            status: ContactStatus::New,
            created_at: now,
        },
        NewContactMessage {
            name: "Jane Smith".to_string(),
            email: "jane.smith@college.edu".to_string(),
            phone: "+1 (555) 987-6543".to_string(),
            subject: "Collaboration Opportunity".to_string(),
            message: "Our research lab would like to collaborate on IoT research projects.".to_string(),
            status: ContactStatus::Read,
            created_at: now - Duration::hours(1),
        },
    ]
}

fn sample_applications() -> Vec<NewApplication> {
    vec![NewApplication {
        details: ApplicantDetails {
            first_name: "Alice".to_string(),
            last_name: "Johnson".to_string(),
            email: "alice.johnson@college.edu".to_string(),
            phone: "+1 (555) 111-2222".to_string(),
            student_id: "STU001".to_string(),
            year_level: YearLevel::Second,
            major: "Computer Science".to_string(),
            selected_domains: vec![Domain::Coding, Domain::Technical],
            experience_level: ExperienceLevel::Intermediate,
            previous_experience: "Built several web applications using React and Node.js"
                .to_string(),
            skills: "JavaScript, Python, React, Arduino".to_string(),
            motivation:
                "I want to learn more about IoT development and work on real-world projects."
                    .to_string(),
            availability: "Weekdays after 3 PM, weekends".to_string(),
            project_ideas: "Smart home automation system".to_string(),
            portfolio_url: String::new(),
            github_url: "https://github.com/alicejohnson".to_string(),
            linkedin_url: String::new(),
            additional_info: String::new(),
        },
        status: ApplicationStatus::Pending,
        submitted_at: timestamp_now(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use club_intake::forms::contact::ContactFilter;
    use club_intake::forms::recruitment::ApplicationFilter;
    use club_intake::forms::validation::is_valid_email;
    use club_intake::store::MemoryStore;

    #[test]
    fn sample_records_pass_the_form_rules() {
        for message in sample_contacts() {
            assert!(is_valid_email(&message.email));
            assert_eq!(message.email, message.email.to_lowercase());
        }
        for application in sample_applications() {
            assert!(is_valid_email(&application.details.email));
            assert!(!application.details.selected_domains.is_empty());
        }
    }

    #[tokio::test]
    async fn seeding_twice_skips_existing_applications() {
        let store = MemoryStore::default();
        let contacts = store.contacts();
        let applications = store.applications();

        let first = insert_samples(contacts.as_ref(), applications.as_ref())
            .await
            .expect("first seed");
        assert_eq!(
            first,
            SeedSummary {
                contacts: 2,
                applications: 1,
                skipped: 0,
            }
        );

        let second = insert_samples(contacts.as_ref(), applications.as_ref())
            .await
            .expect("second seed");
        assert_eq!(second.applications, 0);
        assert_eq!(second.skipped, 1);

        assert_eq!(
            contacts.count(&ContactFilter::default()).await.expect("count"),
            4
        );
        assert_eq!(
            applications
                .count(&ApplicationFilter::default())
                .await
                .expect("count"),
            1
        );
    }
}
