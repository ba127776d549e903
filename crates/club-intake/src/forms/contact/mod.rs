//! General contact form: validation, storage contract, service and routes.

pub mod domain;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

pub use domain::{ContactMessage, ContactStatus, ContactSubmission, NewContactMessage};
pub use query::{ContactFilter, ContactListQuery};
pub use repository::ContactRepository;
pub use router::contact_router;
pub use service::{ContactPage, ContactService};
pub use validation::validate_contact;
