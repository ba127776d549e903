//! Contact and recruitment form intake for the club website.
//!
//! Each form is a vertical slice under [`forms`]: a validator, a repository contract with
//! MongoDB and in-memory implementations under [`store`], a service, and an axum router.

pub mod config;
pub mod error;
pub mod forms;
pub mod store;
pub mod telemetry;
