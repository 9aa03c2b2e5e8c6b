pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::adapters::{InMemoryStore, JsonFileStore, LocalStorage};
pub use crate::config::AppConfig;
pub use crate::core::{cep::ViaCepClient, enrollments::EnrollmentService};
pub use crate::utils::error::{ApplicationError, EnrollmentError, Result};
