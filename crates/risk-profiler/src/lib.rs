pub mod config;
pub mod error;
pub mod questionnaire;
pub mod report;
pub mod telemetry;
