//! CLI command implementations.

pub mod build;
pub mod doctor;
pub mod export;
pub mod new;

pub use build::build_document;
pub use doctor::doctor;
pub use export::export_output;
pub use new::new_project;
