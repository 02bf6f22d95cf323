//! # adpress-core
//!
//! Core library for adpress, a build companion for AsciiDoc projects.
//!
//! This crate holds the decision logic the CLI drives: configuration,
//! document discovery, conversion backend selection, converter command
//! composition, subprocess execution, output archiving, and project
//! scaffolding. Parsing or rendering AsciiDoc itself is deliberately out
//! of scope; that is the external converter's job.
//!
//! The modules with side effects ([`runner`], [`archive`], [`scaffold`])
//! stay thin. The decisions that matter, which backend to use, which
//! document to build, which arguments to pass, are plain functions over
//! plain data and are tested as such.

pub mod archive;
pub mod config;
pub mod convert;
pub mod runner;
pub mod scaffold;
pub mod source;
pub mod toolchain;

pub use archive::export_archive;
pub use config::{Config, OutputFormat, StylesheetMode};
pub use convert::{ConvertRequest, Invocation};
pub use scaffold::{Template, TEMPLATE_SET};
pub use source::SourceSelection;
pub use toolchain::Backend;
