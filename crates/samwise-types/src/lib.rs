//! Core types for samwise job declarations.
//!
//! A declaration describes one schedulable unit of work for an external
//! process manager: a named command, a 5-field cron schedule, and a handful
//! of supervision flags. This crate owns the data model and its validation;
//! loading files and registering declarations live in `samwise-loader`.
//!
//! # Example
//!
//! ```
//! use samwise_types::{JobDeclaration, RawDeclaration};
//!
//! let raw = RawDeclaration {
//!     name: "samwise-daily-job".into(),
//!     script: "python -m jobs.main".into(),
//!     cron: "0 8 * * *".into(),
//!     autorestart: Some(false),
//!     watch: Some(false),
//!     instances: Some(1),
//! };
//!
//! let decl = JobDeclaration::validate(raw).unwrap();
//! assert_eq!(decl.name, "samwise-daily-job");
//! assert_eq!(decl.instances, 1);
//! ```

mod cron;
mod declaration;
mod error;

pub use cron::CronExpr;
pub use declaration::{JobDeclaration, RawDeclaration};
pub use error::DeclarationError;
