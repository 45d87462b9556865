//! Ecosystem file loading and declaration registration.
//!
//! This crate reads a declarative job configuration (an "ecosystem" file),
//! validates every declaration in it, and offers a registry the external
//! scheduler can be populated from. Loading is a one-shot, synchronous
//! operation performed at manager startup; whatever happens to a job after
//! registration is the scheduler's concern.
//!
//! # Example
//!
//! ```
//! use samwise_loader::{load_str, JobRegistry};
//!
//! let declarations = load_str(r#"{
//!     "apps": [{
//!         "name": "samwise-daily-job",
//!         "script": "python -m jobs.main",
//!         "cron": "0 8 * * *",
//!         "autorestart": false,
//!         "watch": false,
//!         "instances": 1
//!     }]
//! }"#).unwrap();
//!
//! let registry = JobRegistry::new();
//! registry.register_all(declarations);
//! assert!(registry.contains("samwise-daily-job"));
//! ```

mod loader;
mod registry;

pub use loader::{load, load_str, load_toml_str};
pub use registry::JobRegistry;
