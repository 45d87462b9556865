//! Job declaration model.
//!
//! A `RawDeclaration` is the shape of one `apps` entry as it appears in an
//! ecosystem file, before any checking. `JobDeclaration::validate` turns it
//! into the normalized form handed to the scheduler's registration
//! interface, or a descriptive error naming the failing field.

use serde::{Deserialize, Serialize};

use crate::{CronExpr, DeclarationError};

/// Unvalidated declaration fields as they appear in an ecosystem file.
///
/// Optional fields default like PM2: `autorestart` on, `watch` off,
/// `instances` 1. `instances` is kept signed here so that a declared
/// zero or negative count is reported as a validation error rather
/// than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDeclaration {
    /// Unique key for the job within the registry.
    #[serde(default)]
    pub name: String,

    /// Shell command or script invocation to run.
    #[serde(default)]
    pub script: String,

    /// 5-field cron expression.
    #[serde(default)]
    pub cron: String,

    /// Relaunch on exit outside the schedule.
    pub autorestart: Option<bool>,

    /// Relaunch on filesystem changes.
    pub watch: Option<bool>,

    /// Number of concurrent copies to maintain.
    pub instances: Option<i64>,
}

/// A validated job declaration.
///
/// Immutable once produced; the external scheduler owns everything that
/// happens after registration. samwise never executes `script`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDeclaration {
    /// Unique key for the job within the registry.
    pub name: String,

    /// Shell command or script invocation to run at each trigger.
    /// Not checked for existence at declaration time.
    pub script: String,

    /// When the job triggers.
    pub cron: CronExpr,

    /// Relaunch on exit outside the schedule.
    pub autorestart: bool,

    /// Relaunch on filesystem changes.
    pub watch: bool,

    /// Number of concurrent copies the manager should maintain.
    pub instances: u32,
}

impl JobDeclaration {
    /// Validate a raw declaration.
    ///
    /// Rules: `name` and `script` non-empty, `cron` parses as a 5-field
    /// expression, `instances` >= 1. Pure; no side effects.
    ///
    /// # Errors
    ///
    /// `DeclarationError::Validation` naming the failing field, or
    /// `DeclarationError::Schedule` for a malformed cron expression.
    pub fn validate(raw: RawDeclaration) -> Result<Self, DeclarationError> {
        let name = raw.name.trim().to_string();
        if name.is_empty() {
            return Err(DeclarationError::validation("name", "must not be empty"));
        }

        let script = raw.script.trim().to_string();
        if script.is_empty() {
            return Err(DeclarationError::validation("script", "must not be empty"));
        }

        let cron = CronExpr::parse(&raw.cron)?;

        let instances = raw.instances.unwrap_or(1);
        if instances < 1 {
            return Err(DeclarationError::validation(
                "instances",
                format!("must be >= 1, got {}", instances),
            ));
        }

        Ok(Self {
            name,
            script,
            cron,
            autorestart: raw.autorestart.unwrap_or(true),
            watch: raw.watch.unwrap_or(false),
            instances: instances as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawDeclaration {
        RawDeclaration {
            name: "samwise-daily-job".into(),
            script: "python -m jobs.main".into(),
            cron: "0 8 * * *".into(),
            autorestart: Some(false),
            watch: Some(false),
            instances: Some(1),
        }
    }

    #[test]
    fn test_validate_full_declaration() {
        let decl = JobDeclaration::validate(raw()).unwrap();
        assert_eq!(decl.name, "samwise-daily-job");
        assert_eq!(decl.script, "python -m jobs.main");
        assert_eq!(decl.cron.source(), "0 8 * * *");
        assert!(!decl.autorestart);
        assert!(!decl.watch);
        assert_eq!(decl.instances, 1);
    }

    #[test]
    fn test_validate_applies_defaults() {
        let decl = JobDeclaration::validate(RawDeclaration {
            autorestart: None,
            watch: None,
            instances: None,
            ..raw()
        })
        .unwrap();
        assert!(decl.autorestart);
        assert!(!decl.watch);
        assert_eq!(decl.instances, 1);
    }

    #[test]
    fn test_validate_empty_name() {
        let err = JobDeclaration::validate(RawDeclaration {
            name: "  ".into(),
            ..raw()
        })
        .unwrap_err();
        match err {
            DeclarationError::Validation { field, .. } => assert_eq!(field, "name"),
            other => panic!("expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_empty_script() {
        let err = JobDeclaration::validate(RawDeclaration {
            script: String::new(),
            ..raw()
        })
        .unwrap_err();
        match err {
            DeclarationError::Validation { field, .. } => assert_eq!(field, "script"),
            other => panic!("expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_bad_cron() {
        let err = JobDeclaration::validate(RawDeclaration {
            cron: "0 8 * *".into(),
            ..raw()
        })
        .unwrap_err();
        assert!(matches!(err, DeclarationError::Schedule { .. }));
    }

    #[test]
    fn test_validate_instances_zero_or_negative() {
        for n in [0, -1, -100] {
            let err = JobDeclaration::validate(RawDeclaration {
                instances: Some(n),
                ..raw()
            })
            .unwrap_err();
            match err {
                DeclarationError::Validation { field, .. } => assert_eq!(field, "instances"),
                other => panic!("expected Validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_serialize_roundtrips_fields() {
        let decl = JobDeclaration::validate(raw()).unwrap();
        let json = serde_json::to_value(&decl).unwrap();
        assert_eq!(json["name"], "samwise-daily-job");
        assert_eq!(json["script"], "python -m jobs.main");
        assert_eq!(json["cron"], "0 8 * * *");
        assert_eq!(json["autorestart"], false);
        assert_eq!(json["watch"], false);
        assert_eq!(json["instances"], 1);
    }
}
