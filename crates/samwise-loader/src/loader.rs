//! Ecosystem file loading and validation.
//!
//! The persisted layout is `{ "apps": [ ... ] }`, each entry a raw job
//! declaration. JSON is the primary format; a file with a `.toml`
//! extension is parsed as TOML with the same layout. `${VAR}` references
//! are expanded from the environment before parsing.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use samwise_types::{DeclarationError, JobDeclaration, RawDeclaration};

/// Top-level layout of an ecosystem file.
#[derive(Debug, Deserialize)]
struct EcosystemFile {
    #[serde(default)]
    apps: Vec<RawDeclaration>,
}

/// Load and validate declarations from a file.
///
/// The format is chosen by extension: `.toml` parses as TOML, anything
/// else as JSON. The first invalid declaration aborts the load.
///
/// # Errors
///
/// I/O errors reading the file, parse errors for the layout itself, and
/// `Validation`/`Schedule` errors for individual declarations.
pub fn load(path: &Path) -> Result<Vec<JobDeclaration>, DeclarationError> {
    let content = fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        load_toml_str(&content)
    } else {
        load_str(&content)
    }
}

/// Load and validate declarations from a JSON string.
pub fn load_str(content: &str) -> Result<Vec<JobDeclaration>, DeclarationError> {
    let expanded = expand_env_vars(content)?;
    let file: EcosystemFile = serde_json::from_str(&expanded)?;
    validate_all(file.apps)
}

/// Load and validate declarations from a TOML string.
pub fn load_toml_str(content: &str) -> Result<Vec<JobDeclaration>, DeclarationError> {
    let expanded = expand_env_vars(content)?;
    let file: EcosystemFile = toml::from_str(&expanded)?;
    validate_all(file.apps)
}

fn validate_all(apps: Vec<RawDeclaration>) -> Result<Vec<JobDeclaration>, DeclarationError> {
    let mut declarations = Vec::with_capacity(apps.len());
    for raw in apps {
        let decl = JobDeclaration::validate(raw)?;
        if declarations.iter().any(|d: &JobDeclaration| d.name == decl.name) {
            // Legal, but the later declaration wins at registration time.
            warn!(job = %decl.name, "Duplicate declaration in file, later entry replaces earlier");
        }
        debug!(job = %decl.name, cron = %decl.cron, "Declaration validated");
        declarations.push(decl);
    }
    Ok(declarations)
}

/// Expand environment variables written as `${VAR}`.
///
/// A reference to an unset variable is an error; declarations should not
/// silently lose parts of their command line.
fn expand_env_vars(content: &str) -> Result<String, DeclarationError> {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("static regex");
    let mut result = content.to_string();

    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        let var_value = std::env::var(var_name)
            .map_err(|_| DeclarationError::EnvVarNotSet(var_name.to_string()))?;
        result = result.replace(&cap[0], &var_value);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMWISE_JSON: &str = r#"{
        "apps": [{
            "name": "samwise-daily-job",
            "script": "python -m jobs.main",
            "cron": "0 8 * * *",
            "autorestart": false,
            "watch": false,
            "instances": 1
        }]
    }"#;

    #[test]
    fn test_load_str_single_app() {
        let decls = load_str(SAMWISE_JSON).unwrap();
        assert_eq!(decls.len(), 1);
        let decl = &decls[0];
        assert_eq!(decl.name, "samwise-daily-job");
        assert_eq!(decl.script, "python -m jobs.main");
        assert_eq!(decl.cron.source(), "0 8 * * *");
        assert!(!decl.autorestart);
        assert!(!decl.watch);
        assert_eq!(decl.instances, 1);
    }

    #[test]
    fn test_load_str_empty_apps() {
        let decls = load_str(r#"{"apps": []}"#).unwrap();
        assert!(decls.is_empty());

        let decls = load_str("{}").unwrap();
        assert!(decls.is_empty());
    }

    #[test]
    fn test_load_str_multiple_apps() {
        let decls = load_str(
            r#"{
                "apps": [
                    {"name": "a", "script": "run-a", "cron": "0 8 * * *"},
                    {"name": "b", "script": "run-b", "cron": "*/5 * * * *", "instances": 3}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].instances, 3);
        assert!(decls[0].autorestart); // default
    }

    #[test]
    fn test_load_str_four_field_cron_fails() {
        let err = load_str(
            r#"{"apps": [{"name": "j", "script": "s", "cron": "0 8 * *"}]}"#,
        )
        .unwrap_err();
        match err {
            DeclarationError::Schedule { expr, reason } => {
                assert_eq!(expr, "0 8 * *");
                assert!(reason.contains("expected 5 fields, found 4"));
            }
            other => panic!("expected Schedule error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_str_instances_zero_fails() {
        let err = load_str(
            r#"{"apps": [{"name": "j", "script": "s", "cron": "0 8 * * *", "instances": 0}]}"#,
        )
        .unwrap_err();
        match err {
            DeclarationError::Validation { field, .. } => assert_eq!(field, "instances"),
            other => panic!("expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_str_first_error_aborts() {
        let result = load_str(
            r#"{
                "apps": [
                    {"name": "good", "script": "s", "cron": "0 8 * * *"},
                    {"name": "", "script": "s", "cron": "0 8 * * *"}
                ]
            }"#,
        );
        match result {
            Err(DeclarationError::Validation { field, .. }) => assert_eq!(field, "name"),
            other => panic!("expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_str_malformed_json() {
        assert!(matches!(
            load_str("{not json"),
            Err(DeclarationError::Json(_))
        ));
    }

    #[test]
    fn test_load_toml_str() {
        let decls = load_toml_str(
            r#"
                [[apps]]
                name = "toml-job"
                script = "echo hi"
                cron = "30 4 * * 1-5"
                watch = true
            "#,
        )
        .unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "toml-job");
        assert!(decls[0].watch);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMWISE_JSON.as_bytes()).unwrap();

        let decls = load(file.path()).unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "samwise-daily-job");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load(Path::new("/nonexistent/ecosystem.json"));
        assert!(matches!(result, Err(DeclarationError::Io(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // Unique test-only variable, no concurrent reader cares.
        std::env::set_var("SAMWISE_TEST_MODULE", "jobs.main");
        let decls = load_str(
            r#"{"apps": [{"name": "j", "script": "python -m ${SAMWISE_TEST_MODULE}", "cron": "0 8 * * *"}]}"#,
        )
        .unwrap();
        assert_eq!(decls[0].script, "python -m jobs.main");
        std::env::remove_var("SAMWISE_TEST_MODULE");
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let err = load_str(
            r#"{"apps": [{"name": "j", "script": "${SAMWISE_UNSET_VAR_9931}", "cron": "0 8 * * *"}]}"#,
        )
        .unwrap_err();
        match err {
            DeclarationError::EnvVarNotSet(name) => assert_eq!(name, "SAMWISE_UNSET_VAR_9931"),
            other => panic!("expected EnvVarNotSet, got {:?}", other),
        }
    }
}
