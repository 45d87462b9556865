//! Declaration registry keyed by job name.
//!
//! Holds the set of active declarations between a load and the hand-off to
//! the external scheduler. Exactly one declaration per name is active at a
//! time; re-registering a name replaces the prior declaration atomically
//! from the registry's point of view.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{debug, info};

use samwise_types::{DeclarationError, JobDeclaration};

/// Registry of active job declarations.
///
/// # Example
///
/// ```
/// use samwise_loader::{load_str, JobRegistry};
///
/// let decls = load_str(r#"{"apps": [{"name": "j", "script": "run", "cron": "0 8 * * *"}]}"#)
///     .unwrap();
///
/// let registry = JobRegistry::new();
/// registry.register_all(decls);
/// assert_eq!(registry.len(), 1);
/// ```
pub struct JobRegistry {
    jobs: RwLock<HashMap<String, JobDeclaration>>,
}

impl JobRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Register a declaration, replacing any prior declaration of the same
    /// name. Registering an identical declaration twice leaves the registry
    /// in the same observable state as registering it once.
    pub fn register(&self, decl: JobDeclaration) {
        let mut jobs = self.jobs.write().unwrap();
        let replaced = jobs.insert(decl.name.clone(), decl.clone()).is_some();
        if replaced {
            info!(job = %decl.name, cron = %decl.cron, "Declaration replaced");
        } else {
            info!(job = %decl.name, cron = %decl.cron, "Declaration registered");
        }
    }

    /// Register a declaration under strict uniqueness.
    ///
    /// # Errors
    ///
    /// `DeclarationError::DuplicateName` if the name is already registered.
    pub fn register_strict(&self, decl: JobDeclaration) -> Result<(), DeclarationError> {
        let mut jobs = self.jobs.write().unwrap();
        if jobs.contains_key(&decl.name) {
            return Err(DeclarationError::DuplicateName(decl.name));
        }
        info!(job = %decl.name, cron = %decl.cron, "Declaration registered");
        jobs.insert(decl.name.clone(), decl);
        Ok(())
    }

    /// Register every declaration in order, with replace semantics.
    pub fn register_all(&self, decls: Vec<JobDeclaration>) {
        for decl in decls {
            self.register(decl);
        }
    }

    /// Remove a declaration by name. Returns whether it was present.
    pub fn remove(&self, name: &str) -> bool {
        let removed = self.jobs.write().unwrap().remove(name).is_some();
        if removed {
            debug!(job = %name, "Declaration removed");
        }
        removed
    }

    /// Get a declaration by name.
    pub fn get(&self, name: &str) -> Option<JobDeclaration> {
        self.jobs.read().unwrap().get(name).cloned()
    }

    /// Whether a declaration with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.jobs.read().unwrap().contains_key(name)
    }

    /// All registered declarations, sorted by name.
    pub fn snapshot(&self) -> Vec<JobDeclaration> {
        let mut decls: Vec<JobDeclaration> = self.jobs.read().unwrap().values().cloned().collect();
        decls.sort_by(|a, b| a.name.cmp(&b.name));
        decls
    }

    /// Number of registered declarations.
    pub fn len(&self) -> usize {
        self.jobs.read().unwrap().len()
    }

    /// Whether the registry holds no declarations.
    pub fn is_empty(&self) -> bool {
        self.jobs.read().unwrap().is_empty()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
