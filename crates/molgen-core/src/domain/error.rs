// ============================================================================
// domain/error.rs - CONFIGURATION DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

use crate::domain::module::ModuleCategory;

/// Root domain error type.
///
/// Every variant is raised before any filesystem mutation happens, so all of
/// them are user-actionable configuration mistakes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Required fields
    // ========================================================================
    #[error("Missing required config field: {field}")]
    MissingRequiredField { field: &'static str },

    // ========================================================================
    // Registry membership
    // ========================================================================
    #[error("Invalid {category} key: {key}")]
    InvalidModuleKey { category: ModuleCategory, key: String },

    // ========================================================================
    // Naming rules
    // ========================================================================
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid service name '{name}': {reason}")]
    InvalidServiceName { name: String, reason: String },

    #[error("Invalid {field} '{name}': {reason}")]
    InvalidFileName {
        field: &'static str,
        name: String,
        reason: String,
    },

    // ========================================================================
    // Derived state
    // ========================================================================
    #[error("Invalid generator state: {0}")]
    InvalidState(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredField { field } => vec![
                format!("Add a '{}' entry to your configuration", field),
                "Or run without --config-file to answer the prompts".into(),
            ],
            Self::InvalidModuleKey { category, key } => vec![
                format!("'{}' is not a known {} module", key, category),
                format!("Try: moleculer-gen list --category {}", category),
            ],
            Self::InvalidProjectName { .. } => vec![
                "Use letters, digits, spaces, hyphens or underscores".into(),
                "Path separators and '..' are not allowed".into(),
                "Examples: My Shop, billing-api, inventory_2".into(),
            ],
            Self::InvalidServiceName { .. } => vec![
                "Service names must be 1 to 50 characters long".into(),
                "Path separators and '..' are not allowed".into(),
                "Examples: users, blogPost, order items".into(),
            ],
            Self::InvalidFileName { field, .. } => vec![
                format!("'{}' must be a plain file name inside the project", field),
                "Leave it unset to use the derived default".into(),
            ],
            Self::InvalidState(_) => vec![
                "The .moleculer-gen/config.json file looks hand-edited".into(),
                "Restore it from version control or re-run `moleculer-gen init`".into(),
            ],
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        "INVALID_CONFIG"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_the_field() {
        let err = DomainError::MissingRequiredField {
            field: "transporter",
        };
        assert_eq!(err.to_string(), "Missing required config field: transporter");
    }

    #[test]
    fn invalid_key_message_names_category_and_key() {
        let err = DomainError::InvalidModuleKey {
            category: ModuleCategory::Database,
            key: "oracle".into(),
        };
        assert_eq!(err.to_string(), "Invalid database key: oracle");
        assert!(err.suggestions().iter().any(|s| s.contains("--category database")));
    }

    #[test]
    fn every_domain_error_is_invalid_config() {
        let err = DomainError::InvalidState("x".into());
        assert_eq!(err.code(), "INVALID_CONFIG");
    }
}
