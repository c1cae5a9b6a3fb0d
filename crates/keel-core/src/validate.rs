//! Lint existing resource-group names against the naming convention.
//!
//! Existing resources are outside this system's control, so every finding
//! is a warning. Nothing here can fail a deployment.

use serde::{Deserialize, Serialize};

use crate::convention::{ComponentKind, NamingConvention};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The name contains none of the tokens expected for its role.
    MissingConventionToken,
    /// The name does not start with the resource-group prefix.
    MissingGroupPrefix,
    /// An existing reference was supplied for a dependency being created.
    IgnoredExistingReference,
    /// An existing dependency was given by resource group only.
    MissingExistingName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingWarning {
    pub kind: WarningKind,
    /// The name the warning is about.
    pub subject: String,
    pub message: String,
}

/// Check that `resource_group` contains at least one expected token as a
/// whole segment (split on `-`, `_` and `.`, case-insensitive). An empty
/// token set matches everything.
pub fn validate<I, S>(resource_group: &str, expected_tokens: I) -> Vec<NamingWarning>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lowered = resource_group.to_lowercase();
    let tokens: Vec<String> = expected_tokens
        .into_iter()
        .map(|t| t.as_ref().to_lowercase())
        .collect();

    let has_token = |token: &String| {
        lowered
            .split(['-', '_', '.'])
            .any(|segment| segment == token.as_str())
    };
    if tokens.is_empty() || tokens.iter().any(has_token) {
        return vec![];
    }

    vec![NamingWarning {
        kind: WarningKind::MissingConventionToken,
        subject: resource_group.to_string(),
        message: format!(
            "resource group {resource_group:?} contains none of the expected tokens: {}",
            tokens.join(", ")
        ),
    }]
}

/// Lint an existing group supplied for `component`: expected role tokens
/// plus the convention's group prefix.
pub fn validate_existing_group(
    convention: &NamingConvention,
    component: ComponentKind,
    resource_group: &str,
) -> Vec<NamingWarning> {
    let mut warnings = validate(resource_group, convention.expected_tokens(component));

    let prefix = convention.group_prefix();
    if !resource_group.to_lowercase().starts_with(&prefix) {
        warnings.push(NamingWarning {
            kind: WarningKind::MissingGroupPrefix,
            subject: resource_group.to_string(),
            message: format!(
                "{component} resource group {resource_group:?} does not start with {prefix:?}"
            ),
        });
    }
    warnings
}
