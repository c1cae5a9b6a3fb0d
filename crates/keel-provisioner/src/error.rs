use std::fmt;

use keel_core::NameError;
use thiserror::Error;

use crate::graph::StageId;
use crate::topology::Dependency;

/// A fatal configuration problem found while resolving a plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("missing required input: {field}")]
    MissingInput { field: &'static str },

    #[error(transparent)]
    Name(#[from] NameError),

    #[error("{dependency} is not created by this deployment but {field} was not supplied")]
    MissingExistingReference {
        dependency: Dependency,
        field: &'static str,
    },

    #[error("cyclic dependency between stages: {}", join(stages))]
    CyclicDependency { stages: Vec<StageId> },

    #[error("stage {stage} depends on unknown stage {missing}")]
    UnknownDependency { stage: StageId, missing: StageId },
}

/// Every fatal error from one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ResolveErrors(pub Vec<ResolveError>);

impl ResolveErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ResolveError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResolveErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} configuration error(s)", self.0.len())?;
        for err in &self.0 {
            write!(f, "\n  - {err}")?;
        }
        Ok(())
    }
}

impl From<Vec<ResolveError>> for ResolveErrors {
    fn from(errors: Vec<ResolveError>) -> Self {
        Self(errors)
    }
}

/// Failure at the provisioner boundary while executing a plan.
#[derive(Debug, Error)]
pub enum ProvisionerError {
    #[error("resource creation failed: {0}")]
    CreateFailed(String),

    #[error("role assignment failed: {0}")]
    AssignFailed(String),

    #[error("existing resource not found: {0}")]
    ExistingNotFound(String),

    #[error("stage {stage} failed")]
    StageFailed {
        stage: StageId,
        #[source]
        source: Box<ProvisionerError>,
    },

    #[error("stage task aborted: {0}")]
    Aborted(String),

    #[error("plan error: {0}")]
    Plan(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProvisionerError {
    /// Prepend resource identity to the error message.
    pub fn with_resource(self, label: &str, name: &str) -> Self {
        match self {
            Self::CreateFailed(msg) => Self::CreateFailed(format!("{label} ({name}): {msg}")),
            Self::AssignFailed(msg) => Self::AssignFailed(format!("{label} ({name}): {msg}")),
            Self::ExistingNotFound(msg) => {
                Self::ExistingNotFound(format!("{label} ({name}): {msg}"))
            }
            other => other,
        }
    }

    pub fn in_stage(self, stage: &StageId) -> Self {
        Self::StageFailed {
            stage: stage.clone(),
            source: Box::new(self),
        }
    }

    /// The stage a failure surfaced in, if any.
    pub fn stage(&self) -> Option<&StageId> {
        match self {
            Self::StageFailed { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

/// Walk the full error chain and join all causes into one string.
pub fn format_err_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

fn join(stages: &[StageId]) -> String {
    stages
        .iter()
        .map(StageId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
