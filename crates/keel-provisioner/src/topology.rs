//! Decide, once, whether each shared dependency is created by this
//! deployment or bound to an existing resource.
//!
//! Everything downstream consumes the resolved [`ResourceRef`] and never
//! looks at the create flags again.

use std::fmt;

use keel_core::naming::resolve_component;
use keel_core::{
    ComponentKind, ExistingRef, NamingContext, NamingConvention, NamingWarning, ResourceRef,
    WarningKind,
};
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// A shared dependency whose provisioning is conditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependency {
    Platform,
    Logging,
}

impl Dependency {
    pub fn component(self) -> ComponentKind {
        match self {
            Self::Platform => ComponentKind::Platform,
            Self::Logging => ComponentKind::Logging,
        }
    }

    fn resource_group_field(self) -> &'static str {
        match self {
            Self::Platform => "existingPlatformResourceGroup",
            Self::Logging => "existingLoggingResourceGroup",
        }
    }

    fn name_field(self) -> &'static str {
        match self {
            Self::Platform => "existingPlatformName",
            Self::Logging => "existingLoggingName",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Platform => f.write_str("platform dependency"),
            Self::Logging => f.write_str("logging dependency"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyInputs {
    pub create_platform: bool,
    pub create_logging: bool,
    pub existing_platform: Option<ExistingRef>,
    pub existing_logging: Option<ExistingRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub platform: ResourceRef,
    pub logging: ResourceRef,
}

impl Topology {
    pub fn get(&self, dependency: Dependency) -> &ResourceRef {
        match dependency {
            Dependency::Platform => &self.platform,
            Dependency::Logging => &self.logging,
        }
    }

    pub fn scenario(&self) -> Scenario {
        match (self.platform.is_created(), self.logging.is_created()) {
            (true, true) => Scenario::AllNew,
            (false, true) => Scenario::ExistingPlatform,
            (true, false) => Scenario::ExistingLogging,
            (false, false) => Scenario::AllExisting,
        }
    }

    /// Existing references, in dependency order.
    pub fn existing(&self) -> impl Iterator<Item = (Dependency, &ExistingRef)> {
        [Dependency::Platform, Dependency::Logging]
            .into_iter()
            .filter_map(|dep| match self.get(dep) {
                ResourceRef::Existing(existing) => Some((dep, existing)),
                ResourceRef::Created(_) => None,
            })
    }
}

/// The four combinations of the two independent create flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    AllNew,
    ExistingPlatform,
    ExistingLogging,
    AllExisting,
}

impl Scenario {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllNew => "all_new",
            Self::ExistingPlatform => "existing_platform",
            Self::ExistingLogging => "existing_logging",
            Self::AllExisting => "all_existing",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topology plus the non-fatal findings made while resolving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyResolution {
    pub topology: Topology,
    pub warnings: Vec<NamingWarning>,
}

/// Resolve both dependencies. The two decisions are independent; errors
/// from both are returned together.
pub fn resolve(
    convention: &NamingConvention,
    context: &NamingContext,
    inputs: &TopologyInputs,
) -> Result<TopologyResolution, Vec<ResolveError>> {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let mut decide = |dependency: Dependency, create: bool, existing: Option<&ExistingRef>| {
        let decision: Result<ResourceRef, Vec<ResolveError>> = if create {
            if let Some(existing) = existing {
                warnings.push(ignored_reference(dependency, existing));
            }
            resolve_component(convention, &context.component(dependency.component()))
                .map(ResourceRef::Created)
                .map_err(|errs| errs.into_iter().map(ResolveError::from).collect())
        } else {
            existing_reference(dependency, existing).map(|existing| {
                if existing.name.is_empty() {
                    warnings.push(unnamed_reference(dependency, &existing));
                }
                ResourceRef::Existing(existing)
            })
        };
        match decision {
            Ok(reference) => {
                tracing::debug!(
                    dependency = ?dependency,
                    mode = reference.mode(),
                    resource_group = %reference.resource_group(),
                    "resolved dependency"
                );
                Some(reference)
            }
            Err(errs) => {
                errors.extend(errs);
                None
            }
        }
    };

    let platform = decide(
        Dependency::Platform,
        inputs.create_platform,
        inputs.existing_platform.as_ref(),
    );
    let logging = decide(
        Dependency::Logging,
        inputs.create_logging,
        inputs.existing_logging.as_ref(),
    );

    match (platform, logging) {
        (Some(platform), Some(logging)) if errors.is_empty() => Ok(TopologyResolution {
            topology: Topology { platform, logging },
            warnings,
        }),
        _ => Err(errors),
    }
}

/// Check an existing reference without naming anything. Only the resource
/// group is required: role scopes and stage targets need nothing else. A
/// missing name yields an empty one.
///
/// Also used when the naming context itself is unusable but reference
/// errors should still be surfaced.
pub fn existing_reference(
    dependency: Dependency,
    existing: Option<&ExistingRef>,
) -> Result<ExistingRef, Vec<ResolveError>> {
    let resource_group = existing.map(|e| e.resource_group.trim()).unwrap_or_default();
    let name = existing.map(|e| e.name.trim()).unwrap_or_default();

    if resource_group.is_empty() {
        return Err(vec![ResolveError::MissingExistingReference {
            dependency,
            field: dependency.resource_group_field(),
        }]);
    }

    Ok(ExistingRef {
        resource_group: resource_group.to_string(),
        name: name.to_string(),
    })
}

fn unnamed_reference(dependency: Dependency, existing: &ExistingRef) -> NamingWarning {
    NamingWarning {
        kind: WarningKind::MissingExistingName,
        subject: existing.resource_group.clone(),
        message: format!(
            "{dependency} in {} has no {}; name-based outputs are omitted",
            existing.resource_group,
            dependency.name_field()
        ),
    }
}

fn ignored_reference(dependency: Dependency, existing: &ExistingRef) -> NamingWarning {
    NamingWarning {
        kind: WarningKind::IgnoredExistingReference,
        subject: existing.resource_group.clone(),
        message: format!(
            "{dependency} is created by this deployment; existing reference {}/{} is ignored",
            existing.resource_group, existing.name
        ),
    }
}
