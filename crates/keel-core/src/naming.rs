use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::convention::{ComponentKind, NameStyle, NamingConvention, ResourceKind};
use crate::error::NameError;

/// The application-wide naming inputs every component shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingContext {
    pub application_name: String,
    pub environment: String,
    pub region: String,
}

impl NamingContext {
    pub fn new(
        application_name: impl Into<String>,
        environment: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            application_name: application_name.into(),
            environment: environment.into(),
            region: region.into(),
        }
    }

    pub fn component(&self, kind: ComponentKind) -> ComponentSpec {
        ComponentSpec {
            kind,
            application_name: self.application_name.clone(),
            environment: self.environment.clone(),
            region: self.region.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub kind: ComponentKind,
    pub application_name: String,
    pub environment: String,
    pub region: String,
}

/// Every resolved name a component owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentNames {
    pub kind: ComponentKind,
    pub resource_group: String,
    pub resources: BTreeMap<ResourceKind, String>,
}

impl ComponentNames {
    pub fn get(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::ResourceGroup => Some(&self.resource_group),
            _ => self.resources.get(&kind).map(String::as_str),
        }
    }

    /// Name of the component's primary resource (e.g. the function app for
    /// the backend). Empty only for a hand-built bundle missing it.
    pub fn primary(&self) -> &str {
        self.get(self.kind.primary_resource()).unwrap_or_default()
    }
}

/// Compose the canonical name for one resource of a component.
///
/// Fails on an unknown region or a name that breaks the resource type's
/// rule. Never truncates: a shortened name could silently collide.
pub fn resolve(
    convention: &NamingConvention,
    spec: &ComponentSpec,
    resource: ResourceKind,
) -> Result<String, NameError> {
    let region_code = convention.regions.code(&spec.region)?;
    let rule = convention.rule(resource);
    let application = spec.application_name.to_lowercase();
    let environment = spec.environment.to_lowercase();
    let tokens = [
        rule.prefix,
        application.as_str(),
        convention.role_token(spec.kind),
        environment.as_str(),
        region_code,
    ];

    let name = match rule.style {
        NameStyle::Hyphenated => tokens.join("-"),
        NameStyle::Compact => tokens.concat().replace('-', ""),
    };

    rule.check(&name)
        .map_err(|violation| NameError::NameConstraintViolation {
            kind: resource,
            name: name.clone(),
            violation,
        })?;
    Ok(name)
}

/// Resolve the resource group and every owned resource of a component,
/// collecting all violations rather than stopping at the first.
pub fn resolve_component(
    convention: &NamingConvention,
    spec: &ComponentSpec,
) -> Result<ComponentNames, Vec<NameError>> {
    // One region error, not one per resource.
    convention
        .regions
        .code(&spec.region)
        .map_err(|e| vec![e])?;

    let mut errors = Vec::new();
    let resource_group = match resolve(convention, spec, ResourceKind::ResourceGroup) {
        Ok(name) => Some(name),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let mut resources = BTreeMap::new();
    for &kind in spec.kind.resources() {
        match resolve(convention, spec, kind) {
            Ok(name) => {
                resources.insert(kind, name);
            }
            Err(e) => errors.push(e),
        }
    }

    match resource_group {
        Some(resource_group) if errors.is_empty() => Ok(ComponentNames {
            kind: spec.kind,
            resource_group,
            resources,
        }),
        _ => Err(errors),
    }
}
