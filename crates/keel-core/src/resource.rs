use serde::{Deserialize, Serialize};

use crate::convention::{ComponentKind, ResourceKind};
use crate::naming::ComponentNames;
use crate::scopes;

/// A caller-supplied reference to a resource this deployment must not touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingRef {
    pub resource_group: String,
    pub name: String,
}

/// A shared dependency, resolved once: either provisioned by this
/// deployment or bound read-only to something that already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResourceRef {
    Created(ComponentNames),
    Existing(ExistingRef),
}

impl ResourceRef {
    /// Path of the dependency's primary resource, or of its resource group
    /// when an existing reference carries no name.
    pub fn resource_id(&self, component: ComponentKind) -> String {
        match self {
            Self::Existing(existing) if existing.name.is_empty() => {
                scopes::resource_group(&existing.resource_group)
            }
            _ => scopes::resource(
                self.resource_group(),
                component.primary_resource(),
                self.name(),
            ),
        }
    }

    /// Name of the dependency's primary resource.
    pub fn name(&self) -> &str {
        match self {
            Self::Created(names) => names.primary(),
            Self::Existing(existing) => &existing.name,
        }
    }

    pub fn resource_group(&self) -> &str {
        match self {
            Self::Created(names) => &names.resource_group,
            Self::Existing(existing) => &existing.resource_group,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Existing(_) => "existing",
        }
    }

    /// Names resolved for a `Created` dependency.
    pub fn created_names(&self) -> Option<&ComponentNames> {
        match self {
            Self::Created(names) => Some(names),
            Self::Existing(_) => None,
        }
    }
}

/// One unit of work handed to the provisioner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub name: String,
    pub resource_group: String,
    /// Parent resource name for nested types (AI project → AI services account).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent: Option<String>,
}

impl ResourceDescriptor {
    pub fn new(kind: ResourceKind, name: impl Into<String>, resource_group: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            resource_group: resource_group.into(),
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn resource_id(&self) -> String {
        match &self.parent {
            Some(parent) => {
                scopes::child_resource(&self.resource_group, self.kind, parent, &self.name)
            }
            None => scopes::resource(&self.resource_group, self.kind, &self.name),
        }
    }
}
