use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::naming::NamingContext;
use crate::resource::ExistingRef;

/// Flat deployment inputs, as read from a parameters source.
///
/// Every field is optional at the type level so a missing required field
/// is reported by validation instead of failing deserialization. Unknown
/// fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentInputs {
    pub application_name: Option<String>,
    pub environment_name: Option<String>,
    pub region: Option<String>,
    pub create_platform_group: Option<bool>,
    pub create_logging_group: Option<bool>,
    pub existing_platform_resource_group: Option<String>,
    pub existing_platform_name: Option<String>,
    pub existing_logging_resource_group: Option<String>,
    pub existing_logging_name: Option<String>,
    /// Workload principal. Defaults to the workload identity's resource path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,
}

impl DeploymentInputs {
    /// Inputs for the all-new topology.
    pub fn new(
        application_name: impl Into<String>,
        environment_name: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            application_name: Some(application_name.into()),
            environment_name: Some(environment_name.into()),
            region: Some(region.into()),
            create_platform_group: Some(true),
            create_logging_group: Some(true),
            ..Self::default()
        }
    }

    pub fn with_existing_platform(
        mut self,
        resource_group: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.create_platform_group = Some(false);
        self.existing_platform_resource_group = Some(resource_group.into());
        self.existing_platform_name = Some(name.into());
        self
    }

    pub fn with_existing_logging(
        mut self,
        resource_group: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.create_logging_group = Some(false);
        self.existing_logging_resource_group = Some(resource_group.into());
        self.existing_logging_name = Some(name.into());
        self
    }

    /// Parse either the flat shape or an ARM deployment-parameters document
    /// (`{"parameters": {"applicationName": {"value": "chat"}}}`).
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(flatten_parameters(value))
    }

    /// Required fields that are absent or blank, by input name.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.application_name) {
            missing.push("applicationName");
        }
        if blank(&self.environment_name) {
            missing.push("environmentName");
        }
        if blank(&self.region) {
            missing.push("region");
        }
        if self.create_platform_group.is_none() {
            missing.push("createPlatformGroup");
        }
        if self.create_logging_group.is_none() {
            missing.push("createLoggingGroup");
        }
        missing
    }

    /// The naming context, when all three naming fields are present.
    pub fn naming_context(&self) -> Option<NamingContext> {
        match (&self.application_name, &self.environment_name, &self.region) {
            (Some(app), Some(env), Some(region))
                if !app.trim().is_empty() && !env.trim().is_empty() && !region.trim().is_empty() =>
            {
                Some(NamingContext::new(app.trim(), env.trim(), region.trim()))
            }
            _ => None,
        }
    }

    /// The supplied existing platform reference, if any part of it was given.
    pub fn existing_platform(&self) -> Option<ExistingRef> {
        existing(
            &self.existing_platform_resource_group,
            &self.existing_platform_name,
        )
    }

    pub fn existing_logging(&self) -> Option<ExistingRef> {
        existing(
            &self.existing_logging_resource_group,
            &self.existing_logging_name,
        )
    }
}

fn blank(field: &Option<String>) -> bool {
    field.as_deref().is_none_or(|s| s.trim().is_empty())
}

fn existing(resource_group: &Option<String>, name: &Option<String>) -> Option<ExistingRef> {
    if blank(resource_group) && blank(name) {
        return None;
    }
    Some(ExistingRef {
        resource_group: resource_group.as_deref().unwrap_or_default().trim().to_string(),
        name: name.as_deref().unwrap_or_default().trim().to_string(),
    })
}

/// Collapse `{"parameters": {"k": {"value": v}}}` into `{"k": v}`.
/// Anything else passes through untouched.
fn flatten_parameters(value: Value) -> Value {
    let Value::Object(mut root) = value else {
        return value;
    };
    let Some(Value::Object(parameters)) = root.remove("parameters") else {
        return Value::Object(root);
    };

    let flat = parameters
        .into_iter()
        .map(|(key, param)| match param {
            Value::Object(mut wrapper) if wrapper.contains_key("value") => {
                (key, wrapper.remove("value").unwrap_or(Value::Null))
            }
            other => (key, other),
        })
        .collect();
    Value::Object(flat)
}
