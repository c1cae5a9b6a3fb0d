//! Resource path conventions.
//!
//! Pure string functions. Paths are subscription-relative so a plan can be
//! resolved before the target subscription is known.

use crate::convention::ResourceKind;

pub fn resource_group(name: &str) -> String {
    format!("/resourceGroups/{name}")
}

pub fn resource(resource_group: &str, kind: ResourceKind, name: &str) -> String {
    match kind {
        ResourceKind::ResourceGroup => self::resource_group(name),
        _ => format!(
            "/resourceGroups/{resource_group}/providers/{}/{name}",
            kind.arm_type()
        ),
    }
}

/// Path of a child resource, e.g. a project under an AI services account.
/// `kind.arm_type()` must have the `Namespace/parentType/childType` shape.
pub fn child_resource(resource_group: &str, kind: ResourceKind, parent: &str, name: &str) -> String {
    let mut segments = kind.arm_type().splitn(3, '/');
    let namespace = segments.next().unwrap_or_default();
    let parent_type = segments.next().unwrap_or_default();
    let child_type = segments.next().unwrap_or_default();
    format!(
        "/resourceGroups/{resource_group}/providers/{namespace}/{parent_type}/{parent}/{child_type}/{name}"
    )
}

pub fn role_assignment(scope: &str, assignment_id: &str) -> String {
    format!("{scope}/providers/Microsoft.Authorization/roleAssignments/{assignment_id}")
}

pub fn function_api_url(function_app: &str) -> String {
    format!("https://{function_app}.azurewebsites.net/api")
}

pub fn ai_services_endpoint(account: &str) -> String {
    format!("https://{account}.services.ai.azure.com")
}

pub fn ai_project_endpoint(account: &str, project: &str) -> String {
    format!("https://{account}.services.ai.azure.com/api/projects/{project}")
}
