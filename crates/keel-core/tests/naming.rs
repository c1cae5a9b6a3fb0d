use keel_core::naming::{resolve, resolve_component};
use keel_core::{
    ComponentKind, ComponentSpec, NameError, NameViolation, NamingContext, NamingConvention,
    ResourceKind,
};

fn spec(kind: ComponentKind, app: &str, env: &str, region: &str) -> ComponentSpec {
    NamingContext::new(app, env, region).component(kind)
}

#[test]
fn resource_group_follows_convention() {
    let convention = NamingConvention::global();
    let name = resolve(
        convention,
        &spec(ComponentKind::Frontend, "chat", "dev", "eastus"),
        ResourceKind::ResourceGroup,
    )
    .unwrap();
    assert_eq!(name, "rg-chat-frontend-dev-eus");

    let name = resolve(
        convention,
        &spec(ComponentKind::Platform, "chat", "prod", "swedencentral"),
        ResourceKind::ResourceGroup,
    )
    .unwrap();
    assert_eq!(name, "rg-chat-aifoundry-prod-sdc");
}

#[test]
fn hyphenated_resources_use_their_prefix() {
    let convention = NamingConvention::global();
    let backend = spec(ComponentKind::Backend, "chat", "dev", "eastus");

    assert_eq!(
        resolve(convention, &backend, ResourceKind::FunctionApp).unwrap(),
        "func-chat-backend-dev-eus"
    );
    assert_eq!(
        resolve(convention, &backend, ResourceKind::ManagedIdentity).unwrap(),
        "id-chat-backend-dev-eus"
    );

    let logging = spec(ComponentKind::Logging, "chat", "dev", "eastus");
    assert_eq!(
        resolve(convention, &logging, ResourceKind::LogAnalyticsWorkspace).unwrap(),
        "log-chat-logging-dev-eus"
    );
}

#[test]
fn storage_name_is_compact() {
    let convention = NamingConvention::global();
    let name = resolve(
        convention,
        &spec(ComponentKind::Backend, "chat", "dev", "eastus2"),
        ResourceKind::StorageAccount,
    )
    .unwrap();
    assert_eq!(name, "stchatbackenddeveus2");
    assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    assert!(name.len() <= 24);
}

#[test]
fn inputs_are_lowercased() {
    let convention = NamingConvention::global();
    let name = resolve(
        convention,
        &spec(ComponentKind::Backend, "Chat", "DEV", "East US"),
        ResourceKind::StorageAccount,
    )
    .unwrap();
    assert_eq!(name, "stchatbackenddeveus");
}

#[test]
fn resolution_is_deterministic() {
    let convention = NamingConvention::global();
    let backend = spec(ComponentKind::Backend, "chat", "test", "westeurope");
    let first = resolve_component(convention, &backend).unwrap();
    let second = resolve_component(convention, &backend).unwrap();
    assert_eq!(first, second);
}

#[test]
fn long_storage_name_is_rejected_not_truncated() {
    let convention = NamingConvention::global();
    let err = resolve(
        convention,
        &spec(ComponentKind::Backend, "contosoenterprise", "dev", "eastus"),
        ResourceKind::StorageAccount,
    )
    .unwrap_err();

    assert_eq!(
        err,
        NameError::NameConstraintViolation {
            kind: ResourceKind::StorageAccount,
            name: "stcontosoenterprisebackenddeveus".to_string(),
            violation: NameViolation::TooLong { len: 32, max: 24 },
        }
    );
}

#[test]
fn unknown_region_is_a_hard_error() {
    let convention = NamingConvention::global();
    let err = resolve(
        convention,
        &spec(ComponentKind::Frontend, "chat", "dev", "moonbase1"),
        ResourceKind::ResourceGroup,
    )
    .unwrap_err();
    assert!(matches!(err, NameError::InvalidRegion { region } if region == "moonbase1"));
}

#[test]
fn invalid_characters_are_reported() {
    let convention = NamingConvention::global();
    let err = resolve(
        convention,
        &spec(ComponentKind::Frontend, "chat_bot", "dev", "eastus"),
        ResourceKind::ResourceGroup,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        NameError::NameConstraintViolation {
            violation: NameViolation::InvalidCharset { character: '_' },
            ..
        }
    ));
}

#[test]
fn component_names_cover_owned_resources() {
    let convention = NamingConvention::global();
    let names =
        resolve_component(convention, &spec(ComponentKind::Platform, "chat", "dev", "eastus"))
            .unwrap();

    assert_eq!(names.resource_group, "rg-chat-aifoundry-dev-eus");
    assert_eq!(names.get(ResourceKind::AiServices), Some("aif-chat-aifoundry-dev-eus"));
    assert_eq!(names.get(ResourceKind::AiProject), Some("proj-chat-aifoundry-dev-eus"));
    assert_eq!(names.primary(), "aif-chat-aifoundry-dev-eus");
    assert_eq!(names.get(ResourceKind::StorageAccount), None);
}

#[test]
fn component_errors_are_collected() {
    let convention = NamingConvention::global();
    // Too long for storage; fine everywhere else.
    let errors = resolve_component(
        convention,
        &spec(ComponentKind::Backend, "contosoenterprise", "dev", "eastus"),
    )
    .unwrap_err();
    assert_eq!(errors.len(), 1);

    // A bad region is reported once, not once per resource.
    let errors = resolve_component(
        convention,
        &spec(ComponentKind::Backend, "chat", "dev", "nowhere"),
    )
    .unwrap_err();
    assert_eq!(errors.len(), 1);
}

/// Known limitation: compact names drop hyphens, so two different
/// application names can compose the same storage account name.
#[test]
fn compact_names_can_collide_across_applications() {
    let convention = NamingConvention::global();
    let hyphenated = resolve(
        convention,
        &spec(ComponentKind::Backend, "my-app", "dev", "eastus"),
        ResourceKind::StorageAccount,
    )
    .unwrap();
    let plain = resolve(
        convention,
        &spec(ComponentKind::Backend, "myapp", "dev", "eastus"),
        ResourceKind::StorageAccount,
    )
    .unwrap();
    assert_eq!(hyphenated, plain);

    // The hyphenated names stay distinct.
    let a = resolve(
        convention,
        &spec(ComponentKind::Backend, "my-app", "dev", "eastus"),
        ResourceKind::FunctionApp,
    )
    .unwrap();
    let b = resolve(
        convention,
        &spec(ComponentKind::Backend, "myapp", "dev", "eastus"),
        ResourceKind::FunctionApp,
    )
    .unwrap();
    assert_ne!(a, b);
}
