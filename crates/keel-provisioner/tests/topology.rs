use keel_core::{ExistingRef, NamingContext, NamingConvention, ResourceKind, ResourceRef, WarningKind};
use keel_provisioner::error::ResolveError;
use keel_provisioner::topology::{self, Dependency, Scenario, TopologyInputs};

fn context() -> NamingContext {
    NamingContext::new("chat", "dev", "eastus")
}

fn existing(resource_group: &str, name: &str) -> ExistingRef {
    ExistingRef {
        resource_group: resource_group.to_string(),
        name: name.to_string(),
    }
}

#[test]
fn all_new_creates_both_dependencies() {
    let inputs = TopologyInputs {
        create_platform: true,
        create_logging: true,
        ..TopologyInputs::default()
    };
    let resolution = topology::resolve(NamingConvention::global(), &context(), &inputs).unwrap();
    let topology = resolution.topology;

    assert_eq!(topology.scenario(), Scenario::AllNew);
    assert!(resolution.warnings.is_empty());

    let ResourceRef::Created(platform) = &topology.platform else {
        panic!("platform should be created");
    };
    assert_eq!(platform.resource_group, "rg-chat-aifoundry-dev-eus");
    assert_eq!(
        platform.get(ResourceKind::AiServices),
        Some("aif-chat-aifoundry-dev-eus")
    );
    assert_eq!(
        platform.get(ResourceKind::AiProject),
        Some("proj-chat-aifoundry-dev-eus")
    );

    assert_eq!(topology.logging.resource_group(), "rg-chat-logging-dev-eus");
    assert_eq!(topology.logging.name(), "log-chat-logging-dev-eus");
    assert_eq!(topology.existing().count(), 0);
}

#[test]
fn existing_platform_is_bound_as_given() {
    let inputs = TopologyInputs {
        create_platform: false,
        create_logging: true,
        existing_platform: Some(existing("rg-shared-ai", "aif-shared")),
        existing_logging: None,
    };
    let topology = topology::resolve(NamingConvention::global(), &context(), &inputs)
        .unwrap()
        .topology;

    assert_eq!(topology.scenario(), Scenario::ExistingPlatform);
    assert_eq!(
        topology.platform,
        ResourceRef::Existing(existing("rg-shared-ai", "aif-shared"))
    );
    assert!(topology.logging.is_created());

    let bound: Vec<_> = topology.existing().collect();
    assert_eq!(bound.len(), 1);
    assert_eq!(bound[0].0, Dependency::Platform);
}

#[test]
fn existing_logging_and_all_existing() {
    let convention = NamingConvention::global();
    let inputs = TopologyInputs {
        create_platform: true,
        create_logging: false,
        existing_platform: None,
        existing_logging: Some(existing("rg-shared-logging", "log-shared")),
    };
    let topology = topology::resolve(convention, &context(), &inputs).unwrap().topology;
    assert_eq!(topology.scenario(), Scenario::ExistingLogging);

    let inputs = TopologyInputs {
        create_platform: false,
        create_logging: false,
        existing_platform: Some(existing("rg-shared-ai", "aif-shared")),
        existing_logging: Some(existing("rg-shared-logging", "log-shared")),
    };
    let topology = topology::resolve(convention, &context(), &inputs).unwrap().topology;
    assert_eq!(topology.scenario(), Scenario::AllExisting);
    assert_eq!(topology.platform.mode(), "existing");
    assert_eq!(topology.logging.mode(), "existing");
    assert_eq!(topology.existing().count(), 2);
}

#[test]
fn missing_reference_requires_the_resource_group() {
    let inputs = TopologyInputs {
        create_platform: true,
        create_logging: false,
        existing_platform: None,
        existing_logging: None,
    };
    let errors = topology::resolve(NamingConvention::global(), &context(), &inputs).unwrap_err();

    assert_eq!(
        errors,
        vec![ResolveError::MissingExistingReference {
            dependency: Dependency::Logging,
            field: "existingLoggingResourceGroup",
        }]
    );
}

#[test]
fn blank_resource_group_counts_as_missing() {
    let errors = topology::existing_reference(
        Dependency::Platform,
        Some(&existing("   ", "aif-shared")),
    )
    .unwrap_err();

    assert_eq!(
        errors,
        vec![ResolveError::MissingExistingReference {
            dependency: Dependency::Platform,
            field: "existingPlatformResourceGroup",
        }]
    );
}

#[test]
fn resource_group_alone_binds_with_warning() {
    let inputs = TopologyInputs {
        create_platform: false,
        create_logging: true,
        existing_platform: Some(existing(" rg-shared-ai ", "")),
        existing_logging: None,
    };
    let resolution = topology::resolve(NamingConvention::global(), &context(), &inputs).unwrap();

    assert_eq!(
        resolution.topology.platform,
        ResourceRef::Existing(existing("rg-shared-ai", ""))
    );
    assert_eq!(resolution.warnings.len(), 1);
    assert_eq!(resolution.warnings[0].kind, WarningKind::MissingExistingName);
    assert_eq!(resolution.warnings[0].subject, "rg-shared-ai");
}

#[test]
fn errors_from_both_dependencies_are_collected() {
    let inputs = TopologyInputs {
        create_platform: false,
        create_logging: false,
        existing_platform: None,
        existing_logging: Some(existing("", "log-shared")),
    };
    let errors = topology::resolve(NamingConvention::global(), &context(), &inputs).unwrap_err();

    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(|e| matches!(
        e,
        ResolveError::MissingExistingReference {
            dependency: Dependency::Logging,
            field: "existingLoggingResourceGroup",
        }
    )));
}

#[test]
fn reference_supplied_alongside_create_flag_is_ignored_with_warning() {
    let inputs = TopologyInputs {
        create_platform: true,
        create_logging: true,
        existing_platform: Some(existing("rg-shared-ai", "aif-shared")),
        existing_logging: None,
    };
    let resolution = topology::resolve(NamingConvention::global(), &context(), &inputs).unwrap();

    assert!(resolution.topology.platform.is_created());
    assert_eq!(resolution.warnings.len(), 1);
    assert_eq!(
        resolution.warnings[0].kind,
        WarningKind::IgnoredExistingReference
    );
    assert_eq!(resolution.warnings[0].subject, "rg-shared-ai");
}
