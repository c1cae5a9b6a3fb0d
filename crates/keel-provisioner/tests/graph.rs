use keel_core::naming::resolve_component;
use keel_core::{ComponentKind, ExistingRef, NamingContext, NamingConvention, ResourceKind};
use keel_provisioner::error::ResolveError;
use keel_provisioner::graph::{self, DeploymentStage, StageGraph, StageId, StageKind};
use keel_provisioner::plan::AppNames;
use keel_provisioner::topology::{self, Topology, TopologyInputs};

fn context() -> NamingContext {
    NamingContext::new("chat", "dev", "eastus")
}

fn app_names() -> AppNames {
    let convention = NamingConvention::global();
    let context = context();
    AppNames {
        frontend: resolve_component(convention, &context.component(ComponentKind::Frontend))
            .unwrap(),
        backend: resolve_component(convention, &context.component(ComponentKind::Backend))
            .unwrap(),
    }
}

fn topology(create_platform: bool, create_logging: bool) -> Topology {
    let inputs = TopologyInputs {
        create_platform,
        create_logging,
        existing_platform: Some(ExistingRef {
            resource_group: "rg-shared-ai".to_string(),
            name: "aif-shared".to_string(),
        }),
        existing_logging: Some(ExistingRef {
            resource_group: "rg-shared-logging".to_string(),
            name: "log-shared".to_string(),
        }),
    };
    topology::resolve(NamingConvention::global(), &context(), &inputs)
        .unwrap()
        .topology
}

fn ids(graph: &StageGraph) -> Vec<&str> {
    graph.stages().iter().map(|s| s.id.as_str()).collect()
}

#[test]
fn all_new_orders_shared_dependencies_first() {
    let graph = graph::build(&app_names(), &topology(true, true)).unwrap();

    assert_eq!(
        ids(&graph),
        [
            "logging.group",
            "logging",
            "platform.group",
            "platform",
            "frontend.group",
            "backend.group",
            "frontend",
            "backend",
            "backend.rbac",
            "platform.rbac",
        ]
    );

    assert!(graph.has_edge("platform", "backend"));
    assert!(graph.has_edge("logging", "backend"));
    assert!(graph.has_edge("logging", "frontend"));
    assert!(graph.has_edge("platform", "platform.rbac"));
    assert!(graph.has_edge("backend", "platform.rbac"));
    assert!(graph.has_edge("backend", "backend.rbac"));
    assert!(!graph.has_edge("platform", "frontend"));
}

#[test]
fn every_edge_points_backwards_in_the_order() {
    for (create_platform, create_logging) in [(true, true), (false, true), (true, false), (false, false)] {
        let graph = graph::build(&app_names(), &topology(create_platform, create_logging)).unwrap();
        let position = |id: &StageId| graph.stages().iter().position(|s| &s.id == id).unwrap();
        for (from, to) in graph.edges() {
            assert!(position(from) < position(to), "{from} must precede {to}");
        }
    }
}

#[test]
fn existing_platform_adds_no_platform_stage_or_edge() {
    let graph = graph::build(&app_names(), &topology(false, true)).unwrap();

    assert!(!graph.contains("platform"));
    assert!(!graph.contains("platform.group"));
    assert!(graph.has_edge("logging", "backend"));
    assert!(graph.dependents_of(&StageId::from("platform")).next().is_none());

    let backend = graph.get(&StageId::from("backend")).unwrap();
    assert_eq!(
        backend.depends_on.iter().map(StageId::as_str).collect::<Vec<_>>(),
        ["backend.group", "logging"]
    );

    // Roles on the shared platform still run, against the supplied group.
    let rbac = graph.get(&StageId::from("platform.rbac")).unwrap();
    assert_eq!(rbac.resource_group_target, "rg-shared-ai");
    assert_eq!(
        rbac.depends_on.iter().map(StageId::as_str).collect::<Vec<_>>(),
        ["backend"]
    );
}

#[test]
fn all_existing_has_no_cross_group_creation_edges() {
    let graph = graph::build(&app_names(), &topology(false, false)).unwrap();

    assert_eq!(
        ids(&graph),
        [
            "frontend.group",
            "backend.group",
            "frontend",
            "backend",
            "backend.rbac",
            "platform.rbac",
        ]
    );
    assert!(!graph.contains("logging"));
    assert!(!graph.contains("platform"));
    for (from, to) in graph.edges() {
        let same_component = to.as_str().starts_with(from.as_str().split('.').next().unwrap());
        assert!(
            same_component || from.as_str() == "backend",
            "unexpected edge {from} -> {to}"
        );
    }
}

#[test]
fn resource_stages_carry_descriptors_in_declaration_order() {
    let graph = graph::build(&app_names(), &topology(true, true)).unwrap();

    let backend = graph.get(&StageId::resources(ComponentKind::Backend)).unwrap();
    assert_eq!(backend.kind, StageKind::Resources);
    assert_eq!(backend.resource_group_target, "rg-chat-backend-dev-eus");
    assert_eq!(
        backend.resources.iter().map(|r| r.kind).collect::<Vec<_>>(),
        ComponentKind::Backend.resources()
    );

    let platform = graph.get(&StageId::resources(ComponentKind::Platform)).unwrap();
    let project = platform
        .resources
        .iter()
        .find(|r| r.kind == ResourceKind::AiProject)
        .unwrap();
    assert_eq!(project.parent.as_deref(), Some("aif-chat-aifoundry-dev-eus"));

    let group = graph.get(&StageId::group(ComponentKind::Frontend)).unwrap();
    assert_eq!(group.kind, StageKind::ResourceGroup);
    assert_eq!(group.resources.len(), 1);
    assert_eq!(group.resources[0].name, "rg-chat-frontend-dev-eus");
}

#[test]
fn waves_group_independent_stages() {
    let graph = graph::build(&app_names(), &topology(true, true)).unwrap();
    let waves: Vec<Vec<&str>> = graph
        .waves()
        .into_iter()
        .map(|wave| wave.into_iter().map(StageId::as_str).collect())
        .collect();

    assert_eq!(
        waves,
        vec![
            vec!["logging.group", "platform.group", "frontend.group", "backend.group"],
            vec!["logging", "platform"],
            vec!["frontend", "backend"],
            vec!["backend.rbac", "platform.rbac"],
        ]
    );
}

#[test]
fn building_twice_is_identical() {
    let names = app_names();
    let topology = topology(false, true);
    assert_eq!(
        graph::build(&names, &topology).unwrap(),
        graph::build(&names, &topology).unwrap()
    );
}

fn stage(id: &str) -> DeploymentStage {
    DeploymentStage::new(StageId::from(id), StageKind::Resources, "rg-test")
}

#[test]
fn ties_break_by_declaration_order() {
    let graph = StageGraph::new(vec![
        stage("c"),
        stage("a").after(StageId::from("c")),
        stage("b"),
        stage("d"),
    ])
    .unwrap();

    assert_eq!(ids(&graph), ["c", "a", "b", "d"]);
}

#[test]
fn cycle_is_rejected_with_its_members() {
    let errors = StageGraph::new(vec![
        stage("root"),
        stage("a").after(StageId::from("b")),
        stage("b").after(StageId::from("a")),
        stage("leaf").after(StageId::from("a")),
    ])
    .unwrap_err();

    assert_eq!(
        errors,
        vec![ResolveError::CyclicDependency {
            stages: vec![StageId::from("a"), StageId::from("b"), StageId::from("leaf")],
        }]
    );
}

#[test]
fn edge_to_undeclared_stage_is_rejected() {
    let errors = StageGraph::new(vec![
        stage("a"),
        stage("b").after(StageId::from("ghost")),
    ])
    .unwrap_err();

    assert_eq!(
        errors,
        vec![ResolveError::UnknownDependency {
            stage: StageId::from("b"),
            missing: StageId::from("ghost"),
        }]
    );
}
