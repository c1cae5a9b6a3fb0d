//! Plain-text views of plans for terminal output.

use std::fmt::Write;

use keel_core::{ComponentNames, ResourceRef};
use keel_provisioner::{Deployment, ResolvedPlan};

pub fn plan(plan: &ResolvedPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "plan: {} / {} in {} ({})",
        plan.application_name, plan.environment_name, plan.region, plan.region_code
    );
    let _ = writeln!(out, "topology: {}", plan.scenario);

    let _ = writeln!(out, "\nnames:");
    out.push_str(&names(&[plan.names.frontend.clone(), plan.names.backend.clone()]));

    let _ = writeln!(out, "\ndependencies:");
    for (label, reference) in [
        ("platform", &plan.topology.platform),
        ("logging", &plan.topology.logging),
    ] {
        let _ = writeln!(
            out,
            "  {label:<10} {:<8} {} / {}",
            reference.mode(),
            reference.resource_group(),
            reference.name()
        );
        if let ResourceRef::Created(created) = reference {
            for (kind, name) in &created.resources {
                let _ = writeln!(out, "    {kind:<26} {name}");
            }
        }
    }

    let _ = writeln!(out, "\nstages:");
    for (wave, ids) in plan.stages.waves().iter().enumerate() {
        for id in ids {
            let Some(stage) = plan.stage(id) else { continue };
            let deps: Vec<&str> = stage.depends_on.iter().map(|d| d.as_str()).collect();
            let _ = writeln!(
                out,
                "  [{wave}] {:<16} -> {:<32} after: {}",
                id.as_str(),
                stage.resource_group_target,
                if deps.is_empty() { "-".to_string() } else { deps.join(", ") }
            );
        }
    }

    let _ = writeln!(out, "\nrole assignments (principal {}):", plan.principal_id);
    for assignment in &plan.role_assignments {
        let _ = writeln!(
            out,
            "  {:<32} {}  [{}]",
            assignment.role_name, assignment.scope, assignment.id
        );
    }

    if !plan.warnings.is_empty() {
        let _ = writeln!(out, "\nwarnings:");
        for warning in &plan.warnings {
            let _ = writeln!(out, "  ! {}", warning.message);
        }
    }

    let _ = writeln!(out, "\noutputs:");
    for (key, value) in &plan.outputs {
        let _ = writeln!(out, "  {key:<28} {value}");
    }
    out
}

pub fn names(components: &[ComponentNames]) -> String {
    let mut out = String::new();
    for component in components {
        let _ = writeln!(out, "  {} ({})", component.kind, component.resource_group);
        for (kind, name) in &component.resources {
            let _ = writeln!(out, "    {kind:<26} {name}");
        }
    }
    out
}

pub fn deployment(deployment: &Deployment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "completed stages:");
    for (i, stage) in deployment.completed_stages.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {stage}", i + 1);
    }
    let _ = writeln!(out, "\nresources:");
    for state in deployment.resources.values() {
        let _ = writeln!(out, "  {:<9} {}", state.status.as_str(), state.resource_id);
    }
    out
}
