use std::sync::Arc;

use keel_core::naming::resolve_component;
use keel_core::{ComponentKind, NamingContext, NamingConvention};
use keel_provisioner::{DryRunProvisioner, ResolvedPlan};

use crate::Format;
use crate::config::load_inputs;
use crate::render;

fn resolve_plan(params: &str) -> eyre::Result<ResolvedPlan> {
    let inputs = load_inputs(params)?;
    Ok(keel_provisioner::resolve(&inputs)?)
}

pub fn plan(params: &str, format: Format) -> eyre::Result<()> {
    let plan = resolve_plan(params)?;
    match format {
        Format::Json => println!("{}", plan.to_json()?),
        Format::Text => print!("{}", render::plan(&plan)),
    }
    Ok(())
}

pub fn outputs(params: &str) -> eyre::Result<()> {
    let plan = resolve_plan(params)?;
    println!("{}", serde_json::to_string_pretty(&plan.outputs)?);
    Ok(())
}

pub fn names(app: &str, env: &str, region: &str) -> eyre::Result<()> {
    let convention = NamingConvention::global();
    let context = NamingContext::new(app, env, region);

    let mut resolved = Vec::new();
    let mut errors = Vec::new();
    for kind in ComponentKind::ALL {
        match resolve_component(convention, &context.component(kind)) {
            Ok(names) => resolved.push(names),
            Err(errs) => errors.extend(errs),
        }
    }

    if !errors.is_empty() {
        // Region errors repeat per component.
        errors.dedup();
        let lines: Vec<String> = errors.iter().map(|e| format!("  - {e}")).collect();
        return Err(eyre::eyre!(
            "{} naming error(s)\n{}",
            errors.len(),
            lines.join("\n")
        ));
    }

    print!("{}", render::names(&resolved));
    Ok(())
}

pub fn regions() -> eyre::Result<()> {
    for (region, code) in NamingConvention::global().regions.iter() {
        println!("{region:<24} {code}");
    }
    Ok(())
}

pub async fn simulate(params: &str) -> eyre::Result<()> {
    let plan = resolve_plan(params)?;
    let deployment = keel_provisioner::execute(&plan, Arc::new(DryRunProvisioner)).await?;
    print!("{}", render::deployment(&deployment));
    Ok(())
}
