//! `manifold explain` command

use anyhow::Result;

use super::Session;
use crate::cli::ExplainArgs;
use manifold::core::TargetOrigin;
use manifold::ops::explain::explain;

pub fn execute(args: ExplainArgs, session: &Session) -> Result<()> {
    let project = session.load()?;
    let graph = project.assemble()?;

    let explained = explain(&graph, &args.target)?;

    println!("{}", explained.name);
    match &explained.origin {
        TargetOrigin::Catalog { entry, backend } => {
            let variant = if explained.ui_variant { " (debug UI variant)" } else { "" };
            println!(
                "└─ generated from sample `{}` for backend `{}`{}",
                entry, backend, variant
            );
        }
        TargetOrigin::Declared => println!("└─ declared in [targets]"),
    }

    println!();
    if explained.configurations.is_empty() {
        println!("Not enabled by any configuration");
    } else {
        println!("Enabled by:");
        for config in &explained.configurations {
            println!("  {}", config);
        }
    }

    if !explained.dependencies.is_empty() {
        println!();
        println!("Dependencies:");
        for dep in &explained.dependencies {
            let source = dep
                .source
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unresolved".to_string());
            match &dep.platform {
                Some(platform) => println!("  → {} ({}, {} only)", dep.name, source, platform),
                None => println!("  → {} ({})", dep.name, source),
            }
        }
    }

    if !explained.dependents.is_empty() {
        println!();
        println!("Required by:");
        for dependent in &explained.dependents {
            println!("  {}", dependent);
        }
    }

    Ok(())
}
