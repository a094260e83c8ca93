//! `manifold configs` command

use anyhow::{anyhow, Result};

use super::Session;
use crate::cli::ConfigsArgs;
use manifold::core::ResolvedConfiguration;
use manifold::util::diagnostic::suggestions;

pub fn execute(args: ConfigsArgs, session: &Session) -> Result<()> {
    let project = session.load()?;
    let graph = project.assemble()?;

    let Some(name) = args.name else {
        for config in &graph.configurations {
            println!("{:<36} {}", config.name, activates(config));
        }
        return Ok(());
    };

    let config = graph.configuration(&name).ok_or_else(|| {
        anyhow!(
            "configuration `{}` not found\n{}",
            name,
            suggestions::CONFIG_NOT_FOUND
        )
    })?;

    println!("{}", config.name);
    println!("  chain:     {}", config.chain.join(" -> "));
    if let Some(platform) = config.platform {
        println!("  platform:  {}", platform);
    }
    if let Some(compiler) = config.compiler {
        println!("  compiler:  {}", compiler);
    }
    println!("  activates: {}", activates(config));

    if !config.compile_definitions.is_empty() {
        println!("  defines:");
        for (key, value) in &config.compile_definitions {
            println!("    {}={}", key, value);
        }
    }
    if !config.overrides.is_empty() {
        println!("  overrides:");
        for (key, value) in &config.overrides {
            println!("    {} = {}", key, value);
        }
    }

    let enabled = graph
        .targets
        .iter()
        .filter(|t| {
            graph
                .enabling_configurations(t)
                .iter()
                .any(|c| c.name == config.name)
        })
        .count();
    println!("  targets:   {}", enabled);

    Ok(())
}

fn activates(config: &ResolvedConfiguration) -> String {
    if config.activates.is_empty() {
        "(none)".to_string()
    } else {
        config
            .activates
            .iter()
            .map(|b| b.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
