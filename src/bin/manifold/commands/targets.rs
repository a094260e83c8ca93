//! `manifold targets` command

use anyhow::{anyhow, Result};

use super::Session;
use crate::cli::TargetsArgs;
use manifold::core::{Compiler, Platform, ProjectGraph, TargetOrigin, TargetRecord};
use manifold::ops::evaluate::{evaluate, ConfigurationContext};
use manifold::ops::export::{self, ExportFormat};
use manifold::util::diagnostic::suggestions;
use manifold::util::Config;

pub fn execute(args: TargetsArgs, session: &Session) -> Result<()> {
    let project = session.load()?;
    let graph = project.assemble()?;

    let Some(ref config_name) = args.config else {
        for target in &graph.targets {
            println!("{}", describe(target));
        }
        return Ok(());
    };

    let ctx = context(&graph, config_name, &args, &project.config)?;
    let evaluated = evaluate(&graph, &ctx);

    if let Some(ref format) = args.format {
        let format: ExportFormat = format.parse().map_err(|e: String| anyhow!(e))?;
        print!(
            "{}",
            export::render(&evaluated, format, project.config.pretty())?
        );
        return Ok(());
    }

    for target in &evaluated.targets {
        println!("{:<28} {}", target.name, target.dependencies.join(" "));
    }
    eprintln!(
        "     {} of {} targets enabled by `{}`",
        evaluated.targets.len(),
        graph.targets.len(),
        evaluated.configuration
    );

    Ok(())
}

/// Build the evaluation context: flags win over the configuration's own
/// platform/compiler, which win over tool config defaults.
fn context<'g>(
    graph: &'g ProjectGraph,
    name: &str,
    args: &TargetsArgs,
    config: &Config,
) -> Result<ConfigurationContext<'g>> {
    let resolved = graph.configuration(name).ok_or_else(|| {
        anyhow!(
            "configuration `{}` not found\n{}",
            name,
            suggestions::CONFIG_NOT_FOUND
        )
    })?;

    let mut ctx = ConfigurationContext::new(resolved);
    if ctx.platform.is_none() {
        ctx.platform = config.platform();
    }
    if ctx.compiler.is_none() {
        ctx.compiler = config.compiler();
    }
    if let Some(ref platform) = args.platform {
        ctx = ctx.with_platform(platform.parse::<Platform>().map_err(|e| anyhow!(e))?);
    }
    if let Some(ref compiler) = args.compiler {
        ctx = ctx.with_compiler(compiler.parse::<Compiler>().map_err(|e| anyhow!(e))?);
    }
    Ok(ctx)
}

fn describe(target: &TargetRecord) -> String {
    let origin = match &target.origin {
        TargetOrigin::Catalog { entry, backend } => {
            let ui = if target.is_ui_variant() { ", ui" } else { "" };
            format!("{} [{}{}]", entry, backend, ui)
        }
        TargetOrigin::Declared => "declared".to_string(),
    };
    format!("{:<28} {:<13} {}", target.name, target.kind.as_str(), origin)
}
