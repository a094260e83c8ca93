//! `manifold graph` command

use anyhow::{anyhow, Result};

use super::Session;
use crate::cli::GraphArgs;
use manifold::ops::export::{self, ExportFormat};

pub fn execute(args: GraphArgs, session: &Session) -> Result<()> {
    let project = session.load()?;
    let graph = project.assemble()?;

    // Flag, then output extension, then config file.
    let format = match args.format {
        Some(ref f) => f.parse::<ExportFormat>().map_err(|e| anyhow!(e))?,
        None => args
            .output
            .as_deref()
            .and_then(ExportFormat::from_path)
            .or_else(|| project.config.format())
            .unwrap_or_default(),
    };
    let pretty = !args.compact && project.config.pretty();

    match args.output {
        Some(path) => {
            export::write(&graph, &path, format, pretty)?;
            eprintln!(
                "       Wrote {} targets to {}",
                graph.targets.len(),
                path.display()
            );
        }
        None => print!("{}", export::render(&graph, format, pretty)?),
    }

    Ok(())
}
