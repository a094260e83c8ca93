//! `manifold check` command

use anyhow::Result;

use super::Session;
use crate::cli::CheckArgs;

pub fn execute(args: CheckArgs, session: &Session) -> Result<()> {
    let project = session.load()?;
    let graph = project.assemble()?;

    eprintln!(
        "     Checked `{}` v{}: {} targets, {} configurations ({})",
        graph.name,
        graph.version,
        graph.targets.len(),
        graph.configurations.len(),
        project.manifest_path.display()
    );

    if args.fingerprint {
        println!("{}", graph.fingerprint()?);
    }

    Ok(())
}
