//! Command implementations

pub mod classify;
pub mod completions;
pub mod generate;
pub mod graph;

use anyhow::Result;

use crate::cli::InputArgs;
use mooring::core::Workspace;
use mooring::util::GlobalContext;

/// Discover the workspace named by the input arguments.
pub fn workspace(args: &InputArgs, verbose: bool, color: bool) -> Result<Workspace> {
    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(verbose);
    ctx.set_color(color);

    let third_party = args.third_party.as_ref().map(|p| ctx.cwd().join(p));
    Ok(Workspace::discover(args.input.as_deref(), &ctx)?.with_third_party_root(third_party))
}
