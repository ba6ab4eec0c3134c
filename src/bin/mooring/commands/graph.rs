//! `mooring graph` command

use anyhow::Result;

use crate::cli::{FormatArg, GraphArgs};
use mooring::ops::{format_graph, resolve_workspace, GraphFormat};
use mooring::util::ProcessEnv;

pub fn execute(args: GraphArgs, verbose: bool, color: bool) -> Result<()> {
    let ws = super::workspace(&args.input, verbose, color)?;
    let resolved = resolve_workspace(&ws, &ProcessEnv)?;

    let format = match args.format {
        FormatArg::Text => GraphFormat::Text,
        FormatArg::Json => GraphFormat::Json,
    };
    print!("{}", format_graph(&resolved, format)?);
    if format == GraphFormat::Json {
        println!();
    }

    Ok(())
}
