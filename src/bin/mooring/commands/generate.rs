//! `mooring generate` command

use anyhow::Result;

use crate::cli::GenerateArgs;
use mooring::ops::{generate, FileStatus, GenerateOptions};
use mooring::util::ProcessEnv;

pub fn execute(args: GenerateArgs, verbose: bool, color: bool) -> Result<()> {
    let ws = super::workspace(&args.input, verbose, color)?;
    let opts = GenerateOptions {
        dry_run: args.dry_run,
    };

    let result = generate(&ws, &ProcessEnv, &opts)?;

    for file in &result.files {
        let status = match file.status {
            FileStatus::Written => "Generated",
            FileStatus::Unchanged => "Unchanged",
            FileStatus::Planned => "Would write",
        };
        println!("{:>12} {}", status, file.path.display());
    }

    if args.dry_run {
        println!("{} files planned (dry run)", result.files.len());
    } else {
        println!(
            "{} of {} files written",
            result.written(),
            result.files.len()
        );
    }

    Ok(())
}
