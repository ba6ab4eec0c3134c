//! `mooring classify` command

use anyhow::{Context, Result};

use crate::cli::ClassifyArgs;
use mooring::ops::classify_dir;
use mooring::util::GlobalContext;

pub fn execute(args: ClassifyArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let dir = ctx.cwd().join(&args.dir);
    let config = ctx.load_config(&dir);

    let report = classify_dir(&dir, &config)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{}", json);
        return Ok(());
    }

    println!("{}", report.path.display());
    println!("  method:   {}", report.method.kind());
    if let Some(name) = report.method.package_name() {
        println!("  package:  {}", name);
    }
    if let Some(location) = report.method.location() {
        if location != report.path {
            println!("  location: {}", location.display());
        }
    }
    if let (Some(file), Some(score)) = (&report.config_file, report.config_score) {
        println!("  config:   {} (score {})", file.display(), score);
    }
    if let Some(dir) = &report.artifact_dir {
        println!("  runtime:  {}", dir.display());
    }

    Ok(())
}
