//! Report rendering for the terminal.

use std::path::Path;

use console::style;

use texbake::core::pipeline::{ExclusionReason, Resolution};

/// Render a resolution report as styled text.
pub fn print_resolution(resolution: &Resolution) {
    let root = &resolution.root;

    if !resolution.diagnostics.is_empty() {
        println!(
            "{}",
            style(format!(
                "Skipped {} non-documents, {} untracked files",
                resolution.excluded(ExclusionReason::NotDocument),
                resolution.excluded(ExclusionReason::Untracked),
            ))
            .dim()
        );
    }

    if resolution.needs_compilation.is_empty() {
        println!(
            "{} all {} documents are up to date",
            style("Nothing to bake:").green().bold(),
            resolution.up_to_date.len()
        );
        return;
    }

    println!(
        "{} {} of {} candidates",
        style("Needs compilation:").yellow().bold(),
        resolution.needs_compilation.len(),
        resolution.discovered
    );
    for path in &resolution.needs_compilation {
        println!("  {}", display_relative(path, root));
    }
}

/// Render a resolution report as JSON on stdout.
pub fn print_resolution_json(resolution: &Resolution) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(resolution)?);
    Ok(())
}

/// Summarize a compile run; returns an error when any file failed.
pub fn print_compile_summary(succeeded: usize, failed: &[&Path], root: &Path) -> anyhow::Result<()> {
    if failed.is_empty() {
        println!(
            "{} {} documents compiled",
            style("The bake is done:").green().bold(),
            succeeded
        );
        return Ok(());
    }

    eprintln!(
        "{} {} of {} documents failed to compile:",
        style("Bake failed:").red().bold(),
        failed.len(),
        succeeded + failed.len()
    );
    for path in failed {
        eprintln!("  {}", display_relative(path, root));
    }
    anyhow::bail!("{} compile jobs failed", failed.len())
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
