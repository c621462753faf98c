//! Command execution logic.

use std::path::Path;
use std::sync::Arc;

use console::style;
use futures::future;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use texbake::core::pipeline::{resolve, Resolution};
use texbake::{BakeConfig, RepositorySnapshot};

use crate::cli::args::{BakeArgs, InitConfigArgs, ReportFormat, ResolveArgs, ValidateConfigArgs};
use crate::cli::output;

/// Run the resolution pipeline and report the result.
pub async fn resolve_command(args: ResolveArgs) -> anyhow::Result<()> {
    let config = load_configuration(args.config.as_deref(), args.jobs)?;
    let resolution = run_resolution(&args.path, &config).await?;

    match args.format {
        ReportFormat::Text => output::print_resolution(&resolution),
        ReportFormat::Json => output::print_resolution_json(&resolution)?,
    }
    Ok(())
}

/// Resolve, then run the configured external compiler over the stale
/// documents with the same job limit.
pub async fn bake_command(args: BakeArgs) -> anyhow::Result<()> {
    let config = load_configuration(args.config.as_deref(), args.jobs)?;
    let resolution = run_resolution(&args.path, &config).await?;
    output::print_resolution(&resolution);

    if resolution.needs_compilation.is_empty() {
        return Ok(());
    }

    compile_files(&resolution, &config).await
}

/// Print the default configuration as YAML.
pub fn print_default_config() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&BakeConfig::default())?);
    Ok(())
}

/// Write a default configuration file.
pub fn init_config(args: InitConfigArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite",
            args.output.display()
        );
    }

    BakeConfig::default().to_yaml_file(&args.output)?;
    println!(
        "{} {}",
        style("Wrote default configuration to").green(),
        args.output.display()
    );
    Ok(())
}

/// Validate a configuration file and report the outcome.
pub fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    match BakeConfig::from_yaml_file(&args.config) {
        Ok(_) => {
            println!(
                "{} {}",
                style("Configuration is valid:").green().bold(),
                args.config.display()
            );
            Ok(())
        }
        Err(err) => {
            eprintln!(
                "{} {}",
                style("Configuration is invalid:").red().bold(),
                err
            );
            anyhow::bail!("invalid configuration")
        }
    }
}

/// Load configuration, falling back to defaults, and apply the CLI job
/// override.
fn load_configuration(path: Option<&Path>, jobs: Option<usize>) -> anyhow::Result<BakeConfig> {
    let mut config = match path {
        Some(path) => BakeConfig::from_yaml_file(path)?,
        None => BakeConfig::default(),
    };

    if let Some(jobs) = jobs {
        config.performance.jobs = jobs;
    }
    config.validate()?;
    Ok(config)
}

async fn run_resolution(root: &Path, config: &BakeConfig) -> anyhow::Result<Resolution> {
    let snapshot = RepositorySnapshot::discover(root)?;
    info!("resolving {} against {}", root.display(), snapshot.workdir().display());
    Ok(resolve(root, config, &snapshot).await?)
}

/// Invoke the external compiler once per stale document, bounded by the
/// job limit. Only per-file pass/fail is interpreted; everything else
/// about compilation belongs to the compiler.
async fn compile_files(resolution: &Resolution, config: &BakeConfig) -> anyhow::Result<()> {
    let command = config.compiler.command.clone();
    let args = config.compiler.args.clone();
    let semaphore = Arc::new(Semaphore::new(config.performance.jobs));

    let jobs: Vec<_> = resolution
        .needs_compilation
        .iter()
        .map(|path| {
            let command = command.clone();
            let args = args.clone();
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .unwrap_or_else(|_| unreachable!("compile semaphore is never closed"));

                info!("compiling {}", path.display());
                let status = tokio::process::Command::new(&command)
                    .args(&args)
                    .arg(path)
                    .current_dir(path.parent().unwrap_or(Path::new(".")))
                    .status()
                    .await;

                match status {
                    Ok(status) if status.success() => true,
                    Ok(status) => {
                        warn!("{} exited with {status} for {}", command, path.display());
                        false
                    }
                    Err(err) => {
                        warn!("failed to launch {command}: {err}");
                        false
                    }
                }
            }
        })
        .collect();

    let outcomes = future::join_all(jobs).await;

    let mut failed = Vec::new();
    let mut succeeded = 0usize;
    for (path, ok) in resolution.needs_compilation.iter().zip(outcomes) {
        if ok {
            succeeded += 1;
        } else {
            failed.push(path.as_path());
        }
    }

    output::print_compile_summary(succeeded, &failed, &resolution.root)
}
