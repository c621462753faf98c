//! Configuration types and management for texbake.
//!
//! All defaults live here so the CLI and library surfaces cannot drift
//! apart. Configuration is plain YAML, loadable and savable through the
//! same types the resolver consumes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, TexbakeError};

/// Main configuration for the build resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BakeConfig {
    /// Candidate discovery settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Document classification settings
    #[serde(default)]
    pub document: DocumentConfig,

    /// Include-directive resolution settings
    #[serde(default)]
    pub dependencies: DependencyConfig,

    /// Output artifact derivation
    #[serde(default)]
    pub output: OutputConfig,

    /// Concurrency limits
    #[serde(default)]
    pub performance: PerformanceConfig,

    /// External compiler invocation
    #[serde(default)]
    pub compiler: CompilerConfig,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            discovery: DiscoveryConfig::default(),
            document: DocumentConfig::default(),
            dependencies: DependencyConfig::default(),
            output: OutputConfig::default(),
            performance: PerformanceConfig::default(),
            compiler: CompilerConfig::default(),
        }
    }
}

impl BakeConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            TexbakeError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            TexbakeError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.performance.jobs == 0 {
            return Err(TexbakeError::config_field(
                "job limit must be at least 1",
                "performance.jobs",
            ));
        }

        if self.discovery.source_extension.is_empty() {
            return Err(TexbakeError::config_field(
                "source extension cannot be empty",
                "discovery.source_extension",
            ));
        }

        if self.output.artifact_extension.is_empty() {
            return Err(TexbakeError::config_field(
                "artifact extension cannot be empty",
                "output.artifact_extension",
            ));
        }

        if self.document.begin_marker.is_empty() {
            return Err(TexbakeError::config_field(
                "document begin marker cannot be empty",
                "document.begin_marker",
            ));
        }

        if self.compiler.command.trim().is_empty() {
            return Err(TexbakeError::config_field(
                "compiler command cannot be empty",
                "compiler.command",
            ));
        }

        Ok(())
    }
}

/// How candidate source files are discovered on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Extension a candidate must carry (without the leading dot)
    pub source_extension: String,

    /// Extra glob patterns excluded from discovery, relative to the root
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Maximum candidate size in bytes; 0 means unlimited
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            source_extension: "tex".to_string(),
            exclude_patterns: Vec::new(),
            max_file_size_bytes: default_max_file_size(),
        }
    }
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

/// What makes a candidate a genuine compilable document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Token that must appear outside comments for a file to count as a
    /// document rather than a fragment
    pub begin_marker: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            begin_marker: "\\begin{document}".to_string(),
        }
    }
}

/// How include directives are recognized and resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyConfig {
    /// Directive keywords scanned for, case-insensitively
    pub directives: Vec<String>,

    /// Extension appended when the literal include target does not exist
    pub fallback_extension: String,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            directives: vec![
                "input".to_string(),
                "activity".to_string(),
                "include".to_string(),
                "includeonly".to_string(),
            ],
            fallback_extension: "tex".to_string(),
        }
    }
}

/// How the output artifact path is derived from a source path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Extension substituted onto the source path (without the leading dot)
    pub artifact_extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            artifact_extension: "html".to_string(),
        }
    }
}

/// Concurrency and resource limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Maximum simultaneously in-flight per-file checks and compiles
    pub jobs: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self { jobs: 2 }
    }
}

/// External compiler invocation. The resolver only needs a pass/fail exit
/// status per file; everything else about compilation is the compiler's
/// business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Command run once per file needing compilation
    pub command: String,

    /// Arguments placed before the source file path
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: "pdflatex".to_string(),
            args: vec!["-interaction=nonstopmode".to_string()],
        }
    }
}
