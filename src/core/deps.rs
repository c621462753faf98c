//! Include-directive extraction and resolution.
//!
//! Scans comment-stripped source for `\input`, `\activity`, `\include`
//! and `\includeonly` directives (configurable, case-insensitive) and
//! resolves each brace argument against the directory of the referencing
//! file. A target that exists neither literally nor with the fallback
//! extension appended is a fatal error: staleness evaluation would be
//! unsound without it.

use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};

use crate::core::config::DependencyConfig;
use crate::core::errors::{Result, TexbakeError};
use crate::core::paths::normalize_lexical;
use crate::core::text::strip_line_comments;

/// Compiled directive-scanning rules derived from configuration.
#[derive(Debug, Clone)]
pub struct DependencyRules {
    directive: Regex,
    fallback_extension: String,
}

impl DependencyRules {
    /// Build rules from the dependency configuration section.
    pub fn from_config(config: &DependencyConfig) -> Result<Self> {
        if config.directives.is_empty() {
            return Err(TexbakeError::config_field(
                "at least one directive keyword is required",
                "dependencies.directives",
            ));
        }

        let keywords = config
            .directives
            .iter()
            .map(|d| regex::escape(d))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"\\\s*(?:{keywords})\s*\{{\s*([^{{}}]*?)\s*\}}");

        let directive = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|err| {
                TexbakeError::config_field(
                    format!("invalid directive pattern: {err}"),
                    "dependencies.directives",
                )
            })?;

        Ok(Self {
            directive,
            fallback_extension: config.fallback_extension.clone(),
        })
    }
}

/// Extract and resolve every dependency referenced by `source_file`,
/// reading its content from disk.
pub fn extract_dependencies(source_file: &Path, rules: &DependencyRules) -> Result<Vec<PathBuf>> {
    let content =
        std::fs::read_to_string(source_file).map_err(|err| TexbakeError::io_at(source_file, err))?;
    extract_from_content(source_file, &content, rules)
}

/// Extract and resolve dependencies from already-read content.
///
/// Result order matches source order; duplicate references are preserved.
pub fn extract_from_content(
    source_file: &Path,
    content: &str,
    rules: &DependencyRules,
) -> Result<Vec<PathBuf>> {
    let stripped = strip_line_comments(content);
    let base = source_file.parent().unwrap_or_else(|| Path::new(""));

    let mut dependencies = Vec::new();
    for capture in rules.directive.captures_iter(&stripped) {
        let reference = capture[1].trim();
        if reference.is_empty() {
            continue;
        }
        dependencies.push(resolve_reference(source_file, base, reference, rules)?);
    }

    Ok(dependencies)
}

/// Resolve one directive argument: the literal path first, then with the
/// fallback extension appended.
fn resolve_reference(
    source_file: &Path,
    base: &Path,
    reference: &str,
    rules: &DependencyRules,
) -> Result<PathBuf> {
    let literal = normalize_lexical(&base.join(reference));
    if literal.is_file() {
        return Ok(literal);
    }

    let mut with_extension = literal.clone().into_os_string();
    with_extension.push(".");
    with_extension.push(&rules.fallback_extension);
    let with_extension = PathBuf::from(with_extension);
    if with_extension.is_file() {
        return Ok(with_extension);
    }

    Err(TexbakeError::MissingDependency {
        source_file: source_file.to_path_buf(),
        reference: reference.to_string(),
        tried: vec![literal, with_extension],
    })
}
