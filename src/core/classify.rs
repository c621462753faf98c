//! Document classification.
//!
//! A candidate file is a genuine compilable document only when it carries
//! the configured source extension and its content, once comments are
//! stripped, contains the document begin marker. A marker that appears
//! only inside a comment does not count. Classification never aborts the
//! pipeline: anything unreadable is simply not a document.

use std::fs;
use std::path::Path;

use crate::core::config::{DiscoveryConfig, DocumentConfig};
use crate::core::text::{condense_whitespace, strip_line_comments};

/// Outcome of classifying a candidate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The file is a genuine compilable document.
    Document,
    /// The file only looks like a document (wrong extension, no begin
    /// marker outside comments, or unreadable).
    NotDocument,
}

/// Compiled classification rules derived from configuration.
#[derive(Debug, Clone)]
pub struct DocumentRules {
    extension: String,
    condensed_marker: String,
}

impl DocumentRules {
    /// Build rules from the document and discovery configuration sections.
    pub fn from_config(document: &DocumentConfig, discovery: &DiscoveryConfig) -> Self {
        Self {
            extension: discovery.source_extension.clone(),
            condensed_marker: condense_whitespace(&document.begin_marker),
        }
    }

    fn extension_matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

/// Classify a file on disk.
pub fn classify(path: &Path, rules: &DocumentRules) -> Classification {
    if !rules.extension_matches(path) {
        return Classification::NotDocument;
    }

    match fs::read_to_string(path) {
        Ok(content) => classify_content(&content, rules),
        Err(err) => {
            tracing::debug!("cannot read {} for classification: {err}", path.display());
            Classification::NotDocument
        }
    }
}

/// Classify already-read content. The extension check is the caller's
/// responsibility on this path; discovery has already applied it.
pub fn classify_content(content: &str, rules: &DocumentRules) -> Classification {
    let stripped = strip_line_comments(content);
    let condensed = condense_whitespace(&stripped);

    if condensed.contains(&rules.condensed_marker) {
        Classification::Document
    } else {
        Classification::NotDocument
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BakeConfig;

    fn rules() -> DocumentRules {
        let config = BakeConfig::default();
        DocumentRules::from_config(&config.document, &config.discovery)
    }

    #[test]
    fn accepts_document_with_marker() {
        let content = "\\documentclass{article}\n\\begin{document}\nhi\n\\end{document}\n";
        assert_eq!(classify_content(content, &rules()), Classification::Document);
    }

    #[test]
    fn accepts_marker_split_by_whitespace() {
        let content = "\\begin {document}\nhi\n\\end{document}\n";
        assert_eq!(classify_content(content, &rules()), Classification::Document);
    }

    #[test]
    fn rejects_fragment_without_marker() {
        let content = "Just a shared preamble.\n\\newcommand{\\foo}{bar}\n";
        assert_eq!(
            classify_content(content, &rules()),
            Classification::NotDocument
        );
    }

    #[test]
    fn rejects_marker_only_inside_comment() {
        let content = "preamble\n% \\begin{document}\ntext\n";
        assert_eq!(
            classify_content(content, &rules()),
            Classification::NotDocument
        );
    }

    #[test]
    fn marker_after_escaped_percent_is_found() {
        let content = "100\\% \\begin{document} body \\end{document}\n";
        assert_eq!(classify_content(content, &rules()), Classification::Document);
    }

    #[test]
    fn rejects_wrong_extension_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "\\begin{document}x\\end{document}").unwrap();
        assert_eq!(classify(&path, &rules()), Classification::NotDocument);
    }

    #[test]
    fn unreadable_file_is_not_a_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.tex");
        assert_eq!(classify(&path, &rules()), Classification::NotDocument);
    }

    #[test]
    fn classifies_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.tex");
        std::fs::write(&path, "\\begin{document}x\\end{document}").unwrap();
        assert_eq!(classify(&path, &rules()), Classification::Document);
    }
}
