use crate::error::{Result, SplitError};
use crate::page_range::{whole_groups, PageGroup};
use std::collections::HashSet;
use tracing::warn;

const PDF_EXTENSION: &str = ".pdf";

/// How a source PDF should be cut: a fixed page count per output and the
/// names those outputs should get, in order.
#[derive(Debug, Clone)]
pub struct SplitPlan {
    pub pages_per_doc: u32,
    pub filenames: Vec<String>,
}

/// One output document: its archive entry name and the pages it receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub pages: PageGroup,
}

/// The result of checking a plan against a concrete page count.
#[derive(Debug, Clone)]
pub struct Layout {
    pub total_pages: u32,
    pub expected_pages: u64,
    pub assignments: Vec<Assignment>,
    pub logs: Vec<String>,
}

impl SplitPlan {
    pub fn new(pages_per_doc: u32, filenames: Vec<String>) -> Self {
        SplitPlan {
            pages_per_doc,
            filenames,
        }
    }

    /// Check the plan itself, before any document is looked at, and return
    /// the normalized names.
    pub fn validate(&self) -> Result<Vec<String>> {
        if self.pages_per_doc == 0 {
            return Err(SplitError::InvalidPlan(
                "pages-per-document must be greater than 0".to_string(),
            ));
        }

        let names: Vec<String> = self
            .filenames
            .iter()
            .filter_map(|raw| normalize_filename(raw))
            .collect();

        if names.is_empty() {
            return Err(SplitError::InvalidPlan("filename list is empty".to_string()));
        }

        Ok(names)
    }

    /// Reconcile the plan with a document of `total_pages` pages.
    ///
    /// In strict mode the page count has to match exactly. Otherwise as many
    /// whole groups as fit are assigned, in name order, and anything left over
    /// is ignored.
    pub fn layout(&self, total_pages: u32, strict: bool) -> Result<Layout> {
        let names = self.validate()?;
        let expected_pages = names.len() as u64 * u64::from(self.pages_per_doc);

        let mut logs = vec![
            format!("Total pages in PDF: {}", total_pages),
            format!("Names in list: {}", names.len()),
            format!("Pages per document: {}", self.pages_per_doc),
            format!("Expected pages: {}", expected_pages),
        ];

        if strict && u64::from(total_pages) != expected_pages {
            return Err(SplitError::PageCountMismatch {
                actual: total_pages,
                expected: expected_pages,
            });
        }

        let max_docs = whole_groups(total_pages, self.pages_per_doc, names.len());
        if max_docs < names.len() {
            warn!(max_docs, names = names.len(), "not enough pages for every name");
            logs.push(format!(
                "Warning: not enough pages for every name. Documents to be created: {} of {}",
                max_docs,
                names.len()
            ));
        }

        let mut seen = HashSet::new();
        let mut assignments = Vec::with_capacity(max_docs);
        for (i, name) in names.into_iter().take(max_docs).enumerate() {
            let unique = disambiguate(&name, &seen);
            if unique != name {
                warn!(%name, renamed = %unique, "duplicate output name");
                logs.push(format!(
                    "Warning: duplicate name {}, saved as {}",
                    name, unique
                ));
            }
            seen.insert(unique.clone());
            assignments.push(Assignment {
                name: unique,
                pages: PageGroup::nth(i as u32, self.pages_per_doc),
            });
        }

        Ok(Layout {
            total_pages,
            expected_pages,
            assignments,
            logs,
        })
    }
}

/// Turn a user-supplied name into a safe archive entry name.
///
/// Returns `None` for blank names. Directory components are stripped, so
/// `../../etc/passwd` becomes `passwd.pdf`.
pub fn normalize_filename(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let unified = trimmed.replace('\\', "/");
    let base = unified.rsplit('/').next().unwrap_or_default();
    if base.is_empty() {
        return None;
    }

    let mut name = base.to_string();
    if !name.to_ascii_lowercase().ends_with(PDF_EXTENSION) {
        name.push_str(PDF_EXTENSION);
    }
    Some(name)
}

/// Pick `name`, or `stem_N.ext` for the smallest N >= 2 not yet taken.
fn disambiguate(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }

    // Normalized names always carry the extension, in whatever case.
    let (stem, ext) = name.split_at(name.len() - PDF_EXTENSION.len());
    (2u32..)
        .map(|n| format!("{}_{}{}", stem, n, ext))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}
