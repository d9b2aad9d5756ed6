//! Cut one PDF into fixed-size documents and pack them into a ZIP.
//!
//! Everything here is pure: bytes and a plan go in, archive bytes and a log
//! come out. Reading files and showing the log is left to the caller.

use crate::archive::ArchiveBuilder;
use crate::error::Result;
use crate::page_range::PageGroup;
use crate::pdf::PdfDocument;
use crate::plan::{Layout, SplitPlan};
use tracing::{debug, info};

/// One document written into the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDocument {
    pub name: String,
    pub pages: PageGroup,
    pub size: usize,
}

#[derive(Debug)]
pub struct SplitOutput {
    pub archive: Vec<u8>,
    pub logs: Vec<String>,
    pub documents: Vec<SplitDocument>,
}

/// Load the source and work out which pages go where, without writing
/// anything.
pub fn layout(source: &[u8], plan: &SplitPlan, strict: bool) -> Result<Layout> {
    // A bad plan is reported before the document is even parsed
    plan.validate()?;
    let pdf = PdfDocument::from_bytes(source)?;
    plan.layout(pdf.page_count(), strict)
}

pub fn split(source: &[u8], plan: &SplitPlan, strict: bool) -> Result<SplitOutput> {
    plan.validate()?;
    let pdf = PdfDocument::from_bytes(source)?;
    let Layout {
        assignments,
        mut logs,
        ..
    } = plan.layout(pdf.page_count(), strict)?;

    let mut archive = ArchiveBuilder::new();
    let mut documents = Vec::with_capacity(assignments.len());

    for assignment in assignments {
        let mut doc = pdf.extract_group(assignment.pages)?;
        let bytes = PdfDocument::to_bytes(&mut doc)?;
        archive.add(&assignment.name, &bytes)?;

        debug!(
            name = %assignment.name,
            pages = %assignment.pages,
            size = bytes.len(),
            "created document"
        );
        logs.push(format!(
            "Created: {} (pages {})",
            assignment.name, assignment.pages
        ));
        documents.push(SplitDocument {
            name: assignment.name,
            pages: assignment.pages,
            size: bytes.len(),
        });
    }

    let archive = archive.finish()?;
    info!(
        documents = documents.len(),
        archive_size = archive.len(),
        "split finished"
    );

    Ok(SplitOutput {
        archive,
        logs,
        documents,
    })
}
