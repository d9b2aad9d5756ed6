pub mod names;
pub mod plan;
pub mod split;

use crate::names::NameListFormat;
use crate::plan::SplitPlan;
use anyhow::{Context, Result};
use std::path::Path;

/// Read a name list, using `format` if given and the extension otherwise.
pub fn read_names<P: AsRef<Path>>(path: P, format: Option<NameListFormat>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let format = match format {
        Some(format) => format,
        None => NameListFormat::from_path(path)?,
    };

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read name list: {}", path.display()))?;
    let names = format
        .read(&bytes)
        .with_context(|| format!("Failed to parse name list: {}", path.display()))?;
    Ok(names)
}

/// Write archive bytes to `path`, creating missing parent directories.
pub fn write_archive<P: AsRef<Path>>(path: P, archive: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, archive)
        .with_context(|| format!("Failed to write archive: {}", path.display()))?;
    Ok(())
}

/// Everything a split needs, loaded from disk.
pub struct Inputs {
    pub source: Vec<u8>,
    pub plan: SplitPlan,
}

impl Inputs {
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        pdf: P,
        names: Q,
        format: Option<NameListFormat>,
        pages_per_doc: u32,
    ) -> Result<Self> {
        let pdf = pdf.as_ref();
        let source =
            std::fs::read(pdf).with_context(|| format!("Failed to read PDF: {}", pdf.display()))?;
        let filenames = read_names(names, format)?;
        Ok(Inputs {
            source,
            plan: SplitPlan::new(pages_per_doc, filenames),
        })
    }
}
