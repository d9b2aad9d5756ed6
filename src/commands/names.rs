use crate::names::NameListFormat;
use crate::plan::normalize_filename;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P, format: Option<NameListFormat>) -> Result<()> {
    let raw = super::read_names(&path, format)?;
    let names: Vec<String> = raw.iter().filter_map(|n| normalize_filename(n)).collect();

    if names.is_empty() {
        println!("No names found.");
        return Ok(());
    }

    for (i, name) in names.iter().enumerate() {
        println!("{:>4}  {}", i + 1, name);
    }

    println!("\n{} name(s) in {}", names.len(), path.as_ref().display());

    Ok(())
}
