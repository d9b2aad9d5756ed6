use super::Inputs;
use crate::cli::PlanArgs;
use crate::splitter;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(args: &PlanArgs, output: P) -> Result<()> {
    let output = output.as_ref();
    let inputs = Inputs::load(&args.path, &args.names, args.names_format, args.pages_per_doc)?;

    let result = splitter::split(&inputs.source, &inputs.plan, !args.lenient)?;

    super::write_archive(output, &result.archive)?;

    for line in &result.logs {
        println!("{}", line);
    }

    let pdf_bytes: usize = result.documents.iter().map(|d| d.size).sum();
    println!(
        "\nWrote {} document(s) ({} bytes of PDF) to {}",
        result.documents.len(),
        pdf_bytes,
        output.display()
    );

    Ok(())
}
