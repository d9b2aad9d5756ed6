use super::Inputs;
use crate::cli::PlanArgs;
use crate::splitter;
use anyhow::Result;

pub fn run(args: &PlanArgs) -> Result<()> {
    let inputs = Inputs::load(&args.path, &args.names, args.names_format, args.pages_per_doc)?;
    let layout = splitter::layout(&inputs.source, &inputs.plan, !args.lenient)?;

    for line in &layout.logs {
        println!("{}", line);
    }
    println!();

    for assignment in &layout.assignments {
        println!("p{}: {}", assignment.pages, assignment.name);
    }

    let used = layout
        .assignments
        .iter()
        .map(|a| u64::from(a.pages.len()))
        .sum::<u64>();
    let unused = u64::from(layout.total_pages).saturating_sub(used);
    if unused > 0 {
        println!("\n{} trailing page(s) would not be used.", unused);
    }

    Ok(())
}
