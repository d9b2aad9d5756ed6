use crate::names::NameListFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfsplit")]
#[command(about = "Cut a PDF into fixed-size documents named from a list, packed into a ZIP")]
#[command(version)]
pub struct Cli {
    /// Log debug events to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server
    Mcp,

    /// Split a PDF and write the documents into a ZIP archive
    #[command(alias = "cut")]
    Split {
        #[command(flatten)]
        input: PlanArgs,

        /// Output ZIP file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show which pages each name would get, without writing anything
    Plan {
        #[command(flatten)]
        input: PlanArgs,
    },

    /// Print the output names a name-list file yields
    Names {
        /// Name list (.txt, one per line, or .xlsx with a "filename" column)
        path: PathBuf,

        /// Name list format (default: from the file extension)
        #[arg(long, value_enum)]
        names_format: Option<NameListFormat>,
    },
}

#[derive(Args)]
pub struct PlanArgs {
    /// PDF file to split
    pub path: PathBuf,

    /// Name list (.txt, one per line, or .xlsx with a "filename" column)
    #[arg(short, long)]
    pub names: PathBuf,

    /// Name list format (default: from the file extension)
    #[arg(long, value_enum)]
    pub names_format: Option<NameListFormat>,

    /// Pages in each output document
    #[arg(short, long, default_value = "3")]
    pub pages_per_doc: u32,

    /// Allow the page count to differ from names x pages-per-doc
    #[arg(long)]
    pub lenient: bool,
}
