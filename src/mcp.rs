use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};

use crate::commands::{write_archive, Inputs};
use crate::names::NameListFormat;
use crate::plan::Assignment;
use crate::splitter;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the PDF file to split")]
    pub path: String,
    #[schemars(description = "Path to the name list (.txt, one name per line, or .xlsx with a 'filename' column)")]
    pub names_path: String,
    #[schemars(description = "Name list format: 'lines' or 'table' (default: from the file extension)")]
    #[serde(default)]
    pub names_format: Option<NameListFormat>,
    #[schemars(description = "Number of pages in each output document")]
    pub pages_per_doc: u32,
    #[schemars(description = "Require the PDF page count to equal names x pages_per_doc (default: true)")]
    #[serde(default = "default_strict")]
    pub strict: bool,
    #[schemars(description = "Output ZIP file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitPlanRequest {
    #[schemars(description = "Path to the PDF file to split")]
    pub path: String,
    #[schemars(description = "Path to the name list (.txt, one name per line, or .xlsx with a 'filename' column)")]
    pub names_path: String,
    #[schemars(description = "Name list format: 'lines' or 'table' (default: from the file extension)")]
    #[serde(default)]
    pub names_format: Option<NameListFormat>,
    #[schemars(description = "Number of pages in each output document")]
    pub pages_per_doc: u32,
    #[schemars(description = "Require the PDF page count to equal names x pages_per_doc (default: true)")]
    #[serde(default = "default_strict")]
    pub strict: bool,
}

fn default_strict() -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct SplitServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl SplitServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for SplitServer {
    fn default() -> Self {
        Self::new()
    }
}

fn split_to_file(req: PdfSplitRequest) -> Result<SplitResult> {
    let inputs = Inputs::load(&req.path, &req.names_path, req.names_format, req.pages_per_doc)?;
    let result = splitter::split(&inputs.source, &inputs.plan, req.strict)?;

    write_archive(&req.output, &result.archive)?;

    Ok(SplitResult {
        output_path: req.output,
        documents: result
            .documents
            .into_iter()
            .map(|d| DocumentResult {
                name: d.name,
                first_page: d.pages.first_page(),
                last_page: d.pages.last_page(),
            })
            .collect(),
        logs: result.logs,
    })
}

fn plan_split(req: PdfSplitPlanRequest) -> Result<PlanResult> {
    let inputs = Inputs::load(&req.path, &req.names_path, req.names_format, req.pages_per_doc)?;
    let layout = splitter::layout(&inputs.source, &inputs.plan, req.strict)?;

    Ok(PlanResult {
        total_pages: layout.total_pages,
        expected_pages: layout.expected_pages,
        documents: layout.assignments.into_iter().map(DocumentResult::from).collect(),
        logs: layout.logs,
    })
}

#[tool_router]
impl SplitServer {
    #[tool(description = "Split a PDF into documents of a fixed page count, named from a name list, and write them into a ZIP archive")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        match split_to_file(req) {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Check a split without writing anything: page counts, warnings, and the page range each name would receive")]
    fn pdf_split_plan(&self, Parameters(req): Parameters<PdfSplitPlanRequest>) -> String {
        match plan_split(req) {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DocumentResult {
    pub name: String,
    pub first_page: u32,
    pub last_page: u32,
}

impl From<Assignment> for DocumentResult {
    fn from(a: Assignment) -> Self {
        DocumentResult {
            name: a.name,
            first_page: a.pages.first_page(),
            last_page: a.pages.last_page(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitResult {
    pub output_path: String,
    pub documents: Vec<DocumentResult>,
    pub logs: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PlanResult {
    pub total_pages: u32,
    pub expected_pages: u64,
    pub documents: Vec<DocumentResult>,
    pub logs: Vec<String>,
}

impl ServerHandler for SplitServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF splitting tools. Use pdf_split_plan to check how a PDF would be cut for a \
                 given name list and page count, and pdf_split to write the resulting documents \
                 into a ZIP archive."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = SplitServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
