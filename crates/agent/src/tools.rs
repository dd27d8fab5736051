use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::publisher::{DocumentPublisher, UPLOAD_CONFIRMATION};

/// Name the runtime dispatches proposal uploads under.
pub const STORE_PDF_TOOL: &str = "store_pdf";

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    async fn execute(&self, input: Value) -> Result<Value>;
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub async fn execute(&self, name: &str, input: Value) -> Result<Value> {
        let tool =
            self.tools.get(name).ok_or_else(|| anyhow!("no tool registered under `{name}`"))?;
        debug!(tool = name, "executing tool");
        tool.execute(input).await
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Renders drafted proposal text to PDF and uploads it.
///
/// Input: `{"pdf_text": "<proposal text>"}`. The tool never accepts a
/// destination from its caller; bucket and object key are fixed by the
/// publisher it wraps.
pub struct StorePdfTool {
    publisher: Arc<DocumentPublisher>,
}

impl StorePdfTool {
    pub fn new(publisher: Arc<DocumentPublisher>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl Tool for StorePdfTool {
    fn name(&self) -> &'static str {
        STORE_PDF_TOOL
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let text = input
            .get("pdf_text")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("store_pdf input requires a `pdf_text` string field"))?;

        let receipt = self.publisher.publish(text).await.context("storing proposal pdf")?;

        Ok(json!({
            "status": UPLOAD_CONFIRMATION,
            "object_name": receipt.object_name,
            "bytes_written": receipt.bytes_written,
        }))
    }
}
