use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde_json::json;
use tracing::{info, warn};

use crate::conversation::IntentExtractor;
use crate::llm::LlmClient;
use crate::prompt::drafting_prompt;
use crate::publisher::DocumentPublisher;
use crate::tools::{StorePdfTool, ToolRegistry, STORE_PDF_TOOL};

/// Outcome of one conversational turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentReply {
    /// The message lacked a renovation requirement; ask and wait.
    Clarification(String),
    /// Drafted, rendered, and uploaded. Carries the user-facing report.
    Published { message: String, object_name: String },
}

impl AgentReply {
    pub fn message(&self) -> &str {
        match self {
            AgentReply::Clarification(message) => message,
            AgentReply::Published { message, .. } => message,
        }
    }
}

/// Drives the extract -> draft -> publish -> confirm loop.
///
/// Each stage is deterministic except drafting: the LLM writes prose and
/// nothing else. Where the document lands and what counts as success is
/// decided by the registered tool, never by model output.
pub struct AgentRuntime {
    extractor: IntentExtractor,
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
}

impl AgentRuntime {
    pub fn new(llm: Arc<dyn LlmClient>, publisher: Arc<DocumentPublisher>) -> Self {
        let mut tools = ToolRegistry::default();
        tools.register(StorePdfTool::new(publisher));
        Self { extractor: IntentExtractor::new(), llm, tools }
    }

    pub async fn handle_message(&self, text: &str) -> Result<AgentReply> {
        let intent = self.extractor.extract(text);
        if let Some(question) = intent.clarification_prompt.clone() {
            warn!(confidence = intent.confidence_score, "message needs clarification");
            return Ok(AgentReply::Clarification(question));
        }

        let request = intent.into_request();
        info!(
            scope = %request.renovation_request,
            location = request.contractor_location.as_deref().unwrap_or("unspecified"),
            "drafting proposal"
        );

        let draft = self.llm.complete(&drafting_prompt(&request)).await?;

        let outcome = self.tools.execute(STORE_PDF_TOOL, json!({ "pdf_text": draft })).await?;
        let status = outcome
            .get("status")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| anyhow!("store_pdf tool returned no status"))?;
        let object_name = outcome
            .get("object_name")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| anyhow!("store_pdf tool returned no object name"))?;

        Ok(AgentReply::Published {
            message: format!("{status} Your proposal is stored as `{object_name}`."),
            object_name: object_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use renoprop_core::proposal::PROPOSAL_OBJECT_NAME;
    use renoprop_storage::MemoryObjectStore;

    use super::{AgentReply, AgentRuntime};
    use crate::llm::LlmClient;
    use crate::publisher::{DocumentPublisher, UPLOAD_CONFIRMATION};

    struct ScriptedLlm {
        reply: String,
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.reply.clone())
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmClient for FailingLlm {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(anyhow!("model unavailable"))
        }
    }

    fn runtime_with(llm: Arc<dyn LlmClient>, store: Arc<MemoryObjectStore>) -> AgentRuntime {
        AgentRuntime::new(llm, Arc::new(DocumentPublisher::new(store)))
    }

    #[tokio::test]
    async fn full_turn_drafts_publishes_and_confirms() {
        let store = Arc::new(MemoryObjectStore::new());
        let llm = Arc::new(ScriptedLlm { reply: "PROPOSAL DOCUMENT\nKitchen remodel.".to_string() });
        let runtime = runtime_with(llm, store.clone());

        let reply = runtime
            .handle_message("kitchen remodel, contractor in San Jose, budget $30k")
            .await
            .expect("turn should succeed");

        match reply {
            AgentReply::Published { message, object_name } => {
                assert!(message.starts_with(UPLOAD_CONFIRMATION));
                assert_eq!(object_name, PROPOSAL_OBJECT_NAME);
            }
            other => panic!("expected a published reply, got {other:?}"),
        }
        assert!(store.get(PROPOSAL_OBJECT_NAME).is_some());
    }

    #[tokio::test]
    async fn vague_message_asks_for_clarification_without_drafting() {
        let store = Arc::new(MemoryObjectStore::new());
        let llm = Arc::new(FailingLlm);
        let runtime = runtime_with(llm, store.clone());

        let reply = runtime.handle_message("hello there").await.expect("clarification is not an error");
        assert!(matches!(reply, AgentReply::Clarification(_)));
        assert!(reply.message().contains("What would you like to renovate"));
        assert_eq!(store.attempts(), 0, "no upload before the requirement is known");
    }

    #[tokio::test]
    async fn llm_failure_propagates_and_nothing_is_stored() {
        let store = Arc::new(MemoryObjectStore::new());
        let runtime = runtime_with(Arc::new(FailingLlm), store.clone());

        let error = runtime.handle_message("bathroom renovation please").await.expect_err("must fail");
        assert!(error.to_string().contains("model unavailable"));
        assert_eq!(store.attempts(), 0);
    }

    #[tokio::test]
    async fn upload_failure_propagates_as_a_storage_error() {
        let store = Arc::new(MemoryObjectStore::new());
        store.fail_next(1);
        let llm = Arc::new(ScriptedLlm { reply: "Drafted proposal text.".to_string() });
        let runtime = runtime_with(llm, store.clone());

        let error = runtime.handle_message("kitchen remodel").await.expect_err("must fail");
        assert!(error.to_string().contains("storing proposal pdf"));
        assert_eq!(store.attempts(), 1, "upload is attempted exactly once");
        assert_eq!(store.object_count(), 0);
    }
}
