//! Agent runtime - proposal drafting and document publishing
//!
//! This crate is the "brain" of renoprop: it turns a user's renovation
//! request into an uploaded proposal PDF.
//!
//! # Architecture
//!
//! The agent follows a constrained loop:
//! 1. **Intent Extraction** (`conversation`) - parse NL → structured [`proposal request`](renoprop_core::ProposalRequest)
//! 2. **Drafting** (`llm`, `prompt`) - the LLM writes the proposal prose
//! 3. **Tool Execution** (`tools`, `publisher`) - render to PDF, upload to the bucket
//! 4. **Confirmation** - report the stored document back to the user
//!
//! # Safety Principle
//!
//! The LLM is strictly a drafter. It NEVER decides where the document is
//! stored, what the object key is, or whether an upload succeeded. Those
//! are deterministic decisions made by the publisher.

pub mod conversation;
pub mod llm;
pub mod prompt;
pub mod publisher;
pub mod runtime;
pub mod tools;

pub use publisher::{DocumentPublisher, PublishError, PDF_CONTENT_TYPE, UPLOAD_CONFIRMATION};
pub use runtime::{AgentReply, AgentRuntime};
