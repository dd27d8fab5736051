use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use renoprop_agent::llm::GeminiClient;
use renoprop_agent::{AgentRuntime, DocumentPublisher};
use renoprop_core::config::{AppConfig, LoadOptions};
use renoprop_storage::GcsClient;

use super::CommandResult;

/// Interactive conversation loop over stdin/stdout. Each line is one
/// turn; `quit`, `exit`, or EOF ends the session.
pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("chat", "config_validation", error.to_string(), 2)
        }
    };
    crate::init_logging(&config);

    let runtime = match build_runtime(&config) {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure("chat", "bootstrap", format!("{error:#}"), 3)
        }
    };

    let executor = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(executor) => executor,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                3,
            )
        }
    };

    println!("Describe your renovation and I will draft and upload a proposal.");
    println!("(type `quit` or press ctrl-d to end the conversation)");

    let stdin = io::stdin();
    let mut turns = 0usize;
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if matches!(message, "quit" | "exit") {
            break;
        }

        turns += 1;
        match executor.block_on(runtime.handle_message(message)) {
            Ok(reply) => println!("{}", reply.message()),
            Err(error) => println!("Something went wrong: {error:#}"),
        }
        let _ = io::stdout().flush();
    }

    CommandResult::success("chat", format!("conversation ended after {turns} turn(s)"))
}

fn build_runtime(config: &AppConfig) -> Result<AgentRuntime> {
    let llm = Arc::new(GeminiClient::new(&config.llm)?);
    let store = Arc::new(GcsClient::new(&config.storage)?);
    let publisher =
        Arc::new(DocumentPublisher::with_object_name(store, &config.storage.object_name));
    Ok(AgentRuntime::new(llm, publisher))
}
