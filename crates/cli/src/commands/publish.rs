use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use renoprop_agent::{DocumentPublisher, PublishError, UPLOAD_CONFIRMATION};
use renoprop_core::config::{AppConfig, LoadOptions};
use renoprop_storage::GcsClient;

use super::CommandResult;

/// One-shot publish: takes already-written proposal text, renders it to
/// PDF, and uploads it. No drafting model is involved.
pub fn run(file: Option<&Path>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("publish", "config_validation", error.to_string(), 2)
        }
    };
    crate::init_logging(&config);

    let text = match read_proposal_text(file) {
        Ok(text) => text,
        Err(message) => return CommandResult::failure("publish", "input", message, 3),
    };

    let store = match GcsClient::new(&config.storage) {
        Ok(store) => Arc::new(store),
        Err(error) => {
            return CommandResult::failure("publish", "storage_bootstrap", error.to_string(), 4)
        }
    };
    let publisher = DocumentPublisher::with_object_name(store, &config.storage.object_name);

    let executor = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(executor) => executor,
        Err(error) => {
            return CommandResult::failure(
                "publish",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                3,
            )
        }
    };

    match executor.block_on(publisher.publish(&text)) {
        Ok(receipt) => CommandResult::success(
            "publish",
            format!(
                "{UPLOAD_CONFIRMATION} object `{}` ({} bytes)",
                receipt.object_name, receipt.bytes_written
            ),
        ),
        Err(PublishError::Render(error)) => {
            CommandResult::failure("publish", "render", error.to_string(), 5)
        }
        Err(PublishError::Storage(error)) => {
            CommandResult::failure("publish", "storage", error.to_string(), 4)
        }
    }
}

fn read_proposal_text(file: Option<&Path>) -> Result<String, String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .map_err(|error| format!("failed to read `{}`: {error}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|error| format!("failed to read stdin: {error}"))?;
            Ok(text)
        }
    }
}
