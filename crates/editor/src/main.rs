//! `hue-oozie-editor` -- command-line front end of the workflow editor.
//!
//! Opens a stored layout and workflow, checks that they agree, and runs one
//! editor action against a Hue server. Editor events are logged.
//!
//! # Environment variables
//!
//! | Variable          | Required | Default   | Description                              |
//! |-------------------|----------|-----------|------------------------------------------|
//! | `LAYOUT_PATH`     | yes      | --        | Layout JSON document                     |
//! | `WORKFLOW_PATH`   | yes      | --        | Workflow JSON document                   |
//! | `EDITOR_ACTION`   | no       | `gen-xml` | One of `save`, `gen-xml`, `submit`       |
//! | `HUE_URL`         | no       | `http://localhost:8888` | Hue base URL               |
//! | `EDITOR_PAGE_URL` | no       | new-workflow page | Page URL whose fragment tracks the workflow |
//!
//! See [`ClientConfig::from_env`](hue_oozie_client::ClientConfig::from_env)
//! for the session settings.

use std::sync::Arc;

use hue_oozie_client::HueClient;
use hue_oozie_core::Location;
use hue_oozie_editor::{EditorConfig, EditorDocuments, WorkflowEditor};
use hue_oozie_events::{EditorEvent, EventBus};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Action run when `EDITOR_ACTION` is not set.
const DEFAULT_ACTION: &str = "gen-xml";

/// The server round-trip selected by `EDITOR_ACTION`.
#[derive(Debug, Clone, Copy)]
enum EditorAction {
    Save,
    GenXml,
    Submit,
}

impl EditorAction {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "save" => Some(Self::Save),
            "gen-xml" => Some(Self::GenXml),
            "submit" => Some(Self::Submit),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hue_oozie_editor=info,hue_oozie_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let raw_action = std::env::var("EDITOR_ACTION").unwrap_or_else(|_| DEFAULT_ACTION.into());
    let Some(action) = EditorAction::parse(&raw_action) else {
        tracing::error!(action = %raw_action, "EDITOR_ACTION must be one of save, gen-xml, submit");
        std::process::exit(1);
    };

    let layout = read_document("LAYOUT_PATH");
    let workflow = read_document("WORKFLOW_PATH");

    let config = EditorConfig::from_env();
    tracing::info!(hue_url = %config.client.base_url, ?action, "Starting hue-oozie-editor");

    let client = HueClient::new(&config.client).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });
    let location = Location::parse(&config.page_url).unwrap_or_else(|e| {
        tracing::error!(error = %e, page_url = %config.page_url, "EDITOR_PAGE_URL is not a valid URL");
        std::process::exit(1);
    });

    tracing::debug!(workflow = ?location.workflow_reference(), "Editor page location parsed");

    let bus = Arc::new(EventBus::default());
    let mut events = bus.subscribe();
    let logger = tokio::spawn(async move {
        while let Ok(envelope) = events.recv().await {
            match envelope.event {
                EditorEvent::Error(message) => tracing::error!(%message, "Editor error"),
                EditorEvent::WorkflowXml(xml) => println!("{xml}"),
                EditorEvent::ShowSubmitPopup(body) => println!("{body}"),
                other => tracing::info!(event = other.name(), ?other, "Editor event"),
            }
        }
    });

    let mut editor = WorkflowEditor::new(
        EditorDocuments { layout, workflow },
        client,
        bus.clone(),
        location,
    )
    .with_palette(config.palette);

    let outcome = match editor.init() {
        Err(e) => Err(e),
        Ok(()) => match action {
            EditorAction::Save => editor.save().await.map(|id| {
                tracing::info!(workflow_id = %id, page = %editor.location().url(), "Saved");
            }),
            EditorAction::GenXml => editor.gen_xml().await.map(|_| ()),
            EditorAction::Submit => editor.show_submit_popup().await.map(|_| ()),
        },
    };

    // Close the channel so the logger drains and stops.
    drop(editor);
    drop(bus);
    let _ = logger.await;

    if outcome.is_err() {
        std::process::exit(1);
    }
}

/// Read and parse the JSON document named by environment variable `var`.
fn read_document(var: &str) -> serde_json::Value {
    let path = std::env::var(var).unwrap_or_else(|_| {
        tracing::error!("{var} environment variable is required");
        std::process::exit(1);
    });

    let raw = std::fs::read_to_string(&path).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = %path, "Failed to read {var}");
        std::process::exit(1);
    });

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = %path, "{var} is not valid JSON");
        std::process::exit(1);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_parse() {
        assert!(matches!(EditorAction::parse("save"), Some(EditorAction::Save)));
        assert!(matches!(EditorAction::parse(DEFAULT_ACTION), Some(EditorAction::GenXml)));
        assert!(matches!(EditorAction::parse("submit"), Some(EditorAction::Submit)));
    }

    #[test]
    fn unknown_action_is_refused() {
        assert!(EditorAction::parse("deploy").is_none());
        assert!(EditorAction::parse("").is_none());
        assert!(EditorAction::parse("SAVE").is_none());
    }
}
