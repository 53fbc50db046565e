use hue_oozie_client::ClientConfig;

use crate::palette::{default_palette, PaletteEntry};

/// Path of the editor page for a new workflow, relative to the Hue base URL.
pub const EDITOR_PAGE_PATH: &str = "/oozie/editor/workflow/new/";

/// Editor configuration.
///
/// Replaces what the web console kept in page-global constants: the palette
/// and the page location are passed in explicitly.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub client: ClientConfig,
    /// URL of the editor page; its fragment records the saved workflow.
    pub page_url: String,
    pub palette: Vec<PaletteEntry>,
}

impl EditorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// Reads everything [`ClientConfig::from_env`] reads, plus
    /// `EDITOR_PAGE_URL` (default: the new-workflow page of `HUE_URL`).
    pub fn from_env() -> Self {
        let client = ClientConfig::from_env();
        let page_url = std::env::var("EDITOR_PAGE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default_page_url(&client));

        Self {
            client,
            page_url,
            palette: default_palette(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            page_url: default_page_url(&client),
            client,
            palette: default_palette(),
        }
    }
}

fn default_page_url(client: &ClientConfig) -> String {
    format!(
        "{}{EDITOR_PAGE_PATH}",
        client.base_url.trim_end_matches('/')
    )
}
