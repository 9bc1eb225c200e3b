//! Messages exchanged between the capture surface and the background worker,
//! and the context menu they are triggered from.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::NoteCategory;
use crate::sync::{SyncError, SyncService};

/// Id of the context menu parent entry
pub const CONTEXT_MENU_PARENT_ID: &str = "quick-record-parent";

/// A request the background worker understands.
///
/// The set is closed; unknown actions fail to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ExtensionMessage {
    /// Save the page selection as a note; no category means the default one
    SaveSelectedText {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<NoteCategory>,
        #[serde(default)]
        source_url: String,
        #[serde(default)]
        source_title: String,
    },
    /// Save clipboard text under "other"
    SaveClipboardText {
        text: String,
        #[serde(default)]
        source_url: String,
        #[serde(default)]
        source_title: String,
    },
    SetupContextMenu,
    ExpandPrompt {
        key: String,
    },
    SyncNow,
    GetSyncState,
}

/// Reply to an [`ExtensionMessage`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl MessageResponse {
    pub const fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    pub fn with_data(data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                success: true,
                error: None,
                data: Some(data),
            },
            Err(error) => Self::failure(error),
        }
    }

    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            data: None,
        }
    }
}

/// One context menu item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub title: String,
}

/// Context menu id that files a selection under `category`
pub const fn menu_id_for(category: NoteCategory) -> &'static str {
    match category {
        NoteCategory::Inspiration => "save-to-inspiration",
        NoteCategory::Todo => "save-to-todo",
        NoteCategory::Principle => "save-to-principle",
        NoteCategory::Other => "save-to-other",
    }
}

/// Category targeted by a context menu id
pub fn category_for_menu_id(id: &str) -> Option<NoteCategory> {
    NoteCategory::ALL
        .into_iter()
        .find(|category| menu_id_for(*category) == id)
}

/// The parent entry followed by one entry per category
pub fn context_menu_entries() -> Vec<ContextMenuEntry> {
    let parent = ContextMenuEntry {
        id: CONTEXT_MENU_PARENT_ID.to_string(),
        parent_id: None,
        title: "Quick record to...".to_string(),
    };
    std::iter::once(parent)
        .chain(NoteCategory::ALL.into_iter().map(|category| ContextMenuEntry {
            id: menu_id_for(category).to_string(),
            parent_id: Some(CONTEXT_MENU_PARENT_ID.to_string()),
            title: category.label().to_string(),
        }))
        .collect()
}

/// Dispatches [`ExtensionMessage`]s to the store and the sync service
#[derive(Clone)]
pub struct MessageRouter {
    sync: SyncService,
}

impl MessageRouter {
    pub const fn new(sync: SyncService) -> Self {
        Self { sync }
    }

    /// Parse and handle a raw JSON message
    pub async fn handle_json(&self, raw: &str) -> MessageResponse {
        match serde_json::from_str::<ExtensionMessage>(raw) {
            Ok(message) => self.handle(message).await,
            Err(error) => {
                tracing::debug!("Rejected message: {error}");
                MessageResponse::failure(format!("Unsupported message: {error}"))
            }
        }
    }

    /// Handle one message; failures are reported in the response
    pub async fn handle(&self, message: ExtensionMessage) -> MessageResponse {
        let store = self.sync.store();
        match message {
            ExtensionMessage::SaveSelectedText {
                text,
                category,
                source_url,
                source_title,
            } => {
                if text.trim().is_empty() {
                    return MessageResponse::failure("No text selected");
                }
                let category = match category {
                    Some(category) => category,
                    None => match store.get_settings().await {
                        Ok(settings) => settings.default_category,
                        Err(error) => return MessageResponse::failure(error),
                    },
                };
                match store
                    .create_note(&text, category, &source_url, &source_title)
                    .await
                {
                    Ok(note) => MessageResponse::with_data(note),
                    Err(error) => MessageResponse::failure(error),
                }
            }
            ExtensionMessage::SaveClipboardText {
                text,
                source_url,
                source_title,
            } => {
                if text.trim().is_empty() {
                    return MessageResponse::failure("Clipboard is empty");
                }
                match store
                    .create_note(&text, NoteCategory::Other, &source_url, &source_title)
                    .await
                {
                    Ok(note) => MessageResponse::with_data(note),
                    Err(error) => MessageResponse::failure(error),
                }
            }
            ExtensionMessage::SetupContextMenu => {
                MessageResponse::with_data(context_menu_entries())
            }
            ExtensionMessage::ExpandPrompt { key } => match store.expand_prompt(&key).await {
                Ok(content) => MessageResponse::with_data(serde_json::json!({ "content": content })),
                Err(error) => MessageResponse::failure(error),
            },
            ExtensionMessage::SyncNow => match self.sync.sync().await {
                Ok(outcome) if outcome.success => MessageResponse::with_data(outcome),
                Ok(outcome) => MessageResponse::failure(
                    outcome.error.unwrap_or_else(|| "Sync failed".to_string()),
                ),
                Err(error @ SyncError::NotConfigured) => MessageResponse::failure(error),
                Err(error) => {
                    tracing::warn!("Sync request failed: {error}");
                    MessageResponse::failure(error)
                }
            },
            ExtensionMessage::GetSyncState => match self.sync.get_state().await {
                Ok(state) => MessageResponse::with_data(state),
                Err(error) => MessageResponse::failure(error),
            },
        }
    }
}
