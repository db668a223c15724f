use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-user editor display preferences
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Editor {
    pub id: String,
    pub user_id: String,
    pub show_toolbar: bool,
    pub show_prompt: bool,
    pub show_counter: bool,
    pub created_at: String,
    pub updated_at: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreateEditorRequest {
    pub user_id: String,
    #[serde(default = "default_true")]
    pub show_toolbar: bool,
    #[serde(default = "default_true")]
    pub show_prompt: bool,
    #[serde(default = "default_true")]
    pub show_counter: bool,
}
