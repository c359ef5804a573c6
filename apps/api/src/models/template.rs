use serde::{Deserialize, Serialize};

/// A catalog entry. Templates are only ever selected, never created or edited here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preview_image: String,
}
