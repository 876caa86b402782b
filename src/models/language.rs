//! Platform language settings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSetting {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub rtl: bool,
}

impl LanguageSetting {
    pub fn new(code: &str, name: &str, enabled: bool, is_default: bool) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            enabled,
            is_default,
            rtl: matches!(code, "ar" | "he" | "fa" | "ur"),
        }
    }
}

/// Body of `PATCH /api/platform/languages/{code}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLanguageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}
