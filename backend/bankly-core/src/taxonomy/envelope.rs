//! Upstream error body shapes.

use serde::{Deserialize, Deserializer};

/// Generic error body.
///
/// Covers both upstream shapes:
/// - `{"errors": [{"code": "...", "messages": ["..."]}], "reference": "..."}`
/// - `{"code": "...", "message": "..."}` (payments, boletos)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<ErrorEntry>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEntry {
    /// `messages` plus the singular `message`, if both are present.
    pub fn all_messages(&self) -> Vec<String> {
        let mut all = self.messages.clone();
        if let Some(message) = &self.message {
            if !all.contains(message) {
                all.push(message.clone());
            }
        }
        all
    }
}

impl ErrorEnvelope {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// The entry to classify: the first listed error, or the single
    /// top-level `{code, message}` when the list is absent.
    pub fn primary(&self) -> Option<ErrorEntry> {
        if let Some(first) = self.errors.iter().find(|e| !e.code.trim().is_empty()) {
            return Some(first.clone());
        }

        let code = self.code.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
        Some(ErrorEntry {
            code: code.to_string(),
            messages: self.message.iter().cloned().collect(),
            message: None,
        })
    }
}

/// Transfer error body: `{"errors": [{"key", "value"}], "code", "message"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransferErrorEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<KeyValue>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KeyValue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl TransferErrorEnvelope {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    pub fn with_code(code: impl Into<String>, message: Option<String>) -> Self {
        Self {
            errors: Vec::new(),
            code: Some(code.into()),
            message,
        }
    }

    /// Error pairs to classify. Pairs with a blank key are skipped.
    ///
    /// When no keyed pair is listed but a top-level code exists, a single pair
    /// `{key: code, value: message}` is synthesized from it.
    pub fn entries(&self) -> Vec<KeyValue> {
        let keyed: Vec<KeyValue> = self
            .errors
            .iter()
            .filter(|pair| !pair.key.trim().is_empty())
            .cloned()
            .collect();
        if !keyed.is_empty() {
            return keyed;
        }

        match self.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => vec![KeyValue {
                key: code.to_string(),
                value: self.message.clone(),
            }],
            _ => Vec::new(),
        }
    }
}

/// Explicit JSON `null` reads as the field's default, like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
