use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Questionnaire fields in prompt order, as they appear on the wire.
pub const PROFILE_FIELDS: [&str; 7] = [
    "age",
    "personality",
    "hobbies",
    "music",
    "emotionalNeeds",
    "moods",
    "learningStyle",
];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalProfileRequest {
    pub age: String,
    pub personality: String,
    pub hobbies: String,
    pub music: String,
    pub emotional_needs: String,
    pub moods: String,
    pub learning_style: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EmotionalProfileResponse {
    pub profile: String,
}

impl EmotionalProfileRequest {
    /// Checks an untyped JSON payload and reports every missing or non-text field.
    pub fn from_value(payload: &Value) -> Result<Self> {
        let Some(obj) = payload.as_object() else {
            return Err(AppError::Validation(vec!["body: expected a JSON object".into()]));
        };

        let mut issues = Vec::new();
        let mut field = |name: &str| match obj.get(name) {
            None => {
                issues.push(format!("{name}: field required"));
                String::new()
            }
            Some(value) => as_text(value).unwrap_or_else(|| {
                issues.push(format!("{name}: expected text"));
                String::new()
            }),
        };

        let request = Self {
            age: field("age"),
            personality: field("personality"),
            hobbies: field("hobbies"),
            music: field("music"),
            emotional_needs: field("emotionalNeeds"),
            moods: field("moods"),
            learning_style: field("learningStyle"),
        };

        if issues.is_empty() {
            Ok(request)
        } else {
            Err(AppError::Validation(issues))
        }
    }
}

// Anything coercible to text is accepted, so scalars are stringified.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
