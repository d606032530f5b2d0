use serde_json::Value;

use crate::{
    clients::Completer,
    error::Result,
    models::{profile::EmotionalProfileRequest, prompt::build_prompt},
};

/// Validate, build the prompt, ask the model. Validation failures return
/// before the completer is touched.
pub async fn generate_profile(completer: &dyn Completer, payload: &Value) -> Result<String> {
    let request = EmotionalProfileRequest::from_value(payload)?;
    let prompt = build_prompt(&request);
    completer.complete(&prompt).await
}
