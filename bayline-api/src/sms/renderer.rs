use std::collections::HashMap;

use serde::Serialize;

use crate::error::AppError;
use crate::sms::templates;

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct RenderedMessage {
    pub message: String,
    pub length: usize,
    pub valid: bool,
    pub template_name: String,
}

const SINGLE_SEGMENT_LIMIT: usize = 160;

/// Substitutes `{name}` placeholders in the named template with the given
/// variables. Fails `Invalid` naming the first missing placeholder;
/// never reads the template body itself from user input.
pub fn render(template: &str, variables: &HashMap<String, String>) -> Result<RenderedMessage, AppError> {
    let body = templates::body(template)
        .ok_or_else(|| AppError::Invalid(format!("unknown template: {template}")))?;

    let mut message = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(start) = rest.find('{') {
        let Some(end) = rest[start..].find('}').map(|i| start + i) else {
            message.push_str(rest);
            rest = "";
            break;
        };
        message.push_str(&rest[..start]);
        let name = &rest[start + 1..end];
        let value = variables
            .get(name)
            .ok_or_else(|| AppError::Invalid(format!("missing variable: {name}")))?;
        message.push_str(value);
        rest = &rest[end + 1..];
    }
    message.push_str(rest);

    let length = message.chars().count();
    Ok(RenderedMessage {
        message,
        length,
        valid: length <= SINGLE_SEGMENT_LIMIT,
        template_name: template.to_string(),
    })
}
