use serde::Serialize;

use crate::voice::components;
use crate::voice::keywords::{self, Action, Status};
use crate::voice::measurement::{self, Condition};

pub use crate::voice::measurement::Measurement;

/// The structured output of the voice parser: component, status,
/// optional measurement, recommended action, and overall confidence.
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct Finding {
    pub component: String,
    pub status: Status,
    pub measurement: Option<Measurement>,
    pub action: Action,
    pub confidence: f64,
}

/// Lowercases, collapses whitespace, and strips punctuation other than the
/// characters measurement extraction still needs (`.`, `/`, `%`, `"`).
fn canonicalize(utterance: &str) -> String {
    let lowered = utterance.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut last_was_space = false;
    for c in lowered.chars() {
        let keep = c.is_alphanumeric() || matches!(c, '.' | '/' | '%' | '"' | ' ');
        if !keep {
            continue;
        }
        if c == ' ' {
            if last_was_space {
                continue;
            }
            last_was_space = true;
        } else {
            last_was_space = false;
        }
        out.push(c);
    }
    out.trim().to_string()
}

fn condition_to_status_action(condition: Condition) -> (Status, Action) {
    match condition {
        Condition::Green => (Status::Good, Action::None),
        Condition::Yellow => (Status::Fair, Action::Monitor),
        Condition::Red => (Status::Critical, Action::Replace),
    }
}

/// Pure: `parse(s) == parse(s)` for all `s`, and `s` is never mutated
/// No I/O, no shared mutable state beyond the read-only
/// component/keyword tables.
pub fn parse(utterance: &str) -> Finding {
    let canonical = canonicalize(utterance);

    let (matched_component, component_confidence) = components::recognize(&canonical);
    let component = matched_component
        .map(|c| c.canonical.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let family = matched_component.and_then(|c| c.family);

    let extracted = measurement::extract(&canonical);
    let measurement_confidence = if extracted.is_some() { 0.9 } else { 1.0 };

    let measurement_classification = match (family, &extracted) {
        (Some(family), Some(m)) => measurement::classify(family, m),
        _ => None,
    };

    let keyword_result = keywords::infer(&canonical);

    let (status, action, status_confidence) = match (measurement_classification, keyword_result) {
        (Some(condition), Some((kw_status, kw_action, kw_confidence))) => {
            let (m_status, m_action) = condition_to_status_action(condition);
            if m_status == Status::Critical && kw_status != Status::Critical {
                (m_status, m_action, 0.9)
            } else {
                (kw_status, kw_action, kw_confidence)
            }
        }
        (Some(condition), None) => {
            let (m_status, m_action) = condition_to_status_action(condition);
            (m_status, m_action, 0.9)
        }
        (None, Some((kw_status, kw_action, kw_confidence))) => (kw_status, kw_action, kw_confidence),
        (None, None) => (Status::Fair, Action::Monitor, 0.0),
    };

    let confidence = (component_confidence * measurement_confidence * status_confidence).clamp(0.0, 1.0);

    Finding {
        component,
        status,
        measurement: extracted,
        action,
        confidence,
    }
}
