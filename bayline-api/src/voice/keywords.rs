#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Good,
    Fair,
    NeedsAttention,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    None,
    Monitor,
    Replace,
    Check,
    Service,
}

/// Phrase → (status, action, confidence), ordered most-specific first
/// First match in the canonicalized utterance wins.
const KEYWORDS: &[(&str, Status, Action, f64)] = &[
    ("needs replacement", Status::Critical, Action::Replace, 0.95),
    ("needs to be replaced", Status::Critical, Action::Replace, 0.95),
    ("replace immediately", Status::Critical, Action::Replace, 0.95),
    ("critical condition", Status::Critical, Action::Replace, 0.9),
    ("dangerously low", Status::Critical, Action::Replace, 0.9),
    ("worn out", Status::NeedsAttention, Action::Replace, 0.85),
    ("worn", Status::NeedsAttention, Action::Monitor, 0.75),
    ("needs attention", Status::NeedsAttention, Action::Check, 0.85),
    ("needs service", Status::NeedsAttention, Action::Service, 0.85),
    ("should be serviced", Status::NeedsAttention, Action::Service, 0.8),
    ("keep an eye on", Status::Fair, Action::Monitor, 0.8),
    ("monitor", Status::Fair, Action::Monitor, 0.75),
    ("a bit low", Status::Fair, Action::Monitor, 0.75),
    ("looks fine", Status::Good, Action::None, 0.85),
    ("looks good", Status::Good, Action::None, 0.9),
    ("all good", Status::Good, Action::None, 0.9),
    ("good condition", Status::Good, Action::None, 0.85),
    ("in good shape", Status::Good, Action::None, 0.85),
];

/// Infers status/action from keyword phrases. `None` is a valid, fully
/// confident outcome when the utterance carries no recognizable keyword
/// (the caller falls back to a measurement-only or neutral finding).
pub fn infer(utterance: &str) -> Option<(Status, Action, f64)> {
    KEYWORDS
        .iter()
        .find(|(phrase, ..)| utterance.contains(phrase))
        .map(|(_, status, action, confidence)| (*status, *action, *confidence))
}
