use regex::Regex;
use std::sync::OnceLock;

use crate::voice::components::MeasurementFamily;

/// A normalized measurement: a value plus the canonical unit family it was
/// extracted into. `unit` is the label surfaced in a `Finding`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, schemars::JsonSchema)]
pub struct Measurement {
    pub value: f64,
    pub unit: &'static str,
}

struct Pattern {
    source: &'static str,
    unit: &'static str,
    cell: OnceLock<Regex>,
}

impl Pattern {
    fn regex(&self) -> &Regex {
        self.cell.get_or_init(|| Regex::new(self.source).unwrap())
    }
}

static BARE_FRACTION: Pattern = Pattern {
    source: r"\b(\d+)/32\b",
    unit: "32nds",
    cell: OnceLock::new(),
};
static THIRTY_SECONDS_UNIT: Pattern = Pattern {
    source: r"(\d+(?:\.\d+)?)\s*(?:/32|32nds)\b",
    unit: "32nds",
    cell: OnceLock::new(),
};
static MM: Pattern = Pattern {
    source: r"(\d+(?:\.\d+)?)\s*(?:mm|millimeters?)\b",
    unit: "mm",
    cell: OnceLock::new(),
};
static INCHES: Pattern = Pattern {
    source: r#"(\d+(?:\.\d+)?)\s*(?:inch(?:es)?|")"#,
    unit: "inch",
    cell: OnceLock::new(),
};
static PSI: Pattern = Pattern {
    source: r"(\d+(?:\.\d+)?)\s*psi\b",
    unit: "psi",
    cell: OnceLock::new(),
};
static PERCENT: Pattern = Pattern {
    source: r"(\d+(?:\.\d+)?)\s*(?:%|percent)\b",
    unit: "%",
    cell: OnceLock::new(),
};
static VOLTS: Pattern = Pattern {
    source: r"(\d+(?:\.\d+)?)\s*(?:volts?|v)\b",
    unit: "V",
    cell: OnceLock::new(),
};

/// Applies each unit pattern in turn and returns the first match,
/// normalized into its canonical unit family. `None` is a valid,
/// fully-confident outcome: not every utterance carries a measurement.
pub fn extract(utterance: &str) -> Option<Measurement> {
    for pattern in [
        &BARE_FRACTION,
        &THIRTY_SECONDS_UNIT,
        &MM,
        &INCHES,
        &PSI,
        &PERCENT,
        &VOLTS,
    ] {
        if let Some(caps) = pattern.regex().captures(utterance) {
            let value: f64 = caps.get(1)?.as_str().parse().ok()?;
            return Some(Measurement {
                value,
                unit: pattern.unit,
            });
        }
    }
    None
}

/// Threshold bands per measurement family.
/// Returns `None` when the family has no measurement-driven override, or
/// when the measurement's unit doesn't match what the family expects.
pub fn classify(family: MeasurementFamily, measurement: &Measurement) -> Option<Condition> {
    match (family, measurement.unit) {
        (MeasurementFamily::BrakePadThicknessMm, "mm") => Some(band(measurement.value, 6.0, 3.0)),
        (MeasurementFamily::TireTread32nds, "32nds") => Some(band(measurement.value, 6.0, 4.0)),
        (MeasurementFamily::BatteryVoltage, "V") => Some(band(measurement.value, 12.4, 12.0)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Green,
    Yellow,
    Red,
}

fn band(value: f64, green_at_or_above: f64, yellow_at_or_above: f64) -> Condition {
    if value >= green_at_or_above {
        Condition::Green
    } else if value >= yellow_at_or_above {
        Condition::Yellow
    } else {
        Condition::Red
    }
}
