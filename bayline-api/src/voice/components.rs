/// A measurement family that gates a component's condition thresholds
/// `None` means this
/// component has no measurement-based override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementFamily {
    BrakePadThicknessMm,
    TireTread32nds,
    BatteryVoltage,
}

/// One entry in the curated, ordered component table: the phrase
/// to search the canonicalized utterance for, the canonical component
/// name reported in a `Finding`, the measurement family it belongs to (if
/// any), and the recognizer's confidence for this phrase.
pub struct ComponentEntry {
    pub phrase: &'static str,
    pub canonical: &'static str,
    pub family: Option<MeasurementFamily>,
    pub confidence: f64,
}

macro_rules! component {
    ($phrase:expr, $canonical:expr, $family:expr, $confidence:expr) => {
        ComponentEntry {
            phrase: $phrase,
            canonical: $canonical,
            family: $family,
            confidence: $confidence,
        }
    };
}

/// Longer, more specific phrases are listed before their substrings so
/// "front brake pads" wins over "front brakes" wins over "brakes" when
/// more than one would match the same utterance.
pub const COMPONENTS: &[ComponentEntry] = &[
    component!("front brake pads", "front brake pads", Some(MeasurementFamily::BrakePadThicknessMm), 0.95),
    component!("rear brake pads", "rear brake pads", Some(MeasurementFamily::BrakePadThicknessMm), 0.95),
    component!("front brakes", "front brake pads", Some(MeasurementFamily::BrakePadThicknessMm), 0.9),
    component!("rear brakes", "rear brake pads", Some(MeasurementFamily::BrakePadThicknessMm), 0.9),
    component!("brake pads", "brake pads", Some(MeasurementFamily::BrakePadThicknessMm), 0.85),
    component!("brake fluid", "brake fluid", None, 0.85),
    component!("brake rotors", "brake rotors", None, 0.85),
    component!("brakes", "brake pads", Some(MeasurementFamily::BrakePadThicknessMm), 0.75),
    component!("front tire tread", "front tire tread", Some(MeasurementFamily::TireTread32nds), 0.95),
    component!("rear tire tread", "rear tire tread", Some(MeasurementFamily::TireTread32nds), 0.95),
    component!("tire tread", "tire tread", Some(MeasurementFamily::TireTread32nds), 0.85),
    component!("tire pressure", "tire pressure", None, 0.85),
    component!("tires", "tire tread", Some(MeasurementFamily::TireTread32nds), 0.7),
    component!("oil level", "oil level", None, 0.9),
    component!("oil filter", "oil filter", None, 0.9),
    component!("engine oil", "oil level", None, 0.85),
    component!("battery voltage", "battery", Some(MeasurementFamily::BatteryVoltage), 0.9),
    component!("battery", "battery", Some(MeasurementFamily::BatteryVoltage), 0.8),
    component!("left headlight", "left headlight", None, 0.9),
    component!("right headlight", "right headlight", None, 0.9),
    component!("headlights", "headlights", None, 0.75),
    component!("taillights", "taillights", None, 0.75),
    component!("windshield wipers", "windshield wipers", None, 0.85),
    component!("wiper blades", "windshield wipers", None, 0.85),
    component!("coolant level", "coolant level", None, 0.85),
    component!("coolant", "coolant level", None, 0.75),
    component!("transmission fluid", "transmission fluid", None, 0.85),
    component!("air filter", "air filter", None, 0.85),
    component!("cabin air filter", "cabin air filter", None, 0.9),
    component!("serpentine belt", "serpentine belt", None, 0.85),
    component!("exhaust system", "exhaust system", None, 0.8),
    component!("suspension", "suspension", None, 0.75),
    component!("alignment", "alignment", None, 0.75),
];

/// Finds the longest matching component phrase in a canonicalized
/// utterance. Returns the matched entry, or `None` with full confidence
/// (the recognizer found nothing, but its output is nullable).
pub fn recognize(utterance: &str) -> (Option<&'static ComponentEntry>, f64) {
    let mut best: Option<&'static ComponentEntry> = None;
    for entry in COMPONENTS {
        if utterance.contains(entry.phrase) {
            let better = match best {
                Some(current) => entry.phrase.len() > current.phrase.len(),
                None => true,
            };
            if better {
                best = Some(entry);
            }
        }
    }
    match best {
        Some(entry) => (Some(entry), entry.confidence),
        None => (None, 1.0),
    }
}
