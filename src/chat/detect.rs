use std::sync::LazyLock;

use regex::Regex;

use crate::chat::ChatSignals;
use crate::profile::RetailerPreference;

const BATTERY_BRANDS: &[&str] = &[
    "tesla", "powerwall", "power wall",
    "lg", "lg chem", "lgchem", "lg-chem",
    "sonnen", "sonen", "sonnon",
    "sungrow", "sun grow", "sungrouw",
    "enphase", "enphaze",
    "alpha", "alphaess", "alpha ess", "alpha-ess",
    "byd", "b.y.d",
    "redback", "red back",
    "growatt", "growat",
    "goodwe", "good we",
    "solax", "sola x",
    "fronius", "huawei", "pylontech", "pylon",
    "simpliphi", "eguana", "senec", "varta",
];

static POSTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]{4})\b").expect("hardcoded regex"));

static SOLAR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\d+(\.\d+)?\s*kw",
        r"(?i)\d+(\.\d+)?\s*kilowatt",
        r"(?i)no\s*solar",
        r"(?i)don['’]?t\s*have\s*(solar|panels)",
        r"(?i)no\s*panels",
        r"(?i)without\s*solar",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("hardcoded regex"))
    .collect()
});

static OPEN_TO_SWITCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)switch|open to|happy to|willing|don['’]?t (mind|care)|whatever")
        .expect("hardcoded regex")
});
static KEEP_RETAILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)keep|stay|current retailer|like my").expect("hardcoded regex")
});
static WANTS_ADVICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)advice|recommend|not sure|help me").expect("hardcoded regex")
});

pub fn detect_battery_brand(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    BATTERY_BRANDS
        .iter()
        .copied()
        .find(|brand| lower.contains(brand))
}

pub fn detect_battery(text: &str) -> bool {
    detect_battery_brand(text).is_some()
}

// Only the first four-digit number counts.
pub fn detect_postcode(text: &str) -> Option<String> {
    let captured = POSTCODE.captures(text)?.get(1)?.as_str();
    let value: u32 = captured.parse().ok()?;
    (200..=9999)
        .contains(&value)
        .then(|| captured.to_string())
}

pub fn detect_solar(text: &str) -> bool {
    SOLAR_PATTERNS.iter().any(|pattern| pattern.is_match(text))
}

pub fn detect_retailer_preference(text: &str) -> Option<RetailerPreference> {
    if OPEN_TO_SWITCH.is_match(text) {
        Some(RetailerPreference::Open)
    } else if KEEP_RETAILER.is_match(text) {
        Some(RetailerPreference::Keep)
    } else if WANTS_ADVICE.is_match(text) {
        Some(RetailerPreference::Advice)
    } else {
        None
    }
}

pub fn detect_signals(text: &str) -> ChatSignals {
    ChatSignals {
        battery_brand: detect_battery_brand(text).map(str::to_string),
        postcode: detect_postcode(text),
        solar_mentioned: detect_solar(text),
        retailer_preference: detect_retailer_preference(text),
    }
}
