use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::MatchingConfig;
use crate::matching::{rank_profile, FilterMode, MatchResult};
use crate::profile::{RetailerPreference, UserProfile};
use crate::programs::ProgramRegistry;

static PIPE_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"QUALIFIED:\s*battery=([^|]+)\|location=([^|]+)\|solar=([^|]+)\|preference=(\w+)",
    )
    .expect("hardcoded regex")
});
static JSON_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"QUALIFIED:\s*(\{[^}]+\})").expect("hardcoded regex"));
static SENTINEL_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\n?QUALIFIED:.*$").expect("hardcoded regex"));

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualifiedProfile {
    pub battery: String,
    pub location: String,
    pub solar: String,
    pub preference: String,
}

impl QualifiedProfile {
    pub fn into_profile(self) -> UserProfile {
        let preference = self
            .preference
            .parse::<RetailerPreference>()
            .unwrap_or(RetailerPreference::Advice);
        UserProfile {
            solar_kw: parse_solar(&self.solar),
            battery: self.battery,
            location: self.location,
            retailer_preference: preference,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonQualified {
    battery: String,
    location: Value,
    #[serde(default)]
    solar: Value,
    #[serde(default)]
    preference: Option<String>,
}

/// Accepts `QUALIFIED: battery=..|location=..|solar=..|preference=..` and
/// falls back to the older `QUALIFIED: {json}` form.
pub fn parse_qualified(text: &str) -> Option<QualifiedProfile> {
    if let Some(caps) = PIPE_FORMAT.captures(text) {
        return Some(QualifiedProfile {
            battery: caps[1].trim().to_string(),
            location: caps[2].trim().to_string(),
            solar: caps[3].trim().to_string(),
            preference: caps[4].trim().to_string(),
        });
    }

    let raw = JSON_FORMAT.captures(text)?.get(1)?.as_str();
    let parsed: JsonQualified = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(error) => {
            debug!("ignoring malformed QUALIFIED payload: {error}");
            return None;
        }
    };
    Some(QualifiedProfile {
        battery: parsed.battery.trim().to_string(),
        location: value_to_text(&parsed.location),
        solar: value_to_text(&parsed.solar),
        preference: parsed.preference.unwrap_or_default().trim().to_string(),
    })
}

pub fn strip_qualified(text: &str) -> String {
    SENTINEL_LINE.replace_all(text, "").trim().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplyAnalysis {
    pub message: String,
    pub qualified: Option<QualifiedProfile>,
}

impl ReplyAnalysis {
    pub fn profile(&self) -> Option<UserProfile> {
        self.qualified.clone().map(QualifiedProfile::into_profile)
    }
}

pub fn analyze_reply(text: &str) -> ReplyAnalysis {
    ReplyAnalysis {
        message: strip_qualified(text),
        qualified: parse_qualified(text),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedReply {
    pub message: String,
    pub qualified: Option<QualifiedProfile>,
    pub profile_error: Option<String>,
    pub results: Option<MatchResult>,
}

pub fn rank_reply(
    registry: &ProgramRegistry,
    text: &str,
    settings: &MatchingConfig,
) -> RankedReply {
    let analysis = analyze_reply(text);
    let mut ranked = RankedReply {
        message: analysis.message.clone(),
        qualified: analysis.qualified.clone(),
        profile_error: None,
        results: None,
    };
    if let Some(profile) = analysis.profile() {
        match profile.validate() {
            Ok(()) => {
                ranked.results = Some(rank_profile(
                    registry,
                    profile,
                    FilterMode::All,
                    None,
                    settings,
                ));
            }
            Err(error) => {
                debug!("qualified profile rejected: {error}");
                ranked.profile_error = Some(error.to_string());
            }
        }
    }
    ranked
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => "none".to_string(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn parse_solar(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().to_ascii_lowercase();
    if matches!(trimmed.as_str(), "" | "none" | "no") {
        return None;
    }
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed.strip_prefix('+').unwrap_or(&trimmed)),
    };
    let digits: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    format!("{sign}{digits}").parse::<f64>().ok()
}
