use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::region::{postcode_to_region, validate_postcode, Region};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub battery: String,
    pub location: String,
    #[serde(default)]
    pub solar_kw: Option<f64>,
    pub retailer_preference: RetailerPreference,
}

impl UserProfile {
    pub fn new(
        battery: impl Into<String>,
        location: impl Into<String>,
        solar_kw: Option<f64>,
        retailer_preference: RetailerPreference,
    ) -> Self {
        Self {
            battery: battery.into(),
            location: location.into(),
            solar_kw,
            retailer_preference,
        }
    }

    pub fn region(&self) -> Region {
        postcode_to_region(&self.location)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.battery.trim().is_empty() {
            return Err(MatchError::EmptyBattery);
        }
        validate_postcode(&self.location)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RetailerPreference {
    Keep,
    #[default]
    Open,
    Advice,
}

impl RetailerPreference {
    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Open => "open",
            Self::Advice => "advice",
        }
    }
}

impl Display for RetailerPreference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

impl FromStr for RetailerPreference {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "open" => Ok(Self::Open),
            "advice" => Ok(Self::Advice),
            _ => Err(MatchError::UnknownPreference(s.to_string())),
        }
    }
}

static NAME_REWRITES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"powerwall\s*2", "powerwall 2"),
        (r"powerwall\s*3", "powerwall 3"),
        (r"pw2", "powerwall 2"),
        (r"pw3", "powerwall 3"),
        (r"alpha\s*ess", "alphaess"),
        (r"lg\s*chem", "lg chem"),
        (r"sun\s*grow", "sungrow"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("hardcoded regex"), replacement))
    .collect()
});

/// Only the first occurrence of each pattern is rewritten.
pub fn normalize_battery_name(battery: &str) -> String {
    let mut name = battery.to_lowercase();
    for (pattern, replacement) in NAME_REWRITES.iter() {
        name = pattern.replace(&name, *replacement).into_owned();
    }
    name.trim().to_string()
}

pub fn is_battery_compatible(user_battery: &str, program_batteries: &[String]) -> bool {
    let user = normalize_battery_name(user_battery);
    program_batteries.iter().any(|candidate| {
        let program = normalize_battery_name(candidate);
        user.contains(&program)
            || program.contains(&user)
            || (user.contains("tesla") && program.contains("tesla"))
            || (user.contains("powerwall") && program.contains("powerwall"))
    })
}

pub fn is_same_brand_family(user_battery: &str, program_batteries: &[String]) -> bool {
    let lowered = user_battery.to_lowercase();
    let brand = lowered.split(' ').next().unwrap_or_default();
    program_batteries
        .iter()
        .any(|candidate| candidate.to_lowercase().contains(brand))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalizes_common_spellings() {
        assert_eq!(normalize_battery_name("Tesla PW2"), "tesla powerwall 2");
        assert_eq!(normalize_battery_name("Powerwall3"), "powerwall 3");
        assert_eq!(normalize_battery_name("Alpha ESS Smile"), "alphaess smile");
        assert_eq!(normalize_battery_name("  LGChem RESU "), "lg chem resu");
        assert_eq!(normalize_battery_name("Sun Grow"), "sungrow");
    }

    #[test]
    fn compatibility_uses_containment_both_ways() {
        let supported = list(&["Sungrow SBR", "AlphaESS"]);
        assert!(is_battery_compatible("Sungrow SBR096", &supported));
        assert!(is_battery_compatible("sungrow", &supported));
        assert!(is_battery_compatible("alpha ess", &supported));
        assert!(!is_battery_compatible("BYD", &supported));
    }

    #[test]
    fn tesla_variants_are_interchangeable() {
        let supported = list(&["Tesla Powerwall 2"]);
        assert!(is_battery_compatible("Tesla", &supported));
        assert!(is_battery_compatible("powerwall 3", &supported));
        assert!(!is_battery_compatible("Sonnen", &supported));
    }

    #[test]
    fn brand_family_uses_first_word() {
        let supported = list(&["LG Chem RESU HV"]);
        assert!(is_same_brand_family("LG Prime", &supported));
        assert!(!is_same_brand_family("Enphase IQ", &supported));
    }

    #[test]
    fn validate_requires_battery_and_postcode() {
        let ok = UserProfile::new("Tesla", "2000", None, RetailerPreference::Open);
        assert!(ok.validate().is_ok());

        let no_battery = UserProfile::new(" ", "2000", None, RetailerPreference::Open);
        assert_eq!(no_battery.validate(), Err(MatchError::EmptyBattery));

        let bad_postcode = UserProfile::new("Tesla", "0100", None, RetailerPreference::Open);
        assert!(matches!(
            bad_postcode.validate(),
            Err(MatchError::InvalidPostcode(_))
        ));
    }

    #[test]
    fn parses_retailer_preference() {
        assert_eq!(
            "KEEP".parse::<RetailerPreference>().unwrap(),
            RetailerPreference::Keep
        );
        assert!("maybe".parse::<RetailerPreference>().is_err());
    }
}
