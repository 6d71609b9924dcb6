use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MatchError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Nsw,
    Vic,
    Qld,
    Sa,
    Tas,
    Act,
    Wa,
    Nt,
}

impl Region {
    pub const ALL: [Region; 8] = [
        Region::Nsw,
        Region::Vic,
        Region::Qld,
        Region::Sa,
        Region::Tas,
        Region::Act,
        Region::Wa,
        Region::Nt,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Nsw => "NSW",
            Self::Vic => "VIC",
            Self::Qld => "QLD",
            Self::Sa => "SA",
            Self::Tas => "TAS",
            Self::Act => "ACT",
            Self::Wa => "WA",
            Self::Nt => "NT",
        }
    }

    pub fn earnings_multiplier(&self) -> f64 {
        match self {
            Self::Sa => 1.20,
            Self::Nsw => 1.10,
            Self::Act => 1.08,
            Self::Qld => 1.05,
            Self::Vic => 1.00,
            Self::Tas => 0.85,
            Self::Wa => 0.80,
            Self::Nt => 0.70,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Region {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Region::ALL
            .into_iter()
            .find(|region| region.code() == normalized)
            .ok_or_else(|| MatchError::UnknownRegion(s.to_string()))
    }
}

const POSTCODE_RANGES: &[(u32, u32, Region)] = &[
    // ACT carves its ranges out of the NSW block, so it is checked first.
    (2600, 2618, Region::Act),
    (2900, 2920, Region::Act),
    (2000, 2599, Region::Nsw),
    (2619, 2899, Region::Nsw),
    (2921, 2999, Region::Nsw),
    (3000, 3999, Region::Vic),
    (8000, 8999, Region::Vic),
    (4000, 4999, Region::Qld),
    (9000, 9999, Region::Qld),
    (5000, 5999, Region::Sa),
    (6000, 6999, Region::Wa),
    (7000, 7999, Region::Tas),
    (800, 899, Region::Nt),
];

pub fn postcode_to_region(postcode: &str) -> Region {
    let Some(code) = leading_number(postcode) else {
        return Region::Nsw;
    };
    POSTCODE_RANGES
        .iter()
        .find(|(low, high, _)| (*low..=*high).contains(&code))
        .map(|(_, _, region)| *region)
        .unwrap_or(Region::Nsw)
}

/// Accepts exactly four ASCII digits whose value lies in 200..=9999.
pub fn validate_postcode(input: &str) -> Result<String, MatchError> {
    let trimmed = input.trim();
    let well_formed = trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(MatchError::InvalidPostcode(input.to_string()));
    }
    match trimmed.parse::<u32>() {
        Ok(code) if (200..=9999).contains(&code) => Ok(trimmed.to_string()),
        _ => Err(MatchError::InvalidPostcode(input.to_string())),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostcodeLookup {
    pub postcode: String,
    pub valid: bool,
    pub region: Region,
    pub earnings_multiplier: f64,
}

pub fn lookup_postcode(postcode: &str) -> PostcodeLookup {
    let region = postcode_to_region(postcode);
    PostcodeLookup {
        postcode: postcode.to_string(),
        valid: validate_postcode(postcode).is_ok(),
        region,
        earnings_multiplier: region.earnings_multiplier(),
    }
}

fn leading_number(input: &str) -> Option<u32> {
    let digits: String = input
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
