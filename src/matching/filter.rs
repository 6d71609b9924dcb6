use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::MatchingConfig;
use crate::error::MatchError;
use crate::matching::{match_programs, MatchResult, MatchSummary, ProgramMatch};
use crate::profile::UserProfile;
use crate::programs::{PaymentModel, ProgramRegistry};
use crate::region::Region;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    Top,
    Available,
    All,
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Top => "top",
            Self::Available => "available",
            Self::All => "all",
        };
        write!(f, "{label}")
    }
}

impl FromStr for FilterMode {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "available" => Ok(Self::Available),
            "all" => Ok(Self::All),
            _ => Err(MatchError::UnknownFilter(s.to_string())),
        }
    }
}

pub fn filter_matches(
    matches: Vec<ProgramMatch>,
    mode: FilterMode,
    top_count: usize,
    available_threshold: u8,
) -> Vec<ProgramMatch> {
    match mode {
        FilterMode::Top => matches.into_iter().take(top_count).collect(),
        FilterMode::Available => matches
            .into_iter()
            .filter(|m| m.percentage >= available_threshold)
            .collect(),
        FilterMode::All => matches,
    }
}

pub fn summarize(region: Region, matches: &[ProgramMatch], available_threshold: u8) -> MatchSummary {
    MatchSummary {
        region,
        total: matches.len(),
        available_count: matches
            .iter()
            .filter(|m| m.percentage >= available_threshold)
            .count(),
        top_program: matches.first().map(|m| m.program.id.clone()),
    }
}

/// Ranks, narrows to a payment model, summarizes, then applies `filter`.
pub fn rank_profile(
    registry: &ProgramRegistry,
    profile: UserProfile,
    filter: FilterMode,
    payment_model: Option<PaymentModel>,
    settings: &MatchingConfig,
) -> MatchResult {
    let mut ranked = match_programs(registry, &profile);
    if let Some(model) = payment_model {
        ranked.retain(|m| m.program.payment_model == model);
    }
    let summary = summarize(profile.region(), &ranked, settings.available_threshold);
    let matches = filter_matches(ranked, filter, settings.top_count, settings.available_threshold);
    MatchResult {
        profile,
        summary,
        matches,
    }
}
