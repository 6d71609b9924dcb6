pub mod earnings;
pub mod filter;
pub mod scorer;

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;
use crate::programs::VppProgram;
use crate::region::Region;

pub use earnings::{estimate_earnings, solar_multiplier};
pub use filter::{filter_matches, rank_profile, summarize, FilterMode};
pub use scorer::{match_programs, matches_by_payment_model, score_program, top_matches};

pub const DEFAULT_TOP_COUNT: usize = 4;
pub const DEFAULT_AVAILABLE_THRESHOLD: u8 = 70;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgramMatch {
    pub program: VppProgram,
    /// Raw point total; can go negative when a program is out of region.
    pub score: i32,
    pub percentage: u8,
    pub reasons: Vec<String>,
    pub estimated_earnings: EstimatedEarnings,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EstimatedEarnings {
    pub min: u32,
    pub max: u32,
    pub signup_bonus: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSummary {
    pub region: Region,
    pub total: usize,
    pub available_count: usize,
    pub top_program: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub profile: UserProfile,
    pub summary: MatchSummary,
    pub matches: Vec<ProgramMatch>,
}
