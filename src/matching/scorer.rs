use tracing::debug;

use crate::matching::earnings::estimate_earnings;
use crate::matching::ProgramMatch;
use crate::profile::{is_battery_compatible, is_same_brand_family, RetailerPreference, UserProfile};
use crate::programs::{ControlLevel, PaymentModel, ProgramRegistry, VppProgram};
use crate::region::Region;

const REGION_AVAILABLE: i32 = 30;
const REGION_UNAVAILABLE: i32 = -20;
const BATTERY_COMPATIBLE: i32 = 25;
const BATTERY_SAME_BRAND: i32 = 10;

pub fn score_program(profile: &UserProfile, region: Region, program: &VppProgram) -> ProgramMatch {
    let mut score = 0;
    let mut reasons = Vec::new();

    // Out-of-region programs stay in the running with a penalty so a strong
    // fit elsewhere can still surface.
    let available = program.available_in(region)
        || (region == Region::Nsw && program.available_in(Region::Act));
    if available {
        score += REGION_AVAILABLE;
        reasons.push(format!("Available in {region}"));
    } else {
        score += REGION_UNAVAILABLE;
        reasons.push(format!("Limited availability in {region}"));
    }

    if is_battery_compatible(&profile.battery, &program.compatible_batteries) {
        score += BATTERY_COMPATIBLE;
        reasons.push("Compatible with your battery".to_string());
    } else if is_same_brand_family(&profile.battery, &program.compatible_batteries) {
        score += BATTERY_SAME_BRAND;
        reasons.push("May be compatible - check with provider".to_string());
    }

    match profile.retailer_preference {
        RetailerPreference::Keep => {
            if program.retailer_lockin {
                score += 5;
                reasons.push("Requires retailer switch".to_string());
            } else {
                score += 20;
                reasons.push("No retailer switching required".to_string());
            }
        }
        RetailerPreference::Open => {
            score += 15;
            if program.retailer_lockin {
                reasons.push("Bundled with electricity plan".to_string());
            } else {
                reasons.push("Flexible - works with any retailer".to_string());
            }
        }
        RetailerPreference::Advice => score += 10,
    }

    let max_earnings = program.avg_annual_earnings.max;
    if max_earnings >= 1000 {
        score += 15;
        reasons.push("High earning potential (wholesale market)".to_string());
    } else if max_earnings >= 500 {
        score += 10;
        reasons.push("Good earning potential".to_string());
    } else if max_earnings >= 300 {
        score += 5;
        reasons.push("Moderate, predictable earnings".to_string());
    }

    match program.control_level {
        ControlLevel::Full => {
            score += 5;
            reasons.push("You maintain full battery control".to_string());
        }
        ControlLevel::Semi => {
            score += 3;
            reasons.push("Shared control with provider".to_string());
        }
        ControlLevel::Automated => {
            score += 2;
            reasons.push("Automated - set and forget".to_string());
        }
    }

    if program.signup_bonus >= 200 {
        score += 5;
        reasons.push(format!("${} sign-up bonus", program.signup_bonus));
    } else if program.signup_bonus >= 100 {
        score += 3;
        reasons.push(format!("${} sign-up bonus", program.signup_bonus));
    }

    debug!(program = %program.id, score, "scored program");

    ProgramMatch {
        program: program.clone(),
        score,
        percentage: score.clamp(0, 100) as u8,
        reasons,
        estimated_earnings: estimate_earnings(profile, program),
    }
}

/// Ties keep catalog order.
pub fn match_programs(registry: &ProgramRegistry, profile: &UserProfile) -> Vec<ProgramMatch> {
    let region = profile.region();
    let mut matches = registry
        .programs()
        .iter()
        .map(|program| score_program(profile, region, program))
        .filter(|m| m.score > 0)
        .collect::<Vec<_>>();
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

pub fn top_matches(
    registry: &ProgramRegistry,
    profile: &UserProfile,
    count: usize,
) -> Vec<ProgramMatch> {
    let mut matches = match_programs(registry, profile);
    matches.truncate(count);
    matches
}

pub fn matches_by_payment_model(
    registry: &ProgramRegistry,
    profile: &UserProfile,
    model: PaymentModel,
) -> Vec<ProgramMatch> {
    match_programs(registry, profile)
        .into_iter()
        .filter(|m| m.program.payment_model == model)
        .collect()
}
