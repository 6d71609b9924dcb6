use crate::matching::EstimatedEarnings;
use crate::profile::UserProfile;
use crate::programs::VppProgram;

/// Missing, zero or NaN solar uses the unknown-system factor.
pub fn solar_multiplier(solar_kw: Option<f64>) -> f64 {
    match solar_kw {
        Some(kw) if kw != 0.0 && !kw.is_nan() => {
            if kw >= 10.0 {
                1.15
            } else if kw >= 6.6 {
                1.0
            } else if kw >= 5.0 {
                0.9
            } else {
                0.75
            }
        }
        _ => 0.85,
    }
}

pub fn estimate_earnings(profile: &UserProfile, program: &VppProgram) -> EstimatedEarnings {
    let solar = solar_multiplier(profile.solar_kw);
    let region = profile.region().earnings_multiplier();
    let scale = |base: u32| (f64::from(base) * solar * region).round().max(0.0) as u32;
    EstimatedEarnings {
        min: scale(program.avg_annual_earnings.min),
        max: scale(program.avg_annual_earnings.max),
        signup_bonus: program.signup_bonus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::RetailerPreference;
    use crate::programs::ProgramRegistry;

    #[test]
    fn solar_tiers() {
        assert_eq!(solar_multiplier(None), 0.85);
        assert_eq!(solar_multiplier(Some(0.0)), 0.85);
        assert_eq!(solar_multiplier(Some(f64::NAN)), 0.85);
        assert_eq!(solar_multiplier(Some(3.0)), 0.75);
        assert_eq!(solar_multiplier(Some(5.0)), 0.9);
        assert_eq!(solar_multiplier(Some(6.6)), 1.0);
        assert_eq!(solar_multiplier(Some(10.0)), 1.15);
        assert_eq!(solar_multiplier(Some(15.0)), 1.15);
    }

    #[test]
    fn negative_and_infinite_sizes_use_the_tiers() {
        assert_eq!(solar_multiplier(Some(-3.0)), 0.75);
        assert_eq!(solar_multiplier(Some(f64::INFINITY)), 1.15);
        assert_eq!(solar_multiplier(Some(f64::NEG_INFINITY)), 0.75);
    }

    #[test]
    fn vic_standard_system_keeps_base_range() {
        let registry = ProgramRegistry::with_defaults();
        let amber = registry.by_id("amber-smartshift").unwrap();
        let profile = UserProfile::new("Tesla", "3000", Some(6.6), RetailerPreference::Open);
        let estimate = estimate_earnings(&profile, amber);
        assert_eq!(
            estimate,
            EstimatedEarnings {
                min: 600,
                max: 1500,
                signup_bonus: 0
            }
        );
    }

    #[test]
    fn region_and_solar_multipliers_compound() {
        let registry = ProgramRegistry::with_defaults();
        let origin = registry.by_id("origin-loop").unwrap();
        // SA 1.20, unknown solar 0.85 -> factor 1.02
        let profile = UserProfile::new("Tesla", "5000", None, RetailerPreference::Keep);
        let estimate = estimate_earnings(&profile, origin);
        assert_eq!(estimate.min, 204);
        assert_eq!(estimate.max, 408);
        assert_eq!(estimate.signup_bonus, 200);
    }
}
