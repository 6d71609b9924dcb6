//! Library-level scenarios: conversation text in, ranked programs out.

use vpp_matcher::chat::{analyze_reply, detect_signals};
use vpp_matcher::matching::{
    filter_matches, match_programs, matches_by_payment_model, summarize, top_matches, FilterMode,
};
use vpp_matcher::profile::{RetailerPreference, UserProfile};
use vpp_matcher::programs::{PaymentModel, ProgramRegistry};
use vpp_matcher::region::Region;

#[test]
fn advisor_reply_flows_into_ranked_matches() {
    let registry = ProgramRegistry::with_defaults();
    let analysis = analyze_reply(
        "Thanks! Let me find the best programs for you.\n\
         QUALIFIED: battery=Tesla Powerwall 3|location=2000|solar=6.6|preference=open",
    );
    assert_eq!(analysis.message, "Thanks! Let me find the best programs for you.");

    let profile = analysis.profile().expect("qualified profile");
    profile.validate().expect("valid profile");
    assert_eq!(profile.region(), Region::Nsw);

    let matches = match_programs(&registry, &profile);
    assert_eq!(matches[0].program.id, "amber-smartshift");
    assert_eq!(matches[0].score, 90);
    // 600-1500 base, 1.0 for 6.6 kW, 1.10 for NSW.
    assert_eq!(matches[0].estimated_earnings.min, 660);
    assert_eq!(matches[0].estimated_earnings.max, 1650);
}

#[test]
fn keeping_retailer_favours_independent_programs() {
    let registry = ProgramRegistry::with_defaults();
    let profile = UserProfile::new(
        "Tesla Powerwall 2",
        "3000",
        Some(10.0),
        RetailerPreference::Keep,
    );
    let top = top_matches(&registry, &profile, 3);
    assert_eq!(top.len(), 3);
    assert!(!top[0].program.retailer_lockin);
    assert!(top[0]
        .reasons
        .iter()
        .any(|r| r == "No retailer switching required"));
}

#[test]
fn summary_counts_before_filtering() {
    let registry = ProgramRegistry::with_defaults();
    let profile = UserProfile::new("Tesla", "5000", Some(6.6), RetailerPreference::Open);
    let ranked = match_programs(&registry, &profile);
    let summary = summarize(Region::Sa, &ranked, 70);
    let strong = filter_matches(ranked.clone(), FilterMode::Available, 4, 70);

    assert_eq!(summary.total, ranked.len());
    assert_eq!(summary.available_count, strong.len());
    assert!(strong.iter().all(|m| m.percentage >= 70));
    assert_eq!(summary.top_program.as_deref(), Some(ranked[0].program.id.as_str()));
}

#[test]
fn payment_model_filter_keeps_rank_order() {
    let registry = ProgramRegistry::with_defaults();
    let profile = UserProfile::new("Sungrow", "4000", Some(5.0), RetailerPreference::Open);
    let fixed = matches_by_payment_model(&registry, &profile, PaymentModel::Fixed);
    assert!(fixed.iter().all(|m| m.program.payment_model == PaymentModel::Fixed));
    assert!(fixed.windows(2).all(|pair| pair[0].score >= pair[1].score));
}

#[test]
fn detected_signals_complete_only_with_all_four() {
    let partial = detect_signals("I've got a Sonnen battery");
    assert!(!partial.is_complete());

    let full = detect_signals("Sonnen eco in 7000, 5kW solar, I'd like to keep my retailer");
    assert_eq!(full.postcode.as_deref(), Some("7000"));
    assert_eq!(full.retailer_preference, Some(RetailerPreference::Keep));
    assert!(full.is_complete());
}
