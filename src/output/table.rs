use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::batteries::Battery;
use crate::chat::ChatSignals;
use crate::matching::{MatchSummary, ProgramMatch};
use crate::programs::VppProgram;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn render_matches_table(matches: &[ProgramMatch], available_threshold: u8) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Rank",
        "Program",
        "Match",
        "Est. $/year",
        "Bonus",
        "Payment",
        "Why",
    ]);

    for (idx, m) in matches.iter().enumerate() {
        let match_label = format!("{}%", m.percentage);
        let match_cell = if m.percentage >= available_threshold {
            Cell::new(match_label).fg(Color::Green)
        } else {
            Cell::new(match_label).fg(Color::Yellow)
        };
        let bonus = if m.estimated_earnings.signup_bonus > 0 {
            format!("${}", m.estimated_earnings.signup_bonus)
        } else {
            "-".to_string()
        };
        table.add_row(Row::from(vec![
            Cell::new(idx + 1),
            Cell::new(m.program.display_name()),
            match_cell,
            Cell::new(format!(
                "${}-${}",
                m.estimated_earnings.min, m.estimated_earnings.max
            )),
            Cell::new(bonus),
            Cell::new(m.program.payment_model.to_string()),
            Cell::new(m.reasons.join("; ")),
        ]));
    }
    table.to_string()
}

pub fn render_summary(summary: &MatchSummary) -> String {
    let top = summary.top_program.as_deref().unwrap_or("none");
    format!(
        "Region {}: {} matching programs, {} strong matches, top pick {}",
        summary.region, summary.total, summary.available_count, top
    )
}

pub fn render_programs_table(programs: &[&VppProgram]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "ID",
        "Provider",
        "Program",
        "Regions",
        "Base $/year",
        "Lock-in",
        "Control",
        "Payment",
        "Rate",
    ]);
    for p in programs {
        let regions = p
            .regions
            .iter()
            .map(|r| r.code())
            .collect::<Vec<_>>()
            .join("/");
        table.add_row(vec![
            p.id.clone(),
            p.provider.clone(),
            p.name.clone(),
            regions,
            format!("${}-${}", p.avg_annual_earnings.min, p.avg_annual_earnings.max),
            if p.retailer_lockin { "yes" } else { "no" }.to_string(),
            p.control_level.to_string(),
            p.payment_model.to_string(),
            p.vpp_rate.to_string(),
        ]);
    }
    table.to_string()
}

pub fn render_program_detail(program: &VppProgram) -> String {
    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    let rows = [
        ("Provider", program.provider.clone()),
        ("Program", program.name.clone()),
        (
            "Regions",
            program
                .regions
                .iter()
                .map(|r| r.code())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        ("Batteries", program.compatible_batteries.join(", ")),
        ("Min battery", format!("{} kWh", program.min_battery_size_kwh)),
        (
            "Base earnings",
            format!(
                "${}-${}/year",
                program.avg_annual_earnings.min, program.avg_annual_earnings.max
            ),
        ),
        ("Sign-up bonus", format!("${}", program.signup_bonus)),
        ("VPP rate", program.vpp_rate.to_string()),
        ("Control", program.control_level.to_string()),
        ("Payment", program.payment_model.to_string()),
        ("Retailer lock-in", program.retailer_lockin.to_string()),
        ("Pros", program.pros.join("\n")),
        ("Cons", program.cons.join("\n")),
        ("Sign up", program.signup_url.clone()),
        ("Verified", program.updated_at.to_string()),
    ];
    for (field, value) in rows {
        table.add_row(vec![field.to_string(), value]);
    }
    table.to_string()
}

pub fn render_batteries_table(batteries: &[&Battery]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Battery", "Capacity", "Price", "Popular", "VPP ready"]);
    for b in batteries {
        table.add_row(vec![
            b.display_name(),
            format!("{} kWh", b.capacity_kwh),
            format!("${}-${}", b.price_range.min, b.price_range.max),
            if b.popular { "yes" } else { "no" }.to_string(),
            if b.vpp_compatible { "yes" } else { "no" }.to_string(),
        ]);
    }
    table.to_string()
}

pub fn render_signals_table(signals: &ChatSignals) -> String {
    let mut table = new_table();
    table.set_header(vec!["Signal", "Detected"]);
    let dash = || "-".to_string();
    table.add_row(vec![
        "Battery".to_string(),
        signals.battery_brand.clone().unwrap_or_else(dash),
    ]);
    table.add_row(vec![
        "Postcode".to_string(),
        signals.postcode.clone().unwrap_or_else(dash),
    ]);
    table.add_row(vec![
        "Solar".to_string(),
        if signals.solar_mentioned { "yes" } else { "no" }.to_string(),
    ]);
    table.add_row(vec![
        "Retailer preference".to_string(),
        signals
            .retailer_preference
            .map(|p| p.to_string())
            .unwrap_or_else(dash),
    ]);
    table.to_string()
}
