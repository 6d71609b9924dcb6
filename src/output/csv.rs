use anyhow::Result;

use crate::matching::ProgramMatch;
use crate::programs::VppProgram;

pub fn matches_to_csv(matches: &[ProgramMatch]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "rank",
        "program_id",
        "provider",
        "score",
        "percentage",
        "earnings_min",
        "earnings_max",
        "signup_bonus",
        "payment_model",
        "reasons",
    ])?;
    for (idx, m) in matches.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            m.program.id.clone(),
            m.program.provider.clone(),
            m.score.to_string(),
            m.percentage.to_string(),
            m.estimated_earnings.min.to_string(),
            m.estimated_earnings.max.to_string(),
            m.estimated_earnings.signup_bonus.to_string(),
            m.program.payment_model.to_string(),
            m.reasons.join("; "),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn programs_to_csv(programs: &[&VppProgram]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "provider",
        "name",
        "regions",
        "earnings_min",
        "earnings_max",
        "signup_bonus",
        "retailer_lockin",
        "control_level",
        "payment_model",
        "vpp_rate",
    ])?;
    for p in programs {
        let regions = p
            .regions
            .iter()
            .map(|r| r.code())
            .collect::<Vec<_>>()
            .join("/");
        writer.write_record([
            p.id.clone(),
            p.provider.clone(),
            p.name.clone(),
            regions,
            p.avg_annual_earnings.min.to_string(),
            p.avg_annual_earnings.max.to_string(),
            p.signup_bonus.to_string(),
            p.retailer_lockin.to_string(),
            p.control_level.to_string(),
            p.payment_model.to_string(),
            p.vpp_rate.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programs::ProgramRegistry;

    #[test]
    fn programs_csv_has_header_and_one_row_per_program() {
        let registry = ProgramRegistry::with_defaults();
        let programs = registry.programs().iter().collect::<Vec<_>>();
        let csv = programs_to_csv(&programs).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("id,provider,name"));
        assert_eq!(lines.count(), registry.len());
        assert!(csv.contains("amber-smartshift,Amber Electric,SmartShift,NSW/VIC/QLD/SA/ACT,600,1500"));
    }
}
