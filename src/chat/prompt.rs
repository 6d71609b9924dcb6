use crate::programs::{ProgramRegistry, VppProgram};

const PROMPT_HEAD: &str = "\
You are a friendly Virtual Power Plant (VPP) advisor for Australian home battery owners.

Your job is to collect four facts through casual conversation, one question at a time:
1. Battery brand (Tesla, LG, Sonnen, Sungrow, ...)
2. Australian postcode (4 digits)
3. Solar system size in kW, or \"none\"
4. Retailer preference: open (happy to switch), keep (stay with current retailer) or advice (unsure)

Style: two or three sentences per reply, plain text, no emojis, no JSON, no lists of programs.

If asked what a VPP is: a VPP links home batteries into a network. When wholesale prices spike the
battery exports at premium rates, often $1/kWh or more instead of a few cents of feed-in tariff.

As soon as you know all four facts, reply with one short sentence such as
\"Perfect, let me find the best programs for you!\" and put this on the next line, exactly once:

QUALIFIED: battery=<brand>|location=<postcode>|solar=<kW or none>|preference=<open|keep|advice>

Example:
QUALIFIED: battery=Sonnen|location=3000|solar=none|preference=keep

Do not show results yourself; the website ranks programs from that line.
";

pub fn system_prompt(registry: &ProgramRegistry) -> String {
    let summary = registry
        .programs()
        .iter()
        .map(program_line)
        .collect::<Vec<_>>()
        .join("\n");
    format!("{PROMPT_HEAD}\nPrograms for your reference only, do not list them to the user:\n{summary}\n")
}

fn program_line(program: &VppProgram) -> String {
    let regions = program
        .regions
        .iter()
        .map(|r| r.code())
        .collect::<Vec<_>>()
        .join("/");
    let lockin = if program.retailer_lockin {
        "requires switching retailer"
    } else {
        "no retailer lock-in"
    };
    format!(
        "- {} ({}): ${}-{}/year, {}, {}",
        program.provider,
        program.name,
        program.avg_annual_earnings.min,
        program.avg_annual_earnings.max,
        regions,
        lockin
    )
}
