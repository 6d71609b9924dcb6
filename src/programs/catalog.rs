use chrono::NaiveDate;

use crate::programs::{ControlLevel, EarningsRange, PaymentModel, VppProgram, VppRate};
use crate::region::Region;

const NEM_MAINLAND: [Region; 4] = [Region::Nsw, Region::Vic, Region::Qld, Region::Sa];

pub fn default_programs() -> Vec<VppProgram> {
    let verified = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap_or(NaiveDate::MIN);
    vec![
        VppProgram {
            id: "amber-smartshift".to_string(),
            name: "SmartShift".to_string(),
            provider: "Amber Electric".to_string(),
            regions: with_extra(&[Region::Act]),
            min_battery_size_kwh: 5.0,
            compatible_batteries: strings(&[
                "Tesla Powerwall 2",
                "Tesla Powerwall 3",
                "Sungrow SBR",
                "AlphaESS",
                "Sigenergy",
                "GoodWe",
                "SolaX",
                "LG Chem",
                "GivEnergy",
            ]),
            retailer_lockin: false,
            avg_annual_earnings: EarningsRange { min: 600, max: 1500 },
            signup_bonus: 0,
            vpp_rate: VppRate::Variable,
            control_level: ControlLevel::Full,
            signup_url: "https://www.amber.com.au/solar-and-battery".to_string(),
            pros: strings(&[
                "Wholesale price pass-through - earn up to $19/kWh during spikes",
                "Full battery control - you decide when to charge/discharge",
                "No lock-in contract - cancel anytime with 14 days notice",
                "Government rebates available in NSW and SA",
            ]),
            cons: strings(&[
                "Earnings vary with market conditions",
                "Monthly subscription fee applies",
                "Requires active monitoring for best results",
            ]),
            payment_model: PaymentModel::Wholesale,
            updated_at: verified,
        },
        VppProgram {
            id: "agl-byob".to_string(),
            name: "Bring Your Own Battery VPP".to_string(),
            provider: "AGL".to_string(),
            regions: NEM_MAINLAND.to_vec(),
            min_battery_size_kwh: 5.0,
            compatible_batteries: strings(&[
                "Tesla Powerwall 2",
                "Tesla Powerwall 3",
                "AlphaESS",
                "Sungrow",
                "Sigenergy",
                "LG Chem",
                "SolarEdge",
            ]),
            retailer_lockin: true,
            avg_annual_earnings: EarningsRange { min: 330, max: 530 },
            signup_bonus: 0,
            vpp_rate: VppRate::PerKwh(1.0),
            control_level: ControlLevel::Semi,
            signup_url: "https://www.agl.com.au/residential/solar-and-batteries/virtual-power-plant"
                .to_string(),
            pros: strings(&[
                "Trusted major retailer brand",
                "Quarterly bill credits ($20-$45 depending on state)",
                "$1/kWh for VPP event exports",
                "Battery backup guarantee - 250kWh annual cap",
            ]),
            cons: strings(&[
                "Must be AGL electricity customer",
                "Lower earning potential vs wholesale VPPs",
                "250kWh annual cap on VPP exports",
            ]),
            payment_model: PaymentModel::Event,
            updated_at: verified,
        },
        VppProgram {
            id: "origin-loop".to_string(),
            name: "Origin Loop / Battery Lite".to_string(),
            provider: "Origin Energy".to_string(),
            regions: with_extra(&[Region::Act]),
            min_battery_size_kwh: 5.0,
            compatible_batteries: strings(&[
                "Tesla Powerwall 2",
                "Tesla Powerwall 3",
                "LG Chem",
                "SolarEdge",
            ]),
            retailer_lockin: false,
            avg_annual_earnings: EarningsRange { min: 200, max: 400 },
            signup_bonus: 200,
            vpp_rate: VppRate::PerKwh(1.0),
            control_level: ControlLevel::Semi,
            signup_url: "https://www.originenergy.com.au/solar/panels-batteries/virtual-power-plant/"
                .to_string(),
            pros: strings(&[
                "$200 sign-up bonus credit",
                "$1/kWh for VPP event exports",
                "No lock-in contract - 20 days notice to leave",
                "NSW/SA government rebates available",
            ]),
            cons: strings(&[
                "200kWh annual cap on exports",
                "Must be Origin electricity customer",
                "Lower earning potential than wholesale VPPs",
            ]),
            payment_model: PaymentModel::Event,
            updated_at: verified,
        },
        VppProgram {
            id: "energyaustralia-battery-ease".to_string(),
            name: "Battery Ease".to_string(),
            provider: "EnergyAustralia".to_string(),
            regions: with_extra(&[Region::Act]),
            min_battery_size_kwh: 5.0,
            compatible_batteries: strings(&[
                "Tesla Powerwall 2",
                "AlphaESS",
                "Redback Smart Hybrid",
                "LG Chem",
                "SolarEdge",
                "Sungrow",
            ]),
            retailer_lockin: true,
            avg_annual_earnings: EarningsRange { min: 180, max: 450 },
            signup_bonus: 0,
            vpp_rate: VppRate::PerKwh(0.12),
            control_level: ControlLevel::Automated,
            signup_url: "https://www.energyaustralia.com.au/home/electricity-and-gas/solar-power/virtual-power-plant"
                .to_string(),
            pros: strings(&[
                "$15/month in bill credits ($180/year guaranteed)",
                "12c/kWh feed-in for first 15kWh daily",
                "No lock-in contract",
                "NSW PDRS rebate eligible",
            ]),
            cons: strings(&[
                "Must be EnergyAustralia customer",
                "Lower earnings than wholesale VPPs",
                "20% minimum battery reserve",
            ]),
            payment_model: PaymentModel::Fixed,
            updated_at: verified,
        },
        VppProgram {
            id: "discover-energy".to_string(),
            name: "VPP Program".to_string(),
            provider: "Discover Energy".to_string(),
            regions: NEM_MAINLAND.to_vec(),
            min_battery_size_kwh: 5.0,
            compatible_batteries: strings(&[
                "Tesla Powerwall 2",
                "Tesla Powerwall 3",
                "Sungrow SBR",
                "AlphaESS",
                "GoodWe",
            ]),
            retailer_lockin: true,
            avg_annual_earnings: EarningsRange { min: 400, max: 800 },
            signup_bonus: 0,
            vpp_rate: VppRate::Variable,
            control_level: ControlLevel::Automated,
            signup_url: "https://www.discoverenergy.com.au/vpp".to_string(),
            pros: strings(&[
                "Smart Feed-in Algorithm maximises export value",
                "Higher event export credits + profit share",
                "Machine learning optimisation",
                "Cash out credits above $100",
            ]),
            cons: strings(&[
                "Must switch to Discover Energy",
                "Limited opt-out allowed",
                "Inverter size capped at 10kW",
            ]),
            payment_model: PaymentModel::Hybrid,
            updated_at: verified,
        },
        VppProgram {
            id: "shinehub-vpp".to_string(),
            name: "Community VPP".to_string(),
            provider: "ShineHub".to_string(),
            regions: with_extra(&[Region::Act, Region::Tas]),
            min_battery_size_kwh: 5.0,
            compatible_batteries: strings(&["Hinen", "AlphaESS", "GoodWe", "Sungrow", "Growatt"]),
            retailer_lockin: false,
            avg_annual_earnings: EarningsRange { min: 300, max: 700 },
            signup_bonus: 0,
            vpp_rate: VppRate::PerKwh(0.55),
            control_level: ControlLevel::Full,
            signup_url: "https://shinehub.com.au/virtual-power-plant/".to_string(),
            pros: strings(&[
                "Retailer independent - keep your current provider",
                "55c/kWh for VPP exports ($1/kWh for Hinen batteries)",
                "No lock-in contract or exit fees",
                "Free to join",
            ]),
            cons: strings(&[
                "Battery must be installed by ShineHub",
                "Limited battery brand compatibility",
                "Earnings on top of existing feed-in tariff",
            ]),
            payment_model: PaymentModel::Event,
            updated_at: verified,
        },
        VppProgram {
            id: "diamond-wattbank".to_string(),
            name: "WATTBANK VPP".to_string(),
            provider: "Diamond Energy".to_string(),
            regions: NEM_MAINLAND.to_vec(),
            min_battery_size_kwh: 5.0,
            compatible_batteries: strings(&[
                "Sungrow",
                "AlphaESS",
                "LG Chem RESU HV",
                "Tesla Powerwall",
                "SolarEdge",
                "SolaX",
            ]),
            retailer_lockin: false,
            avg_annual_earnings: EarningsRange { min: 250, max: 550 },
            signup_bonus: 0,
            vpp_rate: VppRate::PerKwh(0.30),
            control_level: ControlLevel::Full,
            signup_url: "https://diamondenergy.com.au/join-diamond-energy-vpp/".to_string(),
            pros: strings(&[
                "$250-$450/year guaranteed access credit",
                "30c/kWh for night exports (6pm-8am)",
                "No lock-in contract or exit fees",
                "Retailer-independent option available",
            ]),
            cons: strings(&[
                "$68 establishment fee",
                "QLD limited to Energex region only",
                "Requires switching to Diamond Energy",
            ]),
            payment_model: PaymentModel::Fixed,
            updated_at: verified,
        },
        VppProgram {
            id: "engie-vpp".to_string(),
            name: "BYO Battery VPP".to_string(),
            provider: "ENGIE".to_string(),
            regions: NEM_MAINLAND.to_vec(),
            min_battery_size_kwh: 5.0,
            compatible_batteries: strings(&[
                "Tesla Powerwall 2",
                "Tesla Powerwall 3",
                "AlphaESS",
                "Sungrow",
                "Sigenergy",
                "Empower",
            ]),
            retailer_lockin: true,
            avg_annual_earnings: EarningsRange { min: 280, max: 440 },
            signup_bonus: 200,
            vpp_rate: VppRate::PerKwh(0.0),
            control_level: ControlLevel::Semi,
            signup_url: "https://engie.com.au/residential/energy-efficiency/engie-vpp".to_string(),
            pros: strings(&[
                "$200 sign-up credit (NSW/QLD/SA) or $100 (VIC)",
                "$20/month bill credits ($15/month VIC)",
                "No lock-in contract",
                "Simple setup process",
            ]),
            cons: strings(&[
                "Must switch to ENGIE retailer",
                "VIC gets lower bonuses",
                "No per-kWh event payments",
            ]),
            payment_model: PaymentModel::Fixed,
            updated_at: verified,
        },
        VppProgram {
            id: "globird-zerohero".to_string(),
            name: "ZeroHero".to_string(),
            provider: "GloBird Energy".to_string(),
            regions: NEM_MAINLAND.to_vec(),
            min_battery_size_kwh: 5.0,
            compatible_batteries: strings(&[
                "AlphaESS",
                "Redback",
                "Sungrow",
                "SolaX",
                "Sigenergy",
                "SAJ",
                "Neovolt",
                "eCactus",
            ]),
            retailer_lockin: true,
            avg_annual_earnings: EarningsRange { min: 200, max: 500 },
            signup_bonus: 0,
            vpp_rate: VppRate::PerKwh(1.0),
            control_level: ControlLevel::Full,
            signup_url: "https://www.globirdenergy.com.au/energy-saver/zerohero/".to_string(),
            pros: strings(&[
                "$0 energy rate 11am-2pm daily (free charging)",
                "$1/day when drawing zero grid power at peak",
                "Up to $312/year in ZeroHero credits",
                "You stay in control - battery never drained without permission",
            ]),
            cons: strings(&[
                "Must switch to GloBird Energy",
                "Credits based on achieving zero-grid goals",
                "Newer program (launched 2024)",
            ]),
            payment_model: PaymentModel::Hybrid,
            updated_at: verified,
        },
        VppProgram {
            id: "sonnen-connect".to_string(),
            name: "sonnenConnect".to_string(),
            provider: "Sonnen".to_string(),
            regions: with_extra(&[Region::Tas]),
            min_battery_size_kwh: 4.0,
            compatible_batteries: strings(&[
                "sonnenBatterie eco",
                "sonnenBatterie evo",
                "sonnenBatterie hybrid",
            ]),
            retailer_lockin: false,
            avg_annual_earnings: EarningsRange { min: 600, max: 1200 },
            signup_bonus: 0,
            vpp_rate: VppRate::Variable,
            control_level: ControlLevel::Semi,
            signup_url: "https://sonnen.com.au/virtual-power-plant-vpp-works/".to_string(),
            pros: strings(&[
                "Retailer independent - keep your current provider",
                "High earning potential ($600-$1200/year)",
                "Daily credits + VPP event payments",
                "Premium German-engineered battery integration",
            ]),
            cons: strings(&[
                "Sonnen batteries only",
                "Must own battery outright (no finance)",
                "Cannot be in another VPP simultaneously",
            ]),
            payment_model: PaymentModel::Hybrid,
            updated_at: verified,
        },
        VppProgram {
            id: "redback-smart".to_string(),
            name: "Smart VPP".to_string(),
            provider: "Redback Technologies".to_string(),
            regions: NEM_MAINLAND.to_vec(),
            min_battery_size_kwh: 4.0,
            compatible_batteries: strings(&["Redback Smart Battery", "Redback Smart Hybrid"]),
            retailer_lockin: false,
            avg_annual_earnings: EarningsRange { min: 300, max: 600 },
            signup_bonus: 0,
            vpp_rate: VppRate::Variable,
            control_level: ControlLevel::Full,
            signup_url: "https://redbacktech.com/au/virtual-power-plant/".to_string(),
            pros: strings(&[
                "Australian-made batteries",
                "Retailer independent",
                "Smart inverter integration",
                "EV charger compatible",
            ]),
            cons: strings(&[
                "Redback systems only",
                "Smaller market presence",
                "Regional availability varies",
            ]),
            payment_model: PaymentModel::Event,
            updated_at: verified,
        },
    ]
}

fn with_extra(extra: &[Region]) -> Vec<Region> {
    let mut regions = NEM_MAINLAND.to_vec();
    regions.extend_from_slice(extra);
    regions
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
