use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Battery {
    pub brand: &'static str,
    pub model: &'static str,
    pub capacity_kwh: f64,
    pub price_range: PriceRange,
    pub popular: bool,
    pub vpp_compatible: bool,
}

impl Battery {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
}

pub static BATTERIES: &[Battery] = &[
    Battery {
        brand: "Tesla",
        model: "Powerwall 2",
        capacity_kwh: 13.5,
        price_range: PriceRange { min: 15_000, max: 17_000 },
        popular: true,
        vpp_compatible: true,
    },
    Battery {
        brand: "Tesla",
        model: "Powerwall 3",
        capacity_kwh: 13.5,
        price_range: PriceRange { min: 16_000, max: 18_000 },
        popular: true,
        vpp_compatible: true,
    },
    Battery {
        brand: "Sungrow",
        model: "SBR096",
        capacity_kwh: 9.6,
        price_range: PriceRange { min: 8_000, max: 10_000 },
        popular: true,
        vpp_compatible: true,
    },
    Battery {
        brand: "Sonnen",
        model: "eco 10",
        capacity_kwh: 10.0,
        price_range: PriceRange { min: 12_000, max: 14_000 },
        popular: false,
        vpp_compatible: true,
    },
    Battery {
        brand: "LG",
        model: "Chem RESU10H",
        capacity_kwh: 9.8,
        price_range: PriceRange { min: 9_000, max: 11_000 },
        popular: true,
        vpp_compatible: true,
    },
    Battery {
        brand: "BYD",
        model: "Battery-Box Premium HVS",
        capacity_kwh: 10.2,
        price_range: PriceRange { min: 8_500, max: 10_500 },
        popular: false,
        vpp_compatible: true,
    },
];

pub fn squash_name(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn match_battery(input: &str) -> Option<&'static Battery> {
    let needle = squash_name(input);
    if needle.is_empty() {
        return None;
    }
    BATTERIES.iter().find(|battery| {
        let full = squash_name(&battery.display_name());
        let brand = squash_name(battery.brand);
        full.contains(&needle) || needle.contains(&full) || needle.contains(&brand)
    })
}
