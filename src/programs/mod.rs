pub mod catalog;

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::region::Region;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VppProgram {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub regions: Vec<Region>,
    pub min_battery_size_kwh: f64,
    pub compatible_batteries: Vec<String>,
    pub retailer_lockin: bool,
    pub avg_annual_earnings: EarningsRange,
    pub signup_bonus: u32,
    pub vpp_rate: VppRate,
    pub control_level: ControlLevel,
    pub signup_url: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    pub payment_model: PaymentModel,
    pub updated_at: NaiveDate,
}

impl VppProgram {
    pub fn available_in(&self, region: Region) -> bool {
        self.regions.contains(&region)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.provider, self.name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EarningsRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawVppRate", into = "RawVppRate")]
pub enum VppRate {
    PerKwh(f64),
    Variable,
}

impl Display for VppRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PerKwh(rate) => write!(f, "${rate:.2}/kWh"),
            Self::Variable => write!(f, "variable"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawVppRate {
    Number(f64),
    Text(String),
}

impl TryFrom<RawVppRate> for VppRate {
    type Error = String;

    fn try_from(value: RawVppRate) -> std::result::Result<Self, Self::Error> {
        match value {
            RawVppRate::Number(rate) => Ok(Self::PerKwh(rate)),
            RawVppRate::Text(text) if text.eq_ignore_ascii_case("variable") => Ok(Self::Variable),
            RawVppRate::Text(text) => Err(format!("invalid vpp_rate: {text}")),
        }
    }
}

impl From<VppRate> for RawVppRate {
    fn from(value: VppRate) -> Self {
        match value {
            VppRate::PerKwh(rate) => Self::Number(rate),
            VppRate::Variable => Self::Text("variable".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ControlLevel {
    Full,
    Semi,
    Automated,
}

impl ControlLevel {
    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Semi => "semi",
            Self::Automated => "automated",
        }
    }
}

impl Display for ControlLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

impl FromStr for ControlLevel {
    type Err = MatchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "semi" => Ok(Self::Semi),
            "automated" | "auto" => Ok(Self::Automated),
            _ => Err(MatchError::UnknownControlLevel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentModel {
    Wholesale,
    Fixed,
    Event,
    Hybrid,
}

impl PaymentModel {
    pub const ALL: [PaymentModel; 4] = [
        PaymentModel::Wholesale,
        PaymentModel::Fixed,
        PaymentModel::Event,
        PaymentModel::Hybrid,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Wholesale => "wholesale",
            Self::Fixed => "fixed",
            Self::Event => "event",
            Self::Hybrid => "hybrid",
        }
    }
}

impl Display for PaymentModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

impl FromStr for PaymentModel {
    type Err = MatchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        PaymentModel::ALL
            .into_iter()
            .find(|model| model.as_slug() == normalized)
            .ok_or_else(|| MatchError::UnknownPaymentModel(s.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct ProgramRegistry {
    programs: Arc<Vec<VppProgram>>,
}

impl ProgramRegistry {
    pub fn new(programs: Vec<VppProgram>) -> Self {
        Self {
            programs: Arc::new(programs),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(catalog::default_programs())
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed reading catalog: {}", path.display()))?;
        let programs: Vec<VppProgram> = serde_json::from_str(&data)
            .with_context(|| format!("failed parsing catalog JSON: {}", path.display()))?;
        if programs.is_empty() {
            return Err(anyhow!("catalog is empty: {}", path.display()));
        }
        let mut ids = programs.iter().map(|p| p.id.as_str()).collect::<Vec<_>>();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(anyhow!("duplicate program id in catalog: {}", pair[0]));
        }
        Ok(Self::new(programs))
    }

    pub fn programs(&self) -> &[VppProgram] {
        &self.programs
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&VppProgram> {
        self.programs.iter().find(|p| p.id == id)
    }

    pub fn by_region(&self, region: Region) -> Vec<&VppProgram> {
        self.programs
            .iter()
            .filter(|p| p.available_in(region))
            .collect()
    }

    pub fn retailer_independent(&self) -> Vec<&VppProgram> {
        self.programs.iter().filter(|p| !p.retailer_lockin).collect()
    }

    pub fn select(
        &self,
        region: Option<Region>,
        independent_only: bool,
        payment_model: Option<PaymentModel>,
    ) -> Vec<&VppProgram> {
        let mut programs = match (region, independent_only) {
            (Some(region), _) => self.by_region(region),
            (None, true) => self.retailer_independent(),
            (None, false) => self.programs.iter().collect(),
        };
        if independent_only {
            programs.retain(|p| !p.retailer_lockin);
        }
        if let Some(model) = payment_model {
            programs.retain(|p| p.payment_model == model);
        }
        programs
    }
}

impl Default for ProgramRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
