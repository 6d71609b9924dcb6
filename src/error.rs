use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("invalid postcode {0:?}: expected four digits between 0200 and 9999")]
    InvalidPostcode(String),
    #[error("battery is required")]
    EmptyBattery,
    #[error("unknown retailer preference: {0} (expected keep, open or advice)")]
    UnknownPreference(String),
    #[error("unknown payment model: {0} (expected wholesale, fixed, event or hybrid)")]
    UnknownPaymentModel(String),
    #[error("unknown control level: {0}")]
    UnknownControlLevel(String),
    #[error("unknown region: {0}")]
    UnknownRegion(String),
    #[error("unknown filter mode: {0} (expected top, available or all)")]
    UnknownFilter(String),
    #[error("unknown program id: {0}")]
    UnknownProgram(String),
}
