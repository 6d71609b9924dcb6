pub mod client;
pub mod detect;
pub mod prompt;
pub mod qualify;

use serde::{Deserialize, Serialize};

use crate::profile::RetailerPreference;

pub use client::ChatClient;
pub use detect::{
    detect_battery, detect_battery_brand, detect_postcode, detect_retailer_preference,
    detect_signals, detect_solar,
};
pub use prompt::system_prompt;
pub use qualify::{
    analyze_reply, parse_qualified, rank_reply, strip_qualified, QualifiedProfile, RankedReply,
    ReplyAnalysis,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChatSignals {
    pub battery_brand: Option<String>,
    pub postcode: Option<String>,
    pub solar_mentioned: bool,
    pub retailer_preference: Option<RetailerPreference>,
}

impl ChatSignals {
    pub fn is_complete(&self) -> bool {
        self.battery_brand.is_some()
            && self.postcode.is_some()
            && self.solar_mentioned
            && self.retailer_preference.is_some()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}
