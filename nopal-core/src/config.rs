use std::env;

use serde::{Deserialize, Serialize};

use nopal_catalog::{default_hours, default_layout, OperatingHours, SlotParams, Table};

use crate::assignment::TierPolicy;

/// Booking policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRules {
    /// How long a seating occupies its table(s).
    #[serde(default = "default_service_duration")]
    pub service_duration_minutes: u32,
    /// Spacing of bookable start times.
    #[serde(default = "default_granularity")]
    pub slot_granularity_minutes: u32,
    /// Same-day slots closer than this to "now" are not offered.
    #[serde(default = "default_lead")]
    pub min_lead_minutes: u32,
    /// Largest party bookable online; bigger groups go through staff.
    #[serde(default = "default_max_party")]
    pub max_party_size: u32,
}

fn default_service_duration() -> u32 {
    90
}

fn default_granularity() -> u32 {
    30
}

fn default_lead() -> u32 {
    30
}

fn default_max_party() -> u32 {
    8
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            service_duration_minutes: default_service_duration(),
            slot_granularity_minutes: default_granularity(),
            min_lead_minutes: default_lead(),
            max_party_size: default_max_party(),
        }
    }
}

impl BookingRules {
    pub fn slot_params(&self) -> SlotParams {
        SlotParams {
            granularity_minutes: self.slot_granularity_minutes,
            service_duration_minutes: self.service_duration_minutes,
            min_lead_minutes: self.min_lead_minutes,
        }
    }
}

/// Everything the engine needs: rules, floor layout, opening hours, tier
/// candidate lists. `Default` is the built-in El Nopal setup, so the engine
/// works with no config files present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub rules: BookingRules,
    #[serde(default = "default_layout")]
    pub tables: Vec<Table>,
    #[serde(default = "default_hours")]
    pub hours: OperatingHours,
    #[serde(default)]
    pub policy: TierPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules: BookingRules::default(),
            tables: default_layout(),
            hours: default_hours(),
            policy: TierPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of NOPAL)
            .add_source(config::Environment::with_prefix("NOPAL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
