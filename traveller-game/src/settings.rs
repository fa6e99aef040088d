//! Tunable game settings: tolls, robbery risk, search horizon and run length.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when settings invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("{field} must be a percentage between 0 and 100 (got {value})")]
    Percentage { field: &'static str, value: u8 },
    #[error("robbery loss minimum {min} exceeds maximum {max}")]
    LossRange { min: u32, max: u32 },
    #[error("{field} must be positive")]
    ZeroBudget { field: &'static str },
    #[error("impulsiveness must be a finite value of at least 1.0 (got {0})")]
    Impulsiveness(f64),
    #[error("settings are not valid JSON: {0}")]
    Parse(String),
}

/// Which autonomous agents take part in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveAgents {
    #[serde(default = "enabled")]
    pub random: bool,
    #[serde(default = "enabled")]
    pub greedy: bool,
    #[serde(default = "enabled")]
    pub smart: bool,
}

const fn enabled() -> bool {
    true
}

impl Default for ActiveAgents {
    fn default() -> Self {
        Self {
            random: true,
            greedy: true,
            smart: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Share of an arriving foreigner's money withheld by border cities, in percent.
    #[serde(default = "Settings::default_toll_percent")]
    pub toll_percent: u8,
    /// Chance that a mafia country robs an arriving traveller, in percent.
    #[serde(default = "Settings::default_robbery_risk")]
    pub robbery_risk: u8,
    #[serde(default = "Settings::default_min_loss")]
    pub min_loss: u32,
    #[serde(default = "Settings::default_max_loss")]
    pub max_loss: u32,
    /// Look-ahead cap for the smart agent, in road-length units.
    #[serde(default = "Settings::default_search_horizon")]
    pub search_horizon: u32,
    #[serde(default = "Settings::default_total_steps")]
    pub total_steps: u32,
    /// Discount applied per edge to longer candidate paths; 1.0 means no preference.
    #[serde(default = "Settings::default_impulsiveness")]
    pub impulsiveness: f64,
    #[serde(default)]
    pub active: ActiveAgents,
}

impl Settings {
    const fn default_toll_percent() -> u8 {
        20
    }

    const fn default_robbery_risk() -> u8 {
        20
    }

    const fn default_min_loss() -> u32 {
        10
    }

    const fn default_max_loss() -> u32 {
        50
    }

    const fn default_search_horizon() -> u32 {
        200
    }

    const fn default_total_steps() -> u32 {
        600
    }

    const fn default_impulsiveness() -> f64 {
        1.10
    }

    /// Parse settings from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values fail validation.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|err| SettingsError::Parse(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the invariants the revenue engine and the search rely on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.toll_percent > 100 {
            return Err(SettingsError::Percentage {
                field: "toll_percent",
                value: self.toll_percent,
            });
        }
        if self.robbery_risk > 100 {
            return Err(SettingsError::Percentage {
                field: "robbery_risk",
                value: self.robbery_risk,
            });
        }
        if self.min_loss > self.max_loss {
            return Err(SettingsError::LossRange {
                min: self.min_loss,
                max: self.max_loss,
            });
        }
        if self.search_horizon == 0 {
            return Err(SettingsError::ZeroBudget {
                field: "search_horizon",
            });
        }
        if self.total_steps == 0 {
            return Err(SettingsError::ZeroBudget {
                field: "total_steps",
            });
        }
        if !self.impulsiveness.is_finite() || self.impulsiveness < 1.0 {
            return Err(SettingsError::Impulsiveness(self.impulsiveness));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            toll_percent: Self::default_toll_percent(),
            robbery_risk: Self::default_robbery_risk(),
            min_loss: Self::default_min_loss(),
            max_loss: Self::default_max_loss(),
            search_horizon: Self::default_search_horizon(),
            total_steps: Self::default_total_steps(),
            impulsiveness: Self::default_impulsiveness(),
            active: ActiveAgents::default(),
        }
    }
}
