//! Weather summary model

use serde::{Deserialize, Serialize};

/// Conditions reported for one place on one day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WeatherSummary {
    /// Condition text as reported by the provider, e.g. `"Rain, Overcast"`
    pub condition_text: String,
}

impl WeatherSummary {
    #[must_use]
    pub fn new(condition_text: impl Into<String>) -> Self {
        Self {
            condition_text: condition_text.into(),
        }
    }
}
