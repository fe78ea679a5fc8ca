use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn is_celsius(&self) -> bool {
        matches!(self, Self::Celsius)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    pub fn format(&self, temp_c: f64) -> String {
        format_temperature(temp_c, self.is_celsius())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a Celsius reading with one decimal, converting to Fahrenheit on request.
pub fn format_temperature(temp_c: f64, use_celsius: bool) -> String {
    if use_celsius {
        format!("{temp_c:.1}°C")
    } else {
        let temp_f = temp_c * 9.0 / 5.0 + 32.0;
        format!("{temp_f:.1}°F")
    }
}
