//! WMO weather interpretation codes and their display categories.
//!
//! See <https://open-meteo.com/en/docs#weathervariables>.

/// Translate a WMO weather code into its canonical English phrase.
///
/// Codes outside the table map to `"Unknown"`.
pub fn describe_weather_code(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Icon category for a condition phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionIcon {
    Sunny,
    PartlySunny,
    Rainy,
    Snow,
    Thunderstorm,
    Cloud,
    Wind,
}

impl ConditionIcon {
    /// Classify by case-insensitive keyword; the first matching rule wins.
    pub fn from_description(description: &str) -> Self {
        let lower = description.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if has(&["clear"]) {
            Self::Sunny
        } else if has(&["cloud", "overcast"]) {
            Self::PartlySunny
        } else if has(&["rain", "drizzle"]) {
            Self::Rainy
        } else if has(&["snow"]) {
            Self::Snow
        } else if has(&["thunder"]) {
            Self::Thunderstorm
        } else if has(&["fog", "mist"]) {
            Self::Cloud
        } else if has(&["wind"]) {
            Self::Wind
        } else {
            Self::PartlySunny
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::PartlySunny => "partly-sunny",
            Self::Rainy => "rainy",
            Self::Snow => "snow",
            Self::Thunderstorm => "thunderstorm",
            Self::Cloud => "cloud",
            Self::Wind => "wind",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Sunny => "☀",
            Self::PartlySunny => "⛅",
            Self::Rainy => "🌧",
            Self::Snow => "❄",
            Self::Thunderstorm => "⛈",
            Self::Cloud => "☁",
            Self::Wind => "🌬",
        }
    }
}
