//! Condition classification for theming.
//!
//! Three independent tables map the English condition text to a display
//! label, a background gradient and an icon. Each is an ordered list of
//! `(patterns, value)` rules evaluated case-insensitively, first match wins.
//! The tables do not share bucket boundaries.

use serde::{Deserialize, Serialize};

struct Rule<T> {
    patterns: &'static [&'static str],
    value: T,
}

fn first_match<T: Copy>(rules: &[Rule<T>], condition: &str) -> Option<T> {
    let lowered = condition.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| lowered.contains(p)))
        .map(|rule| rule.value)
}

/// Coarse condition category used for icons and card backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConditionBucket {
    Sunny,
    Rain,
    Cloud,
    Mist,
    #[default]
    Default,
}

const BUCKET_RULES: &[Rule<ConditionBucket>] = &[
    Rule { patterns: &["sunny", "clear"], value: ConditionBucket::Sunny },
    Rule { patterns: &["rain", "drizzle"], value: ConditionBucket::Rain },
    Rule { patterns: &["cloud", "overcast"], value: ConditionBucket::Cloud },
    Rule { patterns: &["mist", "fog"], value: ConditionBucket::Mist },
];

impl ConditionBucket {
    pub fn classify(condition: &str) -> Self {
        first_match(BUCKET_RULES, condition).unwrap_or_default()
    }

    /// Background image asset for the weather card.
    pub fn background(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny_weather",
            Self::Rain => "rainy_weather",
            Self::Cloud => "cloudy_weather",
            Self::Mist => "mist_weather",
            Self::Default => "default_weather",
        }
    }
}

/// Two-stop vertical gradient, colors as ARGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gradient {
    pub top: u32,
    pub bottom: u32,
}

impl Gradient {
    pub const SUNNY: Self = Self { top: 0xFF4A_90E2, bottom: 0xFF50_C9C3 };
    pub const RAIN: Self = Self { top: 0xFF5F_7D8E, bottom: 0xFF8B_A3B1 };
    pub const CLOUD: Self = Self { top: 0xFF7B_92A8, bottom: 0xFFA8_C0D8 };
    pub const MIST: Self = Self { top: 0xFF8C_98A9, bottom: 0xFFB0_BEC5 };
    pub const DEFAULT: Self = Self { top: 0xFF66_7EEA, bottom: 0xFF76_4BA2 };

    /// `#RRGGBB` for each stop, alpha dropped.
    pub fn to_hex(&self) -> (String, String) {
        (rgb_hex(self.top), rgb_hex(self.bottom))
    }
}

fn rgb_hex(argb: u32) -> String {
    format!("#{:06X}", argb & 0x00FF_FFFF)
}

// "partly cloudy" keeps the default gradient even though the label table
// calls it 多云.
const GRADIENT_RULES: &[Rule<Gradient>] = &[
    Rule { patterns: &["partly cloudy"], value: Gradient::DEFAULT },
    Rule { patterns: &["sunny", "clear"], value: Gradient::SUNNY },
    Rule { patterns: &["rain", "drizzle"], value: Gradient::RAIN },
    Rule { patterns: &["cloud", "overcast"], value: Gradient::CLOUD },
    Rule { patterns: &["mist", "fog"], value: Gradient::MIST },
];

pub fn gradient_for(condition: &str) -> Gradient {
    first_match(GRADIENT_RULES, condition).unwrap_or(Gradient::DEFAULT)
}

/// Material icon shown next to the temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherIcon {
    WbSunny,
    BeachAccess,
    Cloud,
    BlurOn,
}

impl WeatherIcon {
    pub fn name(&self) -> &'static str {
        match self {
            Self::WbSunny => "wb_sunny",
            Self::BeachAccess => "beach_access",
            Self::Cloud => "cloud",
            Self::BlurOn => "blur_on",
        }
    }
}

// Icons follow the plain bucket, so "partly cloudy" gets the cloud icon while
// its gradient stays default.
pub fn icon_for(condition: &str) -> WeatherIcon {
    match ConditionBucket::classify(condition) {
        ConditionBucket::Sunny | ConditionBucket::Default => WeatherIcon::WbSunny,
        ConditionBucket::Rain => WeatherIcon::BeachAccess,
        ConditionBucket::Cloud => WeatherIcon::Cloud,
        ConditionBucket::Mist => WeatherIcon::BlurOn,
    }
}

const LABEL_RULES: &[Rule<&'static str>] = &[
    Rule { patterns: &["sunny"], value: "晴天" },
    Rule { patterns: &["clear"], value: "晴朗" },
    Rule { patterns: &["partly cloudy"], value: "多云" },
    Rule { patterns: &["cloudy", "overcast"], value: "阴天" },
    Rule { patterns: &["rain"], value: "下雨" },
    Rule { patterns: &["drizzle"], value: "小雨" },
    Rule { patterns: &["mist"], value: "薄雾" },
    Rule { patterns: &["fog"], value: "大雾" },
];

/// Chinese label for a condition; unknown conditions pass through unchanged.
pub fn display_condition(condition: &str) -> String {
    first_match(LABEL_RULES, condition)
        .map(str::to_string)
        .unwrap_or_else(|| condition.to_string())
}
