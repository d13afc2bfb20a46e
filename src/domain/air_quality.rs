// Air quality classification from PM2.5 concentrations
use serde::Serialize;

/// Severity category for a PM2.5 concentration. Variants are ordered from
/// least to most severe so comparisons follow severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AirQualityLevel {
    Good,
    Moderate,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Hazardous,
}

impl AirQualityLevel {
    pub fn label(&self) -> &'static str {
        match self {
            AirQualityLevel::Good => "Good",
            AirQualityLevel::Moderate => "Moderate",
            AirQualityLevel::Poor => "Poor",
            AirQualityLevel::VeryPoor => "Very Poor",
            AirQualityLevel::Hazardous => "Hazardous",
        }
    }

    /// Fixed display color (hex) for map markers and cards.
    pub fn display_color(&self) -> &'static str {
        match self {
            AirQualityLevel::Good => "#00E400",
            AirQualityLevel::Moderate => "#FFFF00",
            AirQualityLevel::Poor => "#FF7E00",
            AirQualityLevel::VeryPoor => "#FF0000",
            AirQualityLevel::Hazardous => "#8F3F97",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AirQualityLevel::Good => "Satisfactory air quality, minimal risk",
            AirQualityLevel::Moderate => "Acceptable quality, moderate risk for sensitive groups",
            AirQualityLevel::Poor => {
                "Health effects, sensitive groups should avoid outdoor activity"
            }
            AirQualityLevel::VeryPoor => {
                "Serious health effects, everyone should avoid outdoor activity"
            }
            AirQualityLevel::Hazardous => "Health alert, emergency conditions",
        }
    }

    /// Display glyph for compact UI elements.
    pub fn icon(&self) -> &'static str {
        match self {
            AirQualityLevel::Good => "🌤️",
            AirQualityLevel::Moderate => "⚠️",
            AirQualityLevel::Poor => "🚨",
            AirQualityLevel::VeryPoor => "💀",
            AirQualityLevel::Hazardous => "🔥",
        }
    }
}

/// Derived classification attached to every canonical reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: AirQualityLevel,
    pub display_color: &'static str,
    pub description: &'static str,
}

/// Classify a PM2.5 concentration (µg/m³).
///
/// Upper bounds are inclusive on the lower tier: 12 is still Good, 12.01 is
/// Moderate. Negative or non-finite input is clamped to 0; upstream data
/// quality is not guaranteed and the UI must never block on it.
pub fn classify(pm25: f64) -> Classification {
    let pm25 = if pm25.is_finite() { pm25.max(0.0) } else { 0.0 };

    let category = if pm25 <= 12.0 {
        AirQualityLevel::Good
    } else if pm25 <= 35.0 {
        AirQualityLevel::Moderate
    } else if pm25 <= 55.0 {
        AirQualityLevel::Poor
    } else if pm25 <= 150.0 {
        AirQualityLevel::VeryPoor
    } else {
        AirQualityLevel::Hazardous
    };

    Classification {
        category,
        display_color: category.display_color(),
        description: category.description(),
    }
}

/// Inverted 0-150 scale for progress bars: lower PM2.5 means a higher
/// quality percentage.
pub fn quality_percent(pm25: f64) -> u8 {
    let pm25 = if pm25.is_finite() { pm25.max(0.0) } else { 0.0 };
    let percent = (100.0 - (pm25 / 150.0) * 100.0).max(0.0);
    percent.round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive_on_the_lower_tier() {
        assert_eq!(classify(12.0).category, AirQualityLevel::Good);
        assert_eq!(classify(12.01).category, AirQualityLevel::Moderate);
        assert_eq!(classify(35.0).category, AirQualityLevel::Moderate);
        assert_eq!(classify(55.0).category, AirQualityLevel::Poor);
        assert_eq!(classify(150.0).category, AirQualityLevel::VeryPoor);
        assert_eq!(classify(150.1).category, AirQualityLevel::Hazardous);
    }

    #[test]
    fn severity_is_monotonic_in_pm25() {
        let mut previous = classify(0.0).category;
        for step in 1..=400 {
            let category = classify(step as f64 * 0.5).category;
            assert!(category >= previous);
            previous = category;
        }
    }

    #[test]
    fn boundary_classification_is_stable() {
        for boundary in [12.0, 35.0, 55.0, 150.0] {
            assert_eq!(classify(boundary), classify(boundary));
        }
    }

    #[test]
    fn bad_input_is_clamped_to_zero() {
        assert_eq!(classify(-4.0).category, AirQualityLevel::Good);
        assert_eq!(classify(f64::NAN).category, AirQualityLevel::Good);
        assert_eq!(classify(f64::NEG_INFINITY).category, AirQualityLevel::Good);
    }

    #[test]
    fn colors_match_categories() {
        assert_eq!(classify(5.0).display_color, "#00E400");
        assert_eq!(classify(20.0).display_color, "#FFFF00");
        assert_eq!(classify(40.0).display_color, "#FF7E00");
        assert_eq!(classify(100.0).display_color, "#FF0000");
        assert_eq!(classify(200.0).display_color, "#8F3F97");
    }

    #[test]
    fn quality_percent_inverts_the_scale() {
        assert_eq!(quality_percent(0.0), 100);
        assert_eq!(quality_percent(75.0), 50);
        assert_eq!(quality_percent(150.0), 0);
        assert_eq!(quality_percent(300.0), 0);
        assert_eq!(quality_percent(-10.0), 100);
    }
}
