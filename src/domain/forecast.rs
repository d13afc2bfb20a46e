// Forecast domain models and derived insights
use serde::{Deserialize, Serialize};

/// Day-over-day direction of the PM2.5 trend. The API reports arrows; we
/// accept those plus plain words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Trend {
    Rising,
    Falling,
    #[default]
    Stable,
}

impl From<String> for Trend {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "↑" | "up" | "sube" => Trend::Rising,
            "↓" | "down" | "baja" => Trend::Falling,
            _ => Trend::Stable,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyTrend {
    #[serde(alias = "dia", default)]
    pub day: String,
    #[serde(default)]
    pub pm25: f64,
    #[serde(alias = "tendencia", default)]
    pub trend: Trend,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastSummary {
    #[serde(alias = "diasBuenos", default)]
    pub good_days: u32,
    #[serde(alias = "diasModerados", default)]
    pub moderate_days: u32,
    #[serde(alias = "diasPobres", default)]
    pub poor_days: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourlyForecast {
    #[serde(alias = "hora", default)]
    pub hour: String,
    #[serde(default)]
    pub pm25: f64,
    #[serde(alias = "categoria", default)]
    pub category: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklyForecast {
    #[serde(alias = "tendenciaSemanal", default)]
    pub daily: Vec<DailyTrend>,
    #[serde(alias = "resumen", default)]
    pub summary: Option<ForecastSummary>,
    #[serde(alias = "confianza", default)]
    pub confidence: String,
    #[serde(alias = "prediccionHoraria", default)]
    pub hourly: Vec<HourlyForecast>,
}

/// Short-horizon forecast from the quick endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuickForecast {
    #[serde(alias = "proximasHoras", default)]
    pub hours: Vec<HourlyForecast>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyPattern {
    #[serde(alias = "mes", default)]
    pub month: String,
    #[serde(alias = "promedio_pm25", alias = "pm25Promedio", default)]
    pub average_pm25: f64,
}

/// Historical pattern summary from the patterns endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternSummary {
    #[serde(alias = "patrones", default)]
    pub months: Vec<MonthlyPattern>,
}

fn is_poor_category(category: &str) -> bool {
    matches!(category, "Pobre" | "Muy Pobre" | "Poor" | "Very Poor")
}

/// Derive short advisory lines from a weekly forecast. Falls back to a
/// stock set when nothing noteworthy applies, so the panel is never empty.
pub fn insights(forecast: &WeeklyForecast) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(summary) = &forecast.summary {
        if summary.poor_days > 0 {
            lines.push(format!(
                "Expect {} day(s) with poor air quality",
                summary.poor_days
            ));
        }
        if summary.moderate_days > 3 {
            lines.push("Mostly moderate days ahead - consider indoor activities".to_string());
        }
        if summary.good_days > 4 {
            lines.push("A favorable week for outdoor activities".to_string());
        }
    }

    if forecast.hourly.iter().any(|h| is_poor_category(&h.category)) {
        lines.push("Avoid outdoor activity during peak pollution hours".to_string());
    }

    let rising = forecast.daily.iter().filter(|d| d.trend == Trend::Rising).count();
    let falling = forecast.daily.iter().filter(|d| d.trend == Trend::Falling).count();
    if falling > rising {
        lines.push("Air quality is trending better overall".to_string());
    } else if rising > falling {
        lines.push("Air quality is trending worse - take precautions".to_string());
    }

    if lines.is_empty() {
        lines = vec![
            "Stable conditions over the coming days".to_string(),
            "Pollution levels within normal ranges".to_string(),
            "A good time for outdoor activities".to_string(),
        ];
    }

    lines
}
