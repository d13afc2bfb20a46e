// Recommendation domain models
use serde::{Deserialize, Serialize};

/// Narrative recommendation text for a city, as produced by the
/// recommendation backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(alias = "ciudad", default)]
    pub city: String,
    #[serde(alias = "recomendaciones", alias = "recomendacion", default)]
    pub text: String,
}

impl Recommendation {
    pub fn main_points(&self) -> Vec<String> {
        main_points(&self.text)
    }
}

/// Pollutant-focused analysis for a city.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollutantAnalysis {
    #[serde(alias = "ciudad", default)]
    pub city: String,
    #[serde(alias = "analisis", default)]
    pub analysis: String,
    #[serde(alias = "contaminante_principal", default)]
    pub dominant_pollutant: Option<String>,
}

/// Pull the top bullet points out of a narrative recommendation. Alert
/// lines are excluded, trivially short fragments dropped, and at most three
/// points are kept.
pub fn main_points(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.contains('•') && !line.contains('⚠') && !line.contains('🚨'))
        .map(|line| line.replace('•', "").trim().to_string())
        .filter(|point| point.len() > 10)
        .take(3)
        .collect()
}
