//! Zone and forecast types, public and upstream-facing.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// A forecast zone from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// NWS zone identifier, e.g. `WAZ315`.
    pub key: String,
    pub name: String,
    pub state: String,
    pub observation_stations: Vec<String>,
}

/// One forecast period for a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub number: u32,
    pub name: String,
    pub start_time: Option<DateTime<FixedOffset>>,
    pub end_time: Option<DateTime<FixedOffset>>,
    pub is_daytime: Option<bool>,
    pub temperature: Option<f64>,
    pub temperature_unit: Option<String>,
    pub short_forecast: Option<String>,
    pub detailed_forecast: String,
    pub wind_speed: Option<String>,
    pub wind_direction: Option<String>,
}

// ── Zone document (GeoJSON FeatureCollection) ─────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ZoneCollection {
    #[serde(default)]
    pub features: Vec<ZoneFeature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ZoneFeature {
    pub properties: ZoneProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ZoneProperties {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub observation_stations: Vec<String>,
}

impl From<ZoneProperties> for Zone {
    fn from(p: ZoneProperties) -> Self {
        Self {
            key: p.id,
            name: p.name,
            state: p.state.unwrap_or_default(),
            observation_stations: p.observation_stations,
        }
    }
}

// ── Forecast response from `/zones/forecast/{id}/forecast` ───────────

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: ForecastProperties,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ForecastProperties {
    #[serde(default, deserialize_with = "null_as_default")]
    pub periods: Vec<ForecastPeriod>,
}

/// Absent and `null` both mean "nothing here".
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ForecastPeriod {
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub end_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub is_daytime: Option<bool>,
    #[serde(default)]
    pub temperature: Option<Measure>,
    #[serde(default)]
    pub temperature_unit: Option<String>,
    #[serde(default)]
    pub short_forecast: Option<String>,
    #[serde(default)]
    pub detailed_forecast: String,
    #[serde(default)]
    pub wind_speed: Option<Measure>,
    #[serde(default)]
    pub wind_direction: Option<String>,
}

/// Either a bare value or an NWS QuantitativeValue object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Measure {
    Number(f64),
    Text(String),
    Quantity {
        value: Option<f64>,
        #[serde(rename = "unitCode", default)]
        unit_code: String,
    },
}

impl Measure {
    fn as_number(&self) -> Option<f64> {
        match self {
            Measure::Number(n) => Some(*n),
            Measure::Text(s) => s.trim().parse().ok(),
            Measure::Quantity { value, .. } => *value,
        }
    }

    fn to_text(&self) -> Option<String> {
        match self {
            Measure::Number(n) => Some(n.to_string()),
            Measure::Text(s) => Some(s.clone()),
            Measure::Quantity { value, unit_code } => {
                let unit = unit_code.rsplit(':').next().unwrap_or_default();
                value.map(|v| format!("{} {}", v, unit).trim_end().to_string())
            }
        }
    }

    /// Unit suffix of a QuantitativeValue, e.g. `wmoUnit:degC` -> `degC`.
    fn unit(&self) -> Option<&str> {
        match self {
            Measure::Quantity { unit_code, .. } if !unit_code.is_empty() => {
                unit_code.rsplit(':').next()
            }
            _ => None,
        }
    }
}

impl From<ForecastPeriod> for Forecast {
    fn from(p: ForecastPeriod) -> Self {
        let temperature_unit = p.temperature_unit.or_else(|| {
            p.temperature
                .as_ref()
                .and_then(Measure::unit)
                .map(|unit| match unit {
                    "degC" => "C".to_string(),
                    "degF" => "F".to_string(),
                    other => other.to_string(),
                })
        });

        Self {
            number: p.number,
            name: p.name,
            start_time: p.start_time,
            end_time: p.end_time,
            is_daytime: p.is_daytime,
            temperature: p.temperature.as_ref().and_then(Measure::as_number),
            temperature_unit,
            short_forecast: p.short_forecast,
            detailed_forecast: p.detailed_forecast,
            wind_speed: p.wind_speed.as_ref().and_then(Measure::to_text),
            wind_direction: p.wind_direction,
        }
    }
}
