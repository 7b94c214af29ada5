use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /weather`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CreateWeatherRequest {
    pub date: String,
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CreatedWeather {
    pub id: String,
}

/// A lookup stored under its id. `weather` is the provider payload, untouched.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct WeatherRecord {
    pub date: String,
    pub location: String,
    pub notes: String,
    pub weather: Value,
}

impl WeatherRecord {
    pub fn new(request: CreateWeatherRequest, weather: Value) -> WeatherRecord {
        WeatherRecord {
            date: request.date,
            location: request.location,
            notes: request.notes,
            weather,
        }
    }
}

// `"notes": null` is accepted the same way as a missing field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
