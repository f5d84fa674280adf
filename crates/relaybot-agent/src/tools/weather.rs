//! Weather tool — current conditions for a named city.
//!
//! Talks to a weatherapi.com-compatible `current.json` endpoint. The tool
//! is only registered when an API key is configured.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::base::Tool;

const DEFAULT_API_BASE: &str = "https://api.weatherapi.com/v1";

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    location: Location,
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
    humidity: f64,
    wind_kph: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

/// Looks up current weather. Input is a city name.
pub struct WeatherTool {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl WeatherTool {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point at a different endpoint (used by tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a city. Input is the city name, e.g. 'Berlin'."
    }

    async fn invoke(&self, input: &str) -> anyhow::Result<String> {
        let city = input.trim();
        if city.is_empty() {
            anyhow::bail!("input must be a city name");
        }

        debug!(city = %city, "weather lookup");

        let url = format!("{}/current.json", self.api_base.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("weather request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("weather service returned {status}");
        }

        let parsed: WeatherResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("malformed weather response: {e}"))?;

        Ok(format!(
            "Weather in {}, {}: {}, {}°C, humidity {}%, wind {} km/h",
            parsed.location.name,
            parsed.location.country,
            parsed.current.condition.text,
            parsed.current.temp_c,
            parsed.current.humidity,
            parsed.current.wind_kph,
        ))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_reports_current_conditions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current.json"))
            .and(query_param("key", "k-test"))
            .and(query_param("q", "Berlin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "location": {"name": "Berlin", "country": "Germany"},
                "current": {
                    "temp_c": 18.5,
                    "humidity": 60.0,
                    "wind_kph": 12.0,
                    "condition": {"text": "Partly cloudy"}
                }
            })))
            .mount(&server)
            .await;

        let tool = WeatherTool::new("k-test").with_api_base(server.uri());
        let out = tool.invoke("Berlin").await.unwrap();

        assert!(out.contains("Berlin, Germany"));
        assert!(out.contains("Partly cloudy"));
        assert!(out.contains("18.5°C"));
    }

    #[tokio::test]
    async fn test_service_error_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let tool = WeatherTool::new("k-test").with_api_base(server.uri());
        let err = tool.invoke("Nowhere").await.unwrap_err();
        assert!(err.to_string().contains("weather service returned"));
    }

    #[tokio::test]
    async fn test_empty_city_is_error() {
        let tool = WeatherTool::new("k-test");
        let err = tool.invoke("   ").await.unwrap_err();
        assert!(err.to_string().contains("city name"));
    }
}
