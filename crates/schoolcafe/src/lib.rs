//! SchoolCafe menu API client.

use std::time::Duration;

use async_trait::async_trait;
use lunchline_menu::{FetchError, Menu, MenuQuery, MenuSource};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str =
    "https://webapis.schoolcafe.com/api/CalendarView/GetDailyMenuitemsByGrade";

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Fetches daily menus by grade. One request per call, no retries.
#[derive(Clone)]
pub struct SchoolCafeClient {
    base_url: String,
    client: reqwest::Client,
}

impl SchoolCafeClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    fn query_params(query: &MenuQuery) -> [(&'static str, &str); 6] {
        [
            ("SchoolId", query.school_id.as_str()),
            ("ServingDate", query.serving_date.as_str()),
            ("ServingLine", query.serving_line.as_str()),
            ("MealType", query.meal_type.as_str()),
            ("Grade", query.grade.as_str()),
            ("PersonId", "null"),
        ]
    }
}

#[async_trait]
impl MenuSource for SchoolCafeClient {
    #[tracing::instrument(
        skip_all,
        fields(date = %query.serving_date, grade = %query.grade, line = %query.serving_line)
    )]
    async fn fetch(&self, query: &MenuQuery) -> Result<Menu, FetchError> {
        tracing::info!("Fetching menu data");

        let response = self
            .client
            .get(&self.base_url)
            .query(&Self::query_params(query))
            .header("accept", "application/json, text/plain, */*")
            .header("accept-language", "en-US,en;q=0.9")
            .header("origin", "https://www.schoolcafe.com")
            .header("referer", "https://www.schoolcafe.com/")
            .send()
            .await
            .map_err(|e| {
                tracing::error!(err = %e, "menu request failed");
                FetchError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "menu API returned an error status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.json::<serde_json::Value>().await.map_err(|e| {
            tracing::error!(err = %e, "menu response is not valid JSON");
            FetchError::Decode(e.to_string())
        })?;

        let menu = Menu::from_json(body)?;

        if menu.is_empty() {
            tracing::info!("Empty menu received, likely weekend or holiday");
        } else {
            tracing::info!(categories = menu.category_count(), "Fetched menu data");
        }

        Ok(menu)
    }
}
