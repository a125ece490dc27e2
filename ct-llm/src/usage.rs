use crate::completion::default_http_client;
use crate::error::{Result, error_from_response};
use crate::types::MonthUsage;
use chrono::Datelike;
use serde::Deserialize;

const OPENAI_BILLING_USAGE_URL: &str = "https://api.openai.com/dashboard/billing/usage";

/// Billing-usage query for the current calendar month.
#[derive(Clone)]
pub struct UsageReporter {
    http: reqwest::Client,
    api_key: String,
    url: String,
}

impl UsageReporter {
    pub fn new(api_key: &str) -> Self {
        Self {
            http: default_http_client(),
            api_key: api_key.to_string(),
            url: OPENAI_BILLING_USAGE_URL.to_string(),
        }
    }

    /// Point the reporter at a different billing endpoint.
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    #[tracing::instrument(level = "info", skip_all)]
    pub async fn get_month_usage(&self) -> Result<MonthUsage> {
        let today = chrono::Local::now().date_naive();
        let (year, month) = (today.year(), today.month());
        let (start_date, end_date) = month_window(year, month);

        tracing::debug!(%start_date, %end_date, "querying month usage");

        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("start_date", start_date.as_str()),
                ("end_date", end_date.as_str()),
            ])
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }

        let parsed: UsageBody = serde_json::from_str(&body)?;
        let usage = MonthUsage {
            // Reported in hundredths of a currency unit.
            usage_usd: parsed.total_usage / 100.0,
            year,
            month,
        };

        tracing::debug!(usage_usd = usage.usage_usd, year, month, "month usage");

        Ok(usage)
    }
}

/// First day of the given month and of the following month, rolling the year
/// over for December. Month numbers are not zero-padded; that is the format
/// the billing endpoint accepts.
fn month_window(year: i32, month: u32) -> (String, String) {
    let start = format!("{year}-{month}-01");
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = format!("{next_year}-{next_month}-01");
    (start, end)
}

#[derive(Debug, Deserialize)]
struct UsageBody {
    #[serde(default)]
    total_usage: f64,
}
