//! Upstream exchange-rate access and the concurrent per-day fetch

use crate::error::UpstreamError;
use crate::types::{DateRate, DayRates, ExchangeQuery, ExchangeResult, RatesPayload, DATE_FORMAT};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use futures_util::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;

pub const PRIVATBANK_ARCHIVE_URL: &str = "https://api.privatbank.ua/p24api/exchange_rates";

/// A source of daily exchange-rate payloads
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_day(&self, date: NaiveDate) -> Result<RatesPayload, UpstreamError>;
}

/// PrivatBank archive API client
#[derive(Clone)]
pub struct PrivatBankClient {
    http: reqwest::Client,
    base_url: String,
}

impl PrivatBankClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.into(),
        })
    }

    pub fn request_url(&self, date: NaiveDate) -> String {
        format!("{}?json&date={}", self.base_url, date.format(DATE_FORMAT))
    }
}

#[async_trait]
impl RateSource for PrivatBankClient {
    async fn fetch_day(&self, date: NaiveDate) -> Result<RatesPayload, UpstreamError> {
        let label = date.format(DATE_FORMAT).to_string();
        let url = self.request_url(date);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| UpstreamError::Request {
                date: label.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                date: label,
                status: status.as_u16(),
            });
        }

        response
            .json::<RatesPayload>()
            .await
            .map_err(|e| UpstreamError::Malformed {
                date: label,
                reason: e.to_string(),
            })
    }
}

/// Keep only the requested currencies, resolving reference-rate fallbacks.
///
/// Records with no `currency`, or with neither a retail nor a reference value
/// for sale or purchase, are skipped.
pub fn reduce_payload(payload: &RatesPayload, query: &ExchangeQuery) -> DateRate {
    payload
        .exchange_rate
        .iter()
        .filter_map(|raw| {
            let currency = raw.currency.as_deref()?;
            if !query.wants(currency) {
                return None;
            }
            let rate = raw.to_rate();
            if rate.is_none() {
                tracing::debug!("Skipping {}: no sale/purchase values", currency);
            }
            Some((currency.to_string(), rate?))
        })
        .collect()
}

/// Fans out one request per day and gathers the reduced results in date order
#[derive(Clone)]
pub struct RateFetcher {
    source: Arc<dyn RateSource>,
}

impl RateFetcher {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self { source }
    }

    pub async fn fetch(&self, query: &ExchangeQuery) -> Result<ExchangeResult, UpstreamError> {
        self.fetch_from(query, Local::now().date_naive()).await
    }

    /// Fetch counting back from an explicit `today`.
    ///
    /// The first failing day fails the whole batch; no partial result is returned.
    pub async fn fetch_from(
        &self,
        query: &ExchangeQuery,
        today: NaiveDate,
    ) -> Result<ExchangeResult, UpstreamError> {
        let dates = query.dates_from(today);
        tracing::info!(
            "Fetching {} day(s) of rates for {:?}",
            dates.len(),
            query.currencies()
        );

        let payloads =
            try_join_all(dates.iter().map(|date| self.source.fetch_day(*date))).await?;

        let days = dates
            .into_iter()
            .zip(payloads.iter())
            .map(|(date, payload)| DayRates {
                date,
                rates: reduce_payload(payload, query),
            })
            .collect();

        Ok(ExchangeResult { days })
    }
}
