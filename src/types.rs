use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::error::CommandError;

/// Largest number of days an exchange command may cover
pub const MAX_DAYS: u64 = 10;

/// Currencies reported by the chat `exchange` command
pub const DEFAULT_CURRENCIES: &[&str] = &["USD", "EUR"];

/// Date format the upstream API expects and the report prints
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Timestamp format used in the command log
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A validated request for exchange rates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeQuery {
    days: u64,
    currencies: Vec<String>,
}

impl ExchangeQuery {
    pub fn new<I, S>(days: u64, currencies: I) -> Result<Self, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !(1..=MAX_DAYS).contains(&days) {
            return Err(CommandError::Range(days));
        }
        let mut codes: Vec<String> = Vec::new();
        for code in currencies {
            let code = code.as_ref().trim().to_uppercase();
            if !code.is_empty() && !codes.contains(&code) {
                codes.push(code);
            }
        }
        Ok(Self {
            days,
            currencies: codes,
        })
    }

    /// Query for the fixed chat-command currency set
    pub fn with_default_currencies(days: u64) -> Result<Self, CommandError> {
        Self::new(days, DEFAULT_CURRENCIES)
    }

    pub fn days(&self) -> u64 {
        self.days
    }

    pub fn currencies(&self) -> &[String] {
        &self.currencies
    }

    pub fn wants(&self, currency: &str) -> bool {
        self.currencies.iter().any(|c| c == currency)
    }

    /// `today` and the previous `days - 1` calendar days, most recent first
    pub fn dates_from(&self, today: NaiveDate) -> Vec<NaiveDate> {
        (0..self.days)
            .map(|back| today - Duration::days(back as i64))
            .collect()
    }
}

/// Sale and purchase rate for one currency on one day, as the upstream sent them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rate {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub sale: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub purchase: Decimal,
}

/// Currency code -> rate for a single day
pub type DateRate = BTreeMap<String, Rate>;

/// Rates for one requested day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRates {
    pub date: NaiveDate,
    pub rates: DateRate,
}

/// Per-day rates, most recent day first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeResult {
    pub days: Vec<DayRates>,
}

impl ExchangeResult {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Human-readable multi-line report broadcast to clients
    pub fn to_report(&self) -> String {
        let mut out = String::from("Exchange Rates:\n");
        for day in &self.days {
            let _ = writeln!(out, "Date: {}", day.date.format(DATE_FORMAT));
            for (currency, rate) in &day.rates {
                let _ = writeln!(
                    out,
                    "{} - Sale: {}, Purchase: {}",
                    currency, rate.sale, rate.purchase
                );
            }
            out.push('\n');
        }
        out
    }

    /// `[{"DD.MM.YYYY": {"USD": {"sale": .., "purchase": ..}}}, ...]`
    pub fn to_json(&self) -> serde_json::Value {
        let days = self
            .days
            .iter()
            .map(|day| {
                let mut entry = serde_json::Map::new();
                entry.insert(
                    day.date.format(DATE_FORMAT).to_string(),
                    serde_json::to_value(&day.rates).unwrap_or_default(),
                );
                serde_json::Value::Object(entry)
            })
            .collect();
        serde_json::Value::Array(days)
    }
}

// ============ Upstream API Types ============

/// Archive response for one date
#[derive(Debug, Clone, Deserialize)]
pub struct RatesPayload {
    #[serde(rename = "exchangeRate")]
    pub exchange_rate: Vec<RawRate>,
}

/// One currency record; the base-currency record carries no `currency`.
/// Numbers are decoded from their JSON text, so `44.0` keeps its scale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRate {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(
        rename = "saleRate",
        default,
        with = "rust_decimal::serde::arbitrary_precision_option"
    )]
    pub sale_rate: Option<Decimal>,
    #[serde(
        rename = "purchaseRate",
        default,
        with = "rust_decimal::serde::arbitrary_precision_option"
    )]
    pub purchase_rate: Option<Decimal>,
    #[serde(
        rename = "saleRateNB",
        default,
        with = "rust_decimal::serde::arbitrary_precision_option"
    )]
    pub sale_rate_nb: Option<Decimal>,
    #[serde(
        rename = "purchaseRateNB",
        default,
        with = "rust_decimal::serde::arbitrary_precision_option"
    )]
    pub purchase_rate_nb: Option<Decimal>,
}

impl RawRate {
    /// Retail rates, falling back to the reference rates
    pub fn to_rate(&self) -> Option<Rate> {
        Some(Rate {
            sale: self.sale_rate.or(self.sale_rate_nb)?,
            purchase: self.purchase_rate.or(self.purchase_rate_nb)?,
        })
    }
}
