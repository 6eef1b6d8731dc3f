use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use vending_logging::vending_trace;

use crate::PriceError;

#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    /// Resolves to a non-negative market price, or fails.
    async fn fetch_price(&self) -> Result<Decimal, PriceError>;
}

/// Seconds since the Unix epoch.
pub type UnixClock = Arc<dyn Fn() -> u64 + Send + Sync>;

const HALF_PERIOD_SECS: u64 = 1800;
const PEAK_PRICE: u64 = 5;

/// Simulated sugar market: a triangle wave that climbs from 0 to 5 over
/// thirty minutes and falls back over the next thirty, sampled on whole
/// minutes since the oracle started.
pub struct SugarOracle {
    started_at: u64,
    clock: UnixClock,
}

impl SugarOracle {
    pub fn new(clock: UnixClock) -> Self {
        let started_at = round_to_minute(clock());
        Self { started_at, clock }
    }

    pub fn price_at(elapsed_secs: u64) -> Decimal {
        let t = elapsed_secs % (2 * HALF_PERIOD_SECS);
        let price = if t < HALF_PERIOD_SECS {
            t * PEAK_PRICE / HALF_PERIOD_SECS
        } else {
            PEAK_PRICE - (t - HALF_PERIOD_SECS) * PEAK_PRICE / HALF_PERIOD_SECS
        };
        Decimal::from(price)
    }

    pub fn current_price(&self) -> Decimal {
        let now = round_to_minute((self.clock)());
        Self::price_at(now.saturating_sub(self.started_at))
    }
}

fn round_to_minute(secs: u64) -> u64 {
    secs - secs % 60
}

#[async_trait::async_trait]
impl PriceSource for SugarOracle {
    async fn fetch_price(&self) -> Result<Decimal, PriceError> {
        let price = self.current_price();
        vending_trace!("sugar oracle price {}", price);
        Ok(price)
    }
}

#[derive(Debug, Clone)]
pub struct HttpPriceSettings {
    pub url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl HttpPriceSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(8),
        }
    }
}

/// Reads the price from an HTTP endpoint answering either a bare decimal
/// (`2.5`) or a JSON object with a `price` field (`{"price": "2.5"}`).
#[derive(Debug, Clone)]
pub struct HttpPriceSource {
    settings: HttpPriceSettings,
    client: reqwest::Client,
}

impl HttpPriceSource {
    pub fn new(settings: HttpPriceSettings) -> Result<Self, PriceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| PriceError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl PriceSource for HttpPriceSource {
    async fn fetch_price(&self) -> Result<Decimal, PriceError> {
        let response = self
            .client
            .get(&self.settings.url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        parse_price(&body)
    }
}

pub(crate) fn parse_price(body: &str) -> Result<Decimal, PriceError> {
    let trimmed = body.trim();
    let price = match Decimal::from_str(trimmed) {
        Ok(price) => price,
        Err(_) => parse_json_price(trimmed)?,
    };
    if price < Decimal::ZERO {
        return Err(PriceError::Negative(price));
    }
    Ok(price)
}

fn parse_json_price(body: &str) -> Result<Decimal, PriceError> {
    let malformed = || PriceError::Malformed(body.chars().take(64).collect());
    let value: serde_json::Value = serde_json::from_str(body).map_err(|_| malformed())?;
    let raw = match value.get("price") {
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(serde_json::Value::Number(number)) => number.to_string(),
        _ => return Err(malformed()),
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| malformed())
}

fn map_reqwest_error(err: reqwest::Error) -> PriceError {
    if err.is_timeout() {
        return PriceError::Timeout;
    }
    PriceError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{parse_price, SugarOracle, UnixClock};
    use crate::PriceError;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn triangle_wave_endpoints() {
        assert_eq!(SugarOracle::price_at(0), Decimal::ZERO);
        assert_eq!(SugarOracle::price_at(360), Decimal::ONE);
        assert_eq!(SugarOracle::price_at(1799), Decimal::from(4));
        assert_eq!(SugarOracle::price_at(1800), Decimal::from(5));
        assert_eq!(SugarOracle::price_at(2700), Decimal::from(3));
        assert_eq!(SugarOracle::price_at(3599), Decimal::ONE);
        assert_eq!(SugarOracle::price_at(3600), Decimal::ZERO);
        assert_eq!(SugarOracle::price_at(3600 + 1800), Decimal::from(5));
    }

    #[test]
    fn oracle_samples_whole_minutes_since_start() {
        let now = Arc::new(AtomicU64::new(1_000_030));
        let handle = now.clone();
        let clock: UnixClock = Arc::new(move || handle.load(Ordering::SeqCst));
        let oracle = SugarOracle::new(clock);

        assert_eq!(oracle.current_price(), Decimal::ZERO);
        // The start rounds down too, so 355s after a mid-minute start is six whole minutes.
        now.store(1_000_030 + 355, Ordering::SeqCst);
        assert_eq!(oracle.current_price(), Decimal::ONE);
        now.store(1_000_030 + 1800, Ordering::SeqCst);
        assert_eq!(oracle.current_price(), Decimal::from(5));
    }

    #[test]
    fn parses_bare_and_json_prices() {
        assert_eq!(parse_price(" 2.5\n"), Ok(Decimal::new(25, 1)));
        assert_eq!(parse_price(r#"{"price":"1.75"}"#), Ok(Decimal::new(175, 2)));
        assert_eq!(parse_price(r#"{"price":3}"#), Ok(Decimal::from(3)));
    }

    #[test]
    fn rejects_negative_and_garbage() {
        assert_eq!(
            parse_price("-1"),
            Err(PriceError::Negative(Decimal::NEGATIVE_ONE))
        );
        assert!(matches!(
            parse_price("sugar"),
            Err(PriceError::Malformed(_))
        ));
        assert!(matches!(
            parse_price(r#"{"cost":"1"}"#),
            Err(PriceError::Malformed(_))
        ));
    }
}
