use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// One row of the market listing.
///
/// Values are immutable; a refresh replaces the whole collection instead of
/// touching individual entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MarketEntryPayload")]
pub struct MarketEntry {
    id: String,
    symbol: String,
    name: String,
    #[serde(rename = "image")]
    image_url: String,
    current_price: f64,
    #[serde(rename = "price_change_percentage_24h")]
    price_change_percent_24h: f64,
    market_cap: f64,
}

impl MarketEntry {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        image_url: impl Into<String>,
        current_price: f64,
        price_change_percent_24h: f64,
        market_cap: f64,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "id" });
        }
        validate_non_negative("current_price", current_price)?;
        validate_finite("price_change_percentage_24h", price_change_percent_24h)?;
        validate_non_negative("market_cap", market_cap)?;

        Ok(Self {
            id,
            symbol: symbol.into(),
            name: name.into(),
            image_url: image_url.into(),
            current_price,
            price_change_percent_24h,
            market_cap,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub const fn current_price(&self) -> f64 {
        self.current_price
    }

    pub const fn price_change_percent_24h(&self) -> f64 {
        self.price_change_percent_24h
    }

    pub const fn market_cap(&self) -> f64 {
        self.market_cap
    }
}

/// Wire shape of a `/coins/markets` row. Numeric nulls decode as zero.
#[derive(Debug, Deserialize)]
struct MarketEntryPayload {
    id: String,
    symbol: String,
    name: String,
    image: String,
    #[serde(default)]
    current_price: Option<f64>,
    #[serde(default)]
    price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    market_cap: Option<f64>,
}

impl TryFrom<MarketEntryPayload> for MarketEntry {
    type Error = ValidationError;

    fn try_from(payload: MarketEntryPayload) -> Result<Self, Self::Error> {
        Self::new(
            payload.id,
            payload.symbol,
            payload.name,
            payload.image,
            payload.current_price.unwrap_or_default(),
            payload.price_change_percentage_24h.unwrap_or_default(),
            payload.market_cap.unwrap_or_default(),
        )
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
