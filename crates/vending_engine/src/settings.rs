use std::time::Duration;

use rust_decimal::Decimal;
use vending_core::{AppState, PriceTable, GRACE_DELAY};

use crate::HttpPriceSettings;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub poll_interval: Duration,
    pub grace_delay: Duration,
    pub gumballs_per_token: Decimal,
    pub member_cards_per_token: Decimal,
    pub gc_token_resource: String,
    pub member_card_resource: String,
    pub xrd_resource: String,
    /// Poll this endpoint instead of the built-in sugar oracle.
    pub price_http: Option<HttpPriceSettings>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            grace_delay: GRACE_DELAY,
            gumballs_per_token: Decimal::ONE,
            member_cards_per_token: Decimal::new(1, 1),
            gc_token_resource: "resource_gumball_club_tokens".to_string(),
            member_card_resource: "resource_gumball_club_member_card".to_string(),
            xrd_resource: "resource_xrd".to_string(),
            price_http: None,
        }
    }
}

impl EngineSettings {
    pub fn price_table(&self) -> PriceTable {
        PriceTable::new(self.gumballs_per_token, self.member_cards_per_token)
    }

    pub fn initial_state(&self) -> AppState {
        AppState::with_grace_delay(self.grace_delay)
    }
}
