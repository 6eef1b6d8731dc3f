use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::MachineKind;

/// Output multiplier applied when the buyer holds a member card.
pub const DISCOUNT_MULTIPLIER: Decimal = Decimal::TWO;

/// `floor(input_amount * unit_price * (2 if discount_eligible else 1))`.
///
/// Both amounts must be non-negative; a negative amount is a caller bug and
/// panics. Outputs that do not fit in a `u64` saturate.
pub fn quote(input_amount: Decimal, unit_price: Decimal, discount_eligible: bool) -> u64 {
    let multiplier = if discount_eligible {
        DISCOUNT_MULTIPLIER
    } else {
        Decimal::ONE
    };
    quote_with_multiplier(input_amount, unit_price, multiplier)
}

fn quote_with_multiplier(input_amount: Decimal, unit_price: Decimal, multiplier: Decimal) -> u64 {
    assert!(
        input_amount >= Decimal::ZERO,
        "input amount must be non-negative, got {input_amount}"
    );
    assert!(
        unit_price >= Decimal::ZERO,
        "unit price must be non-negative, got {unit_price}"
    );

    // Multiply before flooring so the discount doubles fractional output too.
    input_amount
        .checked_mul(unit_price)
        .and_then(|raw| raw.checked_mul(multiplier))
        .and_then(|raw| raw.floor().to_u64())
        .unwrap_or(u64::MAX)
}

/// Per-machine pricing: where the unit price comes from and whether the
/// member-card discount applies.
pub trait PricingRule {
    fn unit_price(&self, market_price: Decimal) -> Decimal;

    fn discount_applies(&self, member_card: bool) -> bool {
        member_card
    }

    fn quote(&self, input_amount: Decimal, market_price: Decimal, member_card: bool) -> u64 {
        quote(
            input_amount,
            self.unit_price(market_price),
            self.discount_applies(member_card),
        )
    }
}

/// Unit price follows the polled market price (candy bags).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketPricing;

impl PricingRule for MarketPricing {
    fn unit_price(&self, market_price: Decimal) -> Decimal {
        market_price
    }
}

/// Fixed number of output tokens per input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPricing {
    pub per_token: Decimal,
    pub discountable: bool,
}

impl PricingRule for FixedPricing {
    fn unit_price(&self, _market_price: Decimal) -> Decimal {
        self.per_token
    }

    fn discount_applies(&self, member_card: bool) -> bool {
        self.discountable && member_card
    }
}

/// Pricing for every machine that quotes an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTable {
    pub gumball: FixedPricing,
    pub candy: MarketPricing,
    pub member_card: FixedPricing,
}

impl PriceTable {
    pub fn new(gumballs_per_token: Decimal, member_cards_per_token: Decimal) -> Self {
        Self {
            gumball: FixedPricing {
                per_token: gumballs_per_token,
                discountable: true,
            },
            candy: MarketPricing,
            member_card: FixedPricing {
                per_token: member_cards_per_token,
                discountable: false,
            },
        }
    }

    pub fn rule(&self, kind: MachineKind) -> Option<&dyn PricingRule> {
        match kind {
            MachineKind::TokenDispenser => None,
            MachineKind::Gumball => Some(&self.gumball),
            MachineKind::Candy => Some(&self.candy),
            MachineKind::MemberCard => Some(&self.member_card),
        }
    }

    /// Output for `kind`, or `None` for machines without a quoted output.
    pub fn quote(
        &self,
        kind: MachineKind,
        input_amount: Decimal,
        market_price: Decimal,
        member_card: bool,
    ) -> Option<u64> {
        self.rule(kind)
            .map(|rule| rule.quote(input_amount, market_price, member_card))
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::new(Decimal::ONE, Decimal::new(1, 1))
    }
}
