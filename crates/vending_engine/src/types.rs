use rust_decimal::Decimal;
use vending_core::{InputError, MachineKind};

/// Why a price fetch produced no value. Never surfaced past the poller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("malformed price {0:?}")]
    Malformed(String),
    #[error("negative price {0}")]
    Negative(Decimal),
    #[error("price source unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by the transaction submitter. The payload is opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transaction rejected: {message}")]
pub struct SubmitError {
    pub message: String,
}

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("account refresh failed: {message}")]
pub struct AccountError {
    pub message: String,
}

impl AccountError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PurchaseError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub kind: MachineKind,
    pub account_address: String,
    pub input_amount: Decimal,
    /// Discount eligibility. `None` means "look it up from the account's holdings".
    pub member_card: Option<bool>,
}

impl PurchaseRequest {
    pub fn new(
        kind: MachineKind,
        account_address: impl Into<String>,
        input_amount: Decimal,
    ) -> Self {
        Self {
            kind,
            account_address: account_address.into(),
            input_amount,
            member_card: None,
        }
    }

    pub fn dispense(account_address: impl Into<String>) -> Self {
        Self::new(MachineKind::TokenDispenser, account_address, Decimal::ZERO)
    }

    pub fn with_member_card(mut self, member_card: bool) -> Self {
        self.member_card = Some(member_card);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOutcome {
    pub kind: MachineKind,
    pub account_address: String,
    pub output_value: Option<Decimal>,
}
