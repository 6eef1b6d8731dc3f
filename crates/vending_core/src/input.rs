use rust_decimal::Decimal;

use crate::{find_account, Account};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown account {address}")]
    UnknownAccount { address: String },
    #[error("amount must be greater than zero")]
    ZeroAmount,
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },
}

/// Checks a purchase amount against the selected account's balance of the
/// input token.
///
/// Negative amounts are a caller bug (the amount field has a floor of zero)
/// and panic instead of producing an error.
pub fn validate_input(
    accounts: &[Account],
    address: &str,
    input_resource: &str,
    amount: Decimal,
) -> Result<(), InputError> {
    assert!(
        amount >= Decimal::ZERO,
        "purchase amount must be non-negative, got {amount}"
    );

    let account = find_account(accounts, address).ok_or_else(|| InputError::UnknownAccount {
        address: address.to_string(),
    })?;

    if amount.is_zero() {
        return Err(InputError::ZeroAmount);
    }

    let available = account.balance(input_resource);
    if amount > available {
        return Err(InputError::InsufficientBalance {
            requested: amount,
            available,
        });
    }
    Ok(())
}
