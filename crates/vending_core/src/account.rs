use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenBalance {
    pub value: Decimal,
}

/// Account snapshot as supplied by the account provider.
///
/// Matches the provider's JSON shape:
/// `{ "address": "...", "fungibleTokens": { "<resource>": { "value": "1.5" } } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub address: String,
    #[serde(default)]
    pub fungible_tokens: BTreeMap<String, TokenBalance>,
}

impl Account {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            fungible_tokens: BTreeMap::new(),
        }
    }

    pub fn with_balance(mut self, resource: impl Into<String>, value: Decimal) -> Self {
        self.fungible_tokens
            .insert(resource.into(), TokenBalance { value });
        self
    }

    /// Balance of `resource`, zero when the account holds none.
    pub fn balance(&self, resource: &str) -> Decimal {
        self.fungible_tokens
            .get(resource)
            .map(|token| token.value)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn holds(&self, resource: &str) -> bool {
        self.balance(resource) > Decimal::ZERO
    }
}

pub fn find_account<'a>(accounts: &'a [Account], address: &str) -> Option<&'a Account> {
    accounts.iter().find(|account| account.address == address)
}

/// True when any account holds a positive balance of `resource`.
pub fn has_fungible_tokens(accounts: &[Account], resource: &str) -> bool {
    accounts.iter().any(|account| account.holds(resource))
}

pub fn has_member_card(accounts: &[Account], member_card_resource: &str) -> bool {
    has_fungible_tokens(accounts, member_card_resource)
}

#[cfg(test)]
mod tests {
    use super::{find_account, has_fungible_tokens, Account};
    use rust_decimal::Decimal;

    #[test]
    fn missing_resource_has_zero_balance() {
        let account = Account::new("account_a");
        assert_eq!(account.balance("resource_gc"), Decimal::ZERO);
        assert!(!account.holds("resource_gc"));
    }

    #[test]
    fn zero_balance_does_not_count_as_holding() {
        let accounts = vec![
            Account::new("account_a").with_balance("resource_gc", Decimal::ZERO),
            Account::new("account_b"),
        ];
        assert!(!has_fungible_tokens(&accounts, "resource_gc"));
    }

    #[test]
    fn find_account_matches_exact_address() {
        let accounts = vec![Account::new("account_a"), Account::new("account_b")];
        assert_eq!(
            find_account(&accounts, "account_b").map(|a| a.address.as_str()),
            Some("account_b")
        );
        assert!(find_account(&accounts, "account_c").is_none());
    }
}
