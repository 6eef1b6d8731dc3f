use std::sync::Mutex;

use rust_decimal::Decimal;
use tokio::sync::watch;
use vending_core::{Account, MachineKind, PriceTable};
use vending_engine::{
    AccountError, AccountProvider, EngineSettings, PurchaseRequest, SubmitError,
    TransactionSubmitter,
};
use vending_logging::vending_debug;

pub(crate) const GUMBALL_RESOURCE: &str = "resource_gumball";
pub(crate) const CANDY_RESOURCE: &str = "resource_candy";

/// GC tokens handed out per dispenser use.
const DISPENSE_AMOUNT: Decimal = Decimal::TEN;

/// In-process stand-in for the ledger and its gateway.
///
/// Submissions settle immediately on the ledger side, but `accounts()` keeps
/// returning the old snapshot until `refresh()` is called, like a wallet
/// gateway that has to be re-queried.
pub(crate) struct DemoLedger {
    settings: EngineSettings,
    prices: PriceTable,
    market_price: watch::Receiver<Decimal>,
    chain: Mutex<Vec<Account>>,
    snapshot: Mutex<Vec<Account>>,
}

impl DemoLedger {
    pub(crate) fn new(settings: &EngineSettings, market_price: watch::Receiver<Decimal>) -> Self {
        Self::with_accounts(settings, market_price, demo_accounts(settings))
    }

    pub(crate) fn with_accounts(
        settings: &EngineSettings,
        market_price: watch::Receiver<Decimal>,
        accounts: Vec<Account>,
    ) -> Self {
        Self {
            settings: settings.clone(),
            prices: settings.price_table(),
            market_price,
            chain: Mutex::new(accounts.clone()),
            snapshot: Mutex::new(accounts),
        }
    }

    #[cfg(test)]
    pub(crate) fn account(&self, address: &str) -> Option<Account> {
        vending_core::find_account(&self.accounts(), address).cloned()
    }

    fn settle(&self, request: &PurchaseRequest) -> Result<(), SubmitError> {
        let mut chain = self
            .chain
            .lock()
            .map_err(|_| SubmitError::new("ledger unavailable"))?;
        let account = chain
            .iter_mut()
            .find(|account| account.address == request.account_address)
            .ok_or_else(|| {
                SubmitError::new(format!("unknown account {}", request.account_address))
            })?;

        let gc = self.settings.gc_token_resource.as_str();
        let output_resource = match request.kind {
            MachineKind::TokenDispenser => {
                if !account.holds(&self.settings.xrd_resource) {
                    return Err(SubmitError::new("no XRD to pay transaction fees"));
                }
                credit(account, gc, DISPENSE_AMOUNT);
                return Ok(());
            }
            MachineKind::Gumball => GUMBALL_RESOURCE,
            MachineKind::Candy => CANDY_RESOURCE,
            MachineKind::MemberCard => self.settings.member_card_resource.as_str(),
        };

        if account.balance(gc) < request.input_amount {
            return Err(SubmitError::new("insufficient GC tokens"));
        }
        let member_card = request
            .member_card
            .unwrap_or_else(|| account.holds(&self.settings.member_card_resource));
        let market_price = *self.market_price.borrow();
        let output = self
            .prices
            .quote(request.kind, request.input_amount, market_price, member_card)
            .map(Decimal::from)
            .unwrap_or(Decimal::ZERO);

        credit(account, gc, -request.input_amount);
        credit(account, output_resource, output);
        Ok(())
    }
}

fn credit(account: &mut Account, resource: &str, amount: Decimal) {
    account
        .fungible_tokens
        .entry(resource.to_string())
        .or_default()
        .value += amount;
}

fn demo_accounts(settings: &EngineSettings) -> Vec<Account> {
    vec![
        Account::new("account_alice")
            .with_balance(settings.xrd_resource.clone(), Decimal::ONE_THOUSAND),
        Account::new("account_bob")
            .with_balance(settings.gc_token_resource.clone(), Decimal::from(25))
            .with_balance(settings.member_card_resource.clone(), Decimal::ONE),
    ]
}

#[async_trait::async_trait]
impl TransactionSubmitter for DemoLedger {
    async fn submit(&self, request: &PurchaseRequest) -> Result<(), SubmitError> {
        vending_debug!("demo ledger settling {:?}", request);
        self.settle(request)
    }
}

#[async_trait::async_trait]
impl AccountProvider for DemoLedger {
    fn accounts(&self) -> Vec<Account> {
        self.snapshot
            .lock()
            .map(|accounts| accounts.clone())
            .unwrap_or_default()
    }

    async fn refresh(&self) -> Result<(), AccountError> {
        let chain = self
            .chain
            .lock()
            .map_err(|_| AccountError::new("ledger unavailable"))?
            .clone();
        let mut snapshot = self
            .snapshot
            .lock()
            .map_err(|_| AccountError::new("account snapshot unavailable"))?;
        *snapshot = chain;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DemoLedger, CANDY_RESOURCE};
    use rust_decimal_macros::dec;
    use tokio::sync::watch;
    use vending_core::MachineKind;
    use vending_engine::{AccountProvider, EngineSettings, PurchaseRequest, TransactionSubmitter};

    #[tokio::test]
    async fn dispense_needs_xrd_and_shows_after_refresh() {
        let settings = EngineSettings::default();
        let (_tx, rx) = watch::channel(dec!(2));
        let ledger = DemoLedger::new(&settings, rx);

        ledger.submit(&PurchaseRequest::dispense("account_alice")).await.unwrap();
        assert_eq!(
            ledger.account("account_alice").unwrap().balance(&settings.gc_token_resource),
            dec!(0)
        );
        ledger.refresh().await.unwrap();
        assert_eq!(
            ledger.account("account_alice").unwrap().balance(&settings.gc_token_resource),
            dec!(10)
        );

        let err = ledger
            .submit(&PurchaseRequest::dispense("account_bob"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "no XRD to pay transaction fees");
    }

    #[tokio::test]
    async fn candy_purchase_uses_market_price_and_member_card() {
        let settings = EngineSettings::default();
        let (_tx, rx) = watch::channel(dec!(1.5));
        let ledger = DemoLedger::new(&settings, rx);

        ledger
            .submit(&PurchaseRequest::new(MachineKind::Candy, "account_bob", dec!(10)))
            .await
            .unwrap();
        ledger.refresh().await.unwrap();

        let bob = ledger.account("account_bob").unwrap();
        assert_eq!(bob.balance(&settings.gc_token_resource), dec!(15));
        assert_eq!(bob.balance(CANDY_RESOURCE), dec!(30));
    }
}
