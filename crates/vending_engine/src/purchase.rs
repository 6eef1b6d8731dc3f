use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::{mpsc, watch};
use vending_core::{find_account, validate_input, Account, Msg, PriceTable};
use vending_logging::{vending_info, vending_warn};

use crate::{
    AccountError, EngineSettings, PurchaseError, PurchaseOutcome, PurchaseRequest, SubmitError,
};

/// Builds, signs and sends the purchase transaction. Opaque to the engine.
#[async_trait::async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(&self, request: &PurchaseRequest) -> Result<(), SubmitError>;
}

#[async_trait::async_trait]
pub trait AccountProvider: Send + Sync {
    /// Latest known account snapshot.
    fn accounts(&self) -> Vec<Account>;

    /// Re-reads balances from the ledger.
    async fn refresh(&self) -> Result<(), AccountError>;
}

/// Runs one purchase from quote to result view.
///
/// Only a successful submission advances anything: the account data is
/// refreshed first, then the result view is revealed through the
/// coordinator. A rejected submission is returned untouched.
pub struct PurchaseOrchestrator {
    submitter: Arc<dyn TransactionSubmitter>,
    accounts: Arc<dyn AccountProvider>,
    prices: PriceTable,
    market_price: watch::Receiver<Decimal>,
    input_resource: String,
    member_card_resource: String,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl PurchaseOrchestrator {
    pub fn new(
        submitter: Arc<dyn TransactionSubmitter>,
        accounts: Arc<dyn AccountProvider>,
        market_price: watch::Receiver<Decimal>,
        msg_tx: mpsc::UnboundedSender<Msg>,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            submitter,
            accounts,
            prices: settings.price_table(),
            market_price,
            input_resource: settings.gc_token_resource.clone(),
            member_card_resource: settings.member_card_resource.clone(),
            msg_tx,
        }
    }

    /// Output the purchase would yield at the current market price.
    pub fn quote(&self, request: &PurchaseRequest) -> Option<Decimal> {
        let member_card = self.discount_eligible(request);
        let market_price = *self.market_price.borrow();
        self.prices
            .quote(request.kind, request.input_amount, market_price, member_card)
            .map(Decimal::from)
    }

    pub async fn submit_purchase(
        &self,
        request: PurchaseRequest,
    ) -> Result<PurchaseOutcome, PurchaseError> {
        if request.kind.consumes_input() {
            validate_input(
                &self.accounts.accounts(),
                &request.account_address,
                &self.input_resource,
                request.input_amount,
            )?;
        }

        let output_value = self.quote(&request);
        if let Err(err) = self.submitter.submit(&request).await {
            vending_warn!(
                "{} purchase for {} failed: {}",
                request.kind,
                request.account_address,
                err
            );
            return Err(err.into());
        }

        if let Err(err) = self.accounts.refresh().await {
            vending_warn!("{}", err);
        }

        let account = find_account(&self.accounts.accounts(), &request.account_address).cloned();
        vending_info!(
            "{} purchase for {} succeeded, output {:?}",
            request.kind,
            request.account_address,
            output_value
        );
        if self
            .msg_tx
            .send(Msg::PurchaseSucceeded {
                kind: request.kind,
                account,
                output_value,
            })
            .is_err()
        {
            vending_warn!("result view coordinator is gone; purchase result not shown");
        }

        Ok(PurchaseOutcome {
            kind: request.kind,
            account_address: request.account_address,
            output_value,
        })
    }

    fn discount_eligible(&self, request: &PurchaseRequest) -> bool {
        request.member_card.unwrap_or_else(|| {
            find_account(&self.accounts.accounts(), &request.account_address)
                .is_some_and(|account| account.holds(&self.member_card_resource))
        })
    }
}
