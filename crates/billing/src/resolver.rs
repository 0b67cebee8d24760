//! Payment option resolution
//!
//! Fetches a plan's active payment options, then classifies and prices them.
//! Every fetch goes to the backend; nothing is cached or de-duplicated
//! across callers.

use healthplan_shared::{ApiClient, CurrencyFormat, FetchOutcome};

use crate::classify::filter_options_by_requested_cycle;
use crate::payment_option::{PaymentOption, RawPaymentOption};
use crate::plans::PlanId;
use crate::pricing::PlanPriceSummary;

const PLAN_PAYMENT_PATH: &str = "/plano-pagamento";

/// Query for the plan-payment listing. `None` lists every plan's options.
pub fn plan_payment_query(plan_id: Option<PlanId>) -> Vec<(&'static str, String)> {
    let mut query = Vec::with_capacity(2);
    if let Some(id) = plan_id {
        query.push(("id_plano_ppg", id.to_string()));
    }
    query.push(("is_ativo_ppg", "1".to_string()));
    query
}

#[derive(Debug, Clone)]
pub struct PaymentOptionResolver {
    client: ApiClient,
    currency: CurrencyFormat,
}

impl PaymentOptionResolver {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            currency: CurrencyFormat::brl(),
        }
    }

    pub fn with_currency(mut self, currency: CurrencyFormat) -> Self {
        self.currency = currency;
        self
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.currency
    }

    /// Active payment options, normalized, in server order
    ///
    /// A record that cannot be decoded is skipped; the rest still load.
    pub async fn fetch_options(
        &self,
        plan_id: Option<PlanId>,
        access_token: &str,
    ) -> FetchOutcome<PaymentOption> {
        let result = self
            .client
            .get_list_lenient::<RawPaymentOption>(
                PLAN_PAYMENT_PATH,
                &plan_payment_query(plan_id),
                access_token,
            )
            .await
            .map(|raw| raw.into_iter().map(PaymentOption::from).collect::<Vec<_>>());

        match &result {
            Ok(options) => tracing::debug!(
                plan_id = ?plan_id.map(|id| id.get()),
                options = options.len(),
                "Fetched payment options"
            ),
            Err(e) => tracing::warn!(
                plan_id = ?plan_id.map(|id| id.get()),
                reason = e.reason(),
                error = %e,
                "Failed to fetch payment options"
            ),
        }

        FetchOutcome::from_result(result)
    }

    /// Active payment options of one plan
    pub async fn fetch_options_for_plan(
        &self,
        plan_id: PlanId,
        access_token: &str,
    ) -> FetchOutcome<PaymentOption> {
        self.fetch_options(Some(plan_id), access_token).await
    }

    /// Same as [`fetch_options_for_plan`](Self::fetch_options_for_plan), with
    /// every failure read as "no options"
    pub async fn fetch_options_or_empty(
        &self,
        plan_id: PlanId,
        access_token: &str,
    ) -> Vec<PaymentOption> {
        self.fetch_options_for_plan(plan_id, access_token)
            .await
            .into_items()
    }

    /// Every option of the requested cycle, for the payment method screen
    pub async fn options_for_cycle(
        &self,
        plan_id: PlanId,
        want_annual: bool,
        access_token: &str,
    ) -> FetchOutcome<PaymentOption> {
        self.fetch_options_for_plan(plan_id, access_token)
            .await
            .map_items(|options| filter_options_by_requested_cycle(options, want_annual))
    }

    /// Annual and monthly prices for a plan card. A failed fetch prices
    /// like an empty one: both cycles fall back.
    pub async fn price_summary(&self, plan_id: PlanId, access_token: &str) -> PlanPriceSummary {
        let outcome = self.fetch_options_for_plan(plan_id, access_token).await;
        PlanPriceSummary::from_options(outcome.items(), &self.currency)
    }
}
