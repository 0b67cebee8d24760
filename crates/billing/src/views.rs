//! Screen state for the plan card and the payment method picker
//!
//! A view starts a load, hands the load a [`MountToken`], and applies the
//! returned event only through `apply`. Loads whose view went away return
//! `None` and change nothing.

use healthplan_shared::{CurrencyFormat, FetchOutcome, LoadEvent, LoadState, MountToken, Mounted};
use serde::Serialize;

use crate::payment_option::{PaymentMethodId, PaymentMethodKind, PaymentOption};
use crate::plans::{Plan, PlanCard, PlanId};
use crate::pricing::PlanPriceSummary;
use crate::resolver::PaymentOptionResolver;

/// Fetch a plan's options for a view, dropping the result if the view has
/// been unmounted in the meantime
pub async fn load_plan_options(
    resolver: &PaymentOptionResolver,
    plan_id: PlanId,
    access_token: &str,
    token: MountToken,
) -> Option<LoadEvent<PaymentOption>> {
    let outcome = resolver.fetch_options_for_plan(plan_id, access_token).await;
    finish(outcome, &token, plan_id)
}

/// Fetch the options of one billing cycle for the payment method picker
pub async fn load_cycle_options(
    resolver: &PaymentOptionResolver,
    plan_id: PlanId,
    want_annual: bool,
    access_token: &str,
    token: MountToken,
) -> Option<LoadEvent<PaymentOption>> {
    let outcome = resolver
        .options_for_cycle(plan_id, want_annual, access_token)
        .await;
    finish(outcome, &token, plan_id)
}

fn finish(
    outcome: FetchOutcome<PaymentOption>,
    token: &MountToken,
    plan_id: PlanId,
) -> Option<LoadEvent<PaymentOption>> {
    if !token.is_mounted() {
        tracing::debug!(plan_id = plan_id.get(), "View gone; discarding payment options");
        return None;
    }
    Some(LoadEvent::Finished(outcome))
}

/// One plan card on the plan presenter screen
#[derive(Debug)]
pub struct PlanCardView {
    plan: Plan,
    currency: CurrencyFormat,
    mounted: Mounted,
    state: LoadState<PaymentOption>,
    summary: PlanPriceSummary,
}

impl PlanCardView {
    pub fn new(plan: Plan, currency: CurrencyFormat) -> Self {
        Self {
            plan,
            currency,
            mounted: Mounted::new(),
            state: LoadState::Idle,
            summary: PlanPriceSummary::default(),
        }
    }

    pub fn token(&self) -> MountToken {
        self.mounted.token()
    }

    pub fn unmount(&self) {
        self.mounted.unmount();
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn state(&self) -> &LoadState<PaymentOption> {
        &self.state
    }

    pub fn summary(&self) -> &PlanPriceSummary {
        &self.summary
    }

    pub fn apply(&mut self, event: LoadEvent<PaymentOption>) {
        self.state.apply(event);
        self.summary = PlanPriceSummary::from_options(self.state.items(), &self.currency);
    }

    pub fn card(&self) -> PlanCard {
        PlanCard::with_prices(&self.plan, self.summary.clone(), &self.currency)
    }
}

/// Row of the payment method picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodRow {
    pub method_id: Option<PaymentMethodId>,
    pub name: String,
    pub kind: PaymentMethodKind,
    pub subtitle: Option<&'static str>,
}

impl From<&PaymentOption> for MethodRow {
    fn from(option: &PaymentOption) -> Self {
        let kind = option.method_kind();
        Self {
            method_id: option.payment_method_id.clone(),
            name: option.display_name.clone(),
            kind,
            subtitle: kind.subtitle(),
        }
    }
}

/// Payment method picker for a plan and a requested billing cycle
#[derive(Debug)]
pub struct PaymentMethodSelectionView {
    plan_id: PlanId,
    want_annual: bool,
    mounted: Mounted,
    state: LoadState<PaymentOption>,
    selected: Option<PaymentMethodId>,
}

impl PaymentMethodSelectionView {
    pub fn new(plan_id: PlanId, want_annual: bool) -> Self {
        Self {
            plan_id,
            want_annual,
            mounted: Mounted::new(),
            state: LoadState::Idle,
            selected: None,
        }
    }

    pub fn plan_id(&self) -> PlanId {
        self.plan_id
    }

    pub fn want_annual(&self) -> bool {
        self.want_annual
    }

    pub fn token(&self) -> MountToken {
        self.mounted.token()
    }

    pub fn unmount(&self) {
        self.mounted.unmount();
    }

    pub fn state(&self) -> &LoadState<PaymentOption> {
        &self.state
    }

    pub fn apply(&mut self, event: LoadEvent<PaymentOption>) {
        self.state.apply(event);
    }

    pub fn rows(&self) -> Vec<MethodRow> {
        self.state.items().iter().map(MethodRow::from).collect()
    }

    /// Select a listed method. Returns false when `id` is not on screen.
    pub fn select(&mut self, id: &PaymentMethodId) -> bool {
        let listed = self
            .state
            .items()
            .iter()
            .any(|option| option.payment_method_id.as_ref() == Some(id));
        if listed {
            self.selected = Some(id.clone());
        }
        listed
    }

    pub fn selected(&self) -> Option<&PaymentMethodId> {
        self.selected.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment_option::fixtures::{annual, mixed, monthly};
    use healthplan_shared::{ApiClient, FALLBACK_DISPLAY};
    use serde_json::json;

    fn family_plan() -> Plan {
        serde_json::from_value(json!({
            "id_plano_pla": 72,
            "des_nome_pla": "Família",
            "vlr_adesao_pla": 49.9
        }))
        .unwrap()
    }

    #[test]
    fn test_plan_card_view_events() {
        let mut view = PlanCardView::new(family_plan(), CurrencyFormat::brl());
        assert_eq!(view.card().prices.annual_text(), FALLBACK_DISPLAY);

        view.apply(LoadEvent::Started);
        assert!(view.state().is_loading());

        view.apply(LoadEvent::Finished(FetchOutcome::Loaded(vec![
            mixed("Misto"),
            annual("Cartão"),
            monthly("Boleto"),
        ])));
        let card = view.card();
        assert_eq!(card.enrollment_fee, "R$ 49,90");
        assert_eq!(card.prices.annual_method.as_deref(), Some("Cartão"));
        assert_eq!(card.prices.monthly_text(), "12x de R$ 150,00");
    }

    #[test]
    fn test_selection_view_rows_and_select() {
        let mut pix = annual("PIX");
        pix.payment_method_id = Some(PaymentMethodId::new("10001"));
        let mut view = PaymentMethodSelectionView::new(PlanId::new(72).unwrap(), true);
        view.apply(LoadEvent::Finished(FetchOutcome::Loaded(vec![pix, annual("Cartão")])));

        let rows = view.rows();
        assert_eq!(rows[0].kind, PaymentMethodKind::Pix);
        assert_eq!(rows[0].subtitle, Some("Pagamento instantâneo • Sem taxas"));
        assert_eq!(rows[1].kind, PaymentMethodKind::CreditCard);
        assert_eq!(rows[1].subtitle, None);

        assert!(view.select(&PaymentMethodId::new("10001")));
        assert!(!view.select(&PaymentMethodId::new("10003")));
        assert_eq!(view.selected().map(|id| id.as_str()), Some("10001"));
    }

    #[tokio::test]
    async fn test_loader_result_dropped_after_unmount() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/plano-pagamento")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"response":{"data":[{"des_nome_fmp":"Boleto","num_parcelas_ppg":10,"vlr_parcela_ppg":99.9}]}}"#)
            .expect(2)
            .create_async()
            .await;
        let resolver = PaymentOptionResolver::new(ApiClient::new(server.url()));
        let plan_id = PlanId::new(72).unwrap();

        let mut view = PlanCardView::new(family_plan(), CurrencyFormat::brl());
        view.apply(LoadEvent::Started);
        let event = load_plan_options(&resolver, plan_id, "tok", view.token()).await;
        view.apply(event.unwrap());
        assert_eq!(view.summary().monthly_text(), "10x de R$ 99,90");

        let token = view.token();
        drop(view);
        assert!(load_plan_options(&resolver, plan_id, "tok", token).await.is_none());
    }

    #[tokio::test]
    async fn test_cycle_loader_filters() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/plano-pagamento")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                json!({ "response": { "data": [
                    { "des_nome_fmp": "Boleto", "id_forma_pagamento_ppg": 10003 },
                    { "des_nome_fmp": "Cartão", "id_forma_pagamento_ppg": 10002,
                      "vlr_vendedor_ppg": 1, "vlr_diretor_ppg": 1, "vlr_gerente_ppg": 1 }
                ] } })
                .to_string(),
            )
            .create_async()
            .await;
        let resolver = PaymentOptionResolver::new(ApiClient::new(server.url()));

        let mut view = PaymentMethodSelectionView::new(PlanId::new(72).unwrap(), false);
        let event = load_cycle_options(&resolver, view.plan_id(), view.want_annual(), "tok", view.token())
            .await
            .unwrap();
        view.apply(event);

        let names: Vec<String> = view.rows().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Boleto".to_string()]);
    }
}
