//! Plan catalog and plan cards

use std::str::FromStr;

use healthplan_shared::{de, ApiClient, CurrencyFormat, FetchOutcome};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BillingError, BillingResult};
use crate::payment_option::PaymentOption;
use crate::pricing::PlanPriceSummary;

const PLANS_PATH: &str = "/plano";

/// Feature bullets shown on a plan card
const MAX_CARD_FEATURES: usize = 4;

/// Positive plan identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PlanId(i64);

impl PlanId {
    pub fn new(id: i64) -> BillingResult<Self> {
        if id <= 0 {
            return Err(BillingError::InvalidPlanId(id.to_string()));
        }
        Ok(Self(id))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl FromStr for PlanId {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|_| BillingError::InvalidPlanId(s.to_string()))?;
        Self::new(id)
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A purchasable plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "id_plano_pla")]
    pub id: i64,
    #[serde(rename = "des_nome_pla", default)]
    pub name: String,
    #[serde(
        rename = "vlr_adesao_pla",
        default,
        deserialize_with = "de::opt_decimal"
    )]
    pub enrollment_fee: Option<Decimal>,
    #[serde(rename = "des_descricao_pla", default)]
    pub description: Option<String>,
    #[serde(
        rename = "qtd_max_dependentes_pla",
        default,
        deserialize_with = "de::opt_count"
    )]
    pub max_dependents: Option<u32>,
}

impl Plan {
    pub fn plan_id(&self) -> BillingResult<PlanId> {
        PlanId::new(self.id)
    }

    /// First few non-blank description lines; lines are split on newlines or `|`
    pub fn features(&self) -> Vec<String> {
        self.description
            .as_deref()
            .unwrap_or_default()
            .split(['\n', '|'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(MAX_CARD_FEATURES)
            .map(str::to_string)
            .collect()
    }

    pub fn max_dependents(&self) -> u32 {
        self.max_dependents.unwrap_or_default()
    }

    /// `Até N dependente(s) inclusos`, or `None` when the plan has no allowance
    pub fn dependents_label(&self) -> Option<String> {
        match self.max_dependents() {
            0 => None,
            1 => Some("Até 1 dependente inclusos".to_string()),
            n => Some(format!("Até {n} dependentes inclusos")),
        }
    }
}

/// Sort plans by name, ignoring case
pub fn sort_by_name(plans: &mut [Plan]) {
    plans.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Everything a plan card renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanCard {
    pub plan_id: i64,
    pub name: String,
    pub enrollment_fee: String,
    pub features: Vec<String>,
    pub dependents: Option<String>,
    pub prices: PlanPriceSummary,
}

impl PlanCard {
    pub fn build(plan: &Plan, options: &[PaymentOption], format: &CurrencyFormat) -> Self {
        Self::with_prices(plan, PlanPriceSummary::from_options(options, format), format)
    }

    pub fn with_prices(plan: &Plan, prices: PlanPriceSummary, format: &CurrencyFormat) -> Self {
        Self {
            plan_id: plan.id,
            name: plan.name.clone(),
            enrollment_fee: format.format_opt(plan.enrollment_fee),
            features: plan.features(),
            dependents: plan.dependents_label(),
            prices,
        }
    }
}

/// Read access to the active plan catalog
#[derive(Debug, Clone)]
pub struct PlanService {
    client: ApiClient,
}

impl PlanService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Active plans, sorted by name
    pub async fn list_active_plans(&self, access_token: &str) -> FetchOutcome<Plan> {
        let result = self
            .client
            .get_list::<Plan>(PLANS_PATH, &[("is_ativo_pla", "1".to_string())], access_token)
            .await;

        if let Err(e) = &result {
            tracing::warn!(reason = e.reason(), error = %e, "Failed to load plan catalog");
        }

        FetchOutcome::from_result(result).map_items(|mut plans| {
            sort_by_name(&mut plans);
            plans
        })
    }
}
