//! Payment method catalog and selection lists

use healthplan_shared::{de, ApiClient, CurrencyFormat, FetchOutcome};
use serde::{Deserialize, Serialize};

use crate::payment_option::{PaymentMethodId, PaymentMethodKind, PaymentOption};
use crate::pricing::installment_text;

const PAYMENT_METHODS_PATH: &str = "/formapagamento";

/// Method ids offered to members share this prefix
const MEMBER_METHOD_PREFIX: &str = "100";

/// Payment method record from the method catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(rename = "id_forma_pagamento_fmp", default, deserialize_with = "de::opt_id")]
    pub id: Option<String>,
    #[serde(rename = "des_nome_fmp", default)]
    pub name: String,
    #[serde(rename = "qtd_parcelas_fmp", default, deserialize_with = "de::opt_count")]
    pub max_installments: Option<u32>,
    #[serde(rename = "des_nome_ctb", default)]
    pub account_name: Option<String>,
    #[serde(rename = "is_ativo_fmp", default, deserialize_with = "de::flag")]
    pub is_active: bool,
}

impl PaymentMethod {
    pub fn method_id(&self) -> Option<PaymentMethodId> {
        self.id.as_deref().map(PaymentMethodId::new)
    }

    pub fn kind(&self) -> PaymentMethodKind {
        self.id
            .as_deref()
            .map(PaymentMethodKind::from_id)
            .unwrap_or(PaymentMethodKind::Other)
    }

    fn is_member_method(&self) -> bool {
        self.id
            .as_deref()
            .is_some_and(|id| id.starts_with(MEMBER_METHOD_PREFIX))
    }
}

/// Entry in a "pick a payment method" list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodChoice {
    pub method_id: Option<PaymentMethodId>,
    pub name: String,
}

/// Entry in a "pick an installment plan" list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallmentChoice {
    pub plan_payment_id: Option<i64>,
    pub label: String,
}

/// One choice per method name; the first option with a given name wins
pub fn distinct_method_names(options: &[PaymentOption]) -> Vec<MethodChoice> {
    let mut choices: Vec<MethodChoice> = Vec::new();
    for option in options {
        if choices.iter().any(|c| c.name == option.display_name) {
            continue;
        }
        choices.push(MethodChoice {
            method_id: option.payment_method_id.clone(),
            name: option.display_name.clone(),
        });
    }
    choices
}

/// `{n}x de {amount}`, or the fallback when the option has no value
pub fn installment_label(option: &PaymentOption, format: &CurrencyFormat) -> String {
    match option.installment_value {
        Some(value) => installment_text(option.installment_count, value, format),
        None => format.format_opt(None),
    }
}

pub fn installment_choices(options: &[PaymentOption], format: &CurrencyFormat) -> Vec<InstallmentChoice> {
    options
        .iter()
        .map(|option| InstallmentChoice {
            plan_payment_id: option.plan_payment_id,
            label: installment_label(option, format),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct PaymentMethodService {
    client: ApiClient,
}

impl PaymentMethodService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Active payment methods offered to members
    pub async fn list_active_methods(&self, access_token: &str) -> FetchOutcome<PaymentMethod> {
        let result = self
            .client
            .get_list::<PaymentMethod>(
                PAYMENT_METHODS_PATH,
                &[("is_ativo_fmp", "1".to_string())],
                access_token,
            )
            .await;

        let outcome = match result {
            Ok(methods) => {
                if methods.is_empty() {
                    tracing::warn!("No active payment methods found");
                }
                FetchOutcome::from_result(Ok(methods))
            }
            Err(e) => {
                tracing::warn!(reason = e.reason(), error = %e, "Failed to load payment methods");
                FetchOutcome::Failed(e)
            }
        };

        outcome.map_items(|methods| {
            methods
                .into_iter()
                .filter(PaymentMethod::is_member_method)
                .collect()
        })
    }
}
