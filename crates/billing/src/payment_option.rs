//! Payment options offered for a plan
//!
//! A payment option is one payment method (PIX, credit card, boleto, ...)
//! with its installment terms for a given plan. The backend has no billing
//! cycle field: annual options carry seller, director and manager rates that
//! are all positive, monthly options carry all three at zero. The cycle is
//! derived once here, at normalization, and every consumer reads the tag.

use healthplan_shared::de;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque payment method identifier, kept as the backend's string form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethodId(String);

impl PaymentMethodId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> PaymentMethodKind {
        PaymentMethodKind::from_id(&self.0)
    }
}

impl std::fmt::Display for PaymentMethodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Well-known payment method families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodKind {
    Pix,
    CreditCard,
    Boleto,
    Other,
}

impl PaymentMethodKind {
    pub fn from_id(id: &str) -> Self {
        match id {
            "10001" => PaymentMethodKind::Pix,
            "10002" => PaymentMethodKind::CreditCard,
            "10003" => PaymentMethodKind::Boleto,
            _ => PaymentMethodKind::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethodKind::Pix => "PIX",
            PaymentMethodKind::CreditCard => "Cartão de crédito",
            PaymentMethodKind::Boleto => "Boleto",
            PaymentMethodKind::Other => "Outro",
        }
    }

    /// Extra line shown under the method name, if any
    pub fn subtitle(&self) -> Option<&'static str> {
        match self {
            PaymentMethodKind::Pix => Some("Pagamento instantâneo • Sem taxas"),
            _ => None,
        }
    }
}

/// Billing track an option belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Annual,
    Monthly,
    /// Rates are mixed; the option is tolerated but never priced
    Unclassified,
}

impl BillingCycle {
    /// The cycle a user asks for on the payment method screen
    pub fn requested(want_annual: bool) -> Self {
        if want_annual {
            BillingCycle::Annual
        } else {
            BillingCycle::Monthly
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingCycle::Annual => write!(f, "annual"),
            BillingCycle::Monthly => write!(f, "monthly"),
            BillingCycle::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// Commission rates attached to an option by the backend.
/// Used only as the billing cycle signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RoleRates {
    pub seller: Decimal,
    pub director: Decimal,
    pub manager: Decimal,
}

impl RoleRates {
    pub fn new(seller: Decimal, director: Decimal, manager: Decimal) -> Self {
        Self {
            seller,
            director,
            manager,
        }
    }

    /// All three rates strictly positive
    pub fn is_annual(&self) -> bool {
        self.seller > Decimal::ZERO && self.director > Decimal::ZERO && self.manager > Decimal::ZERO
    }

    /// All three rates exactly zero
    pub fn is_monthly(&self) -> bool {
        self.seller.is_zero() && self.director.is_zero() && self.manager.is_zero()
    }

    pub fn billing_cycle(&self) -> BillingCycle {
        if self.is_annual() {
            BillingCycle::Annual
        } else if self.is_monthly() {
            BillingCycle::Monthly
        } else {
            BillingCycle::Unclassified
        }
    }
}

/// Payment option record as the backend sends it
///
/// Every field is optional: the listing endpoints disagree on which ones
/// they fill in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPaymentOption {
    #[serde(default, deserialize_with = "de::opt_id")]
    pub id_forma_pagamento_ppg: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub id_forma_pagamento_fmp: Option<String>,
    #[serde(default)]
    pub des_nome_fmp: Option<String>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub qtd_parcelas_fmp: Option<u32>,
    #[serde(default)]
    pub des_nome_ctb: Option<String>,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_ativo_ppg: bool,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub id_plano_pagamento_ppg: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub vlr_parcela_ppg: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub num_parcelas_ppg: Option<u32>,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_padrao_ppg: bool,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub vlr_vendedor_ppg: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub vlr_diretor_ppg: Option<Decimal>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub vlr_gerente_ppg: Option<Decimal>,
}

/// Normalized payment option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOption {
    pub payment_method_id: Option<PaymentMethodId>,
    pub plan_payment_id: Option<i64>,
    pub display_name: String,
    pub installment_count: u32,
    pub installment_value: Option<Decimal>,
    pub max_installments: u32,
    pub account_name: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub role_rates: RoleRates,
    pub billing_cycle: BillingCycle,
}

impl PaymentOption {
    pub fn method_kind(&self) -> PaymentMethodKind {
        self.payment_method_id
            .as_ref()
            .map(PaymentMethodId::kind)
            .unwrap_or(PaymentMethodKind::Other)
    }

    pub fn is_annual(&self) -> bool {
        self.billing_cycle == BillingCycle::Annual
    }

    pub fn is_monthly(&self) -> bool {
        self.billing_cycle == BillingCycle::Monthly
    }
}

impl From<RawPaymentOption> for PaymentOption {
    fn from(raw: RawPaymentOption) -> Self {
        // Absent rates must read as zero so they count toward "monthly"
        let role_rates = RoleRates {
            seller: raw.vlr_vendedor_ppg.unwrap_or_default(),
            director: raw.vlr_diretor_ppg.unwrap_or_default(),
            manager: raw.vlr_gerente_ppg.unwrap_or_default(),
        };

        Self {
            // A zero id on the plan-payment side means unset
            payment_method_id: raw
                .id_forma_pagamento_ppg
                .filter(|id| id != "0")
                .or(raw.id_forma_pagamento_fmp)
                .map(PaymentMethodId),
            plan_payment_id: raw.id_plano_pagamento_ppg,
            display_name: raw.des_nome_fmp.unwrap_or_default(),
            installment_count: raw.num_parcelas_ppg.unwrap_or_default(),
            installment_value: raw.vlr_parcela_ppg,
            max_installments: raw.qtd_parcelas_fmp.unwrap_or_default(),
            account_name: raw.des_nome_ctb.filter(|name| !name.is_empty()),
            is_default: raw.is_padrao_ppg,
            is_active: raw.is_ativo_ppg,
            billing_cycle: role_rates.billing_cycle(),
            role_rates,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Option with the given rates, 12 x 150.00 by default
    pub fn option(name: &str, seller: i64, director: i64, manager: i64) -> PaymentOption {
        let role_rates = RoleRates::new(seller.into(), director.into(), manager.into());
        PaymentOption {
            payment_method_id: Some(PaymentMethodId::new("10002")),
            plan_payment_id: None,
            display_name: name.to_string(),
            installment_count: 12,
            installment_value: Some(Decimal::new(15000, 2)),
            max_installments: 12,
            account_name: None,
            is_default: false,
            is_active: true,
            role_rates,
            billing_cycle: role_rates.billing_cycle(),
        }
    }

    pub fn annual(name: &str) -> PaymentOption {
        option(name, 10, 5, 2)
    }

    pub fn monthly(name: &str) -> PaymentOption {
        option(name, 0, 0, 0)
    }

    pub fn mixed(name: &str) -> PaymentOption {
        option(name, 10, 0, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: serde_json::Value) -> PaymentOption {
        serde_json::from_value::<RawPaymentOption>(value).unwrap().into()
    }

    #[test]
    fn test_all_positive_rates_are_annual() {
        let rates = RoleRates::new(Decimal::new(1, 2), Decimal::ONE, Decimal::new(250, 0));
        assert!(rates.is_annual());
        assert!(!rates.is_monthly());
        assert_eq!(rates.billing_cycle(), BillingCycle::Annual);
    }

    #[test]
    fn test_all_zero_rates_are_monthly() {
        let rates = RoleRates::default();
        assert!(rates.is_monthly());
        assert!(!rates.is_annual());
        assert_eq!(rates.billing_cycle(), BillingCycle::Monthly);
    }

    #[test]
    fn test_mixed_rates_are_unclassified() {
        let cases = [
            RoleRates::new(Decimal::ONE, Decimal::ZERO, Decimal::ZERO),
            RoleRates::new(Decimal::ONE, Decimal::ONE, Decimal::ZERO),
            RoleRates::new(Decimal::ZERO, Decimal::ONE, Decimal::ONE),
        ];
        for rates in cases {
            assert!(!rates.is_annual(), "{rates:?}");
            assert!(!rates.is_monthly(), "{rates:?}");
            assert_eq!(rates.billing_cycle(), BillingCycle::Unclassified);
        }
    }

    #[test]
    fn test_negative_rate_is_not_annual() {
        let rates = RoleRates::new(Decimal::NEGATIVE_ONE, Decimal::ONE, Decimal::ONE);
        assert_eq!(rates.billing_cycle(), BillingCycle::Unclassified);
    }

    #[test]
    fn test_missing_rates_default_to_zero_and_classify_monthly() {
        let option = normalize(json!({
            "id_forma_pagamento_ppg": 10001,
            "des_nome_fmp": "PIX",
            "num_parcelas_ppg": 10,
            "vlr_parcela_ppg": 99.9
        }));

        assert_eq!(option.role_rates, RoleRates::default());
        assert_eq!(option.billing_cycle, BillingCycle::Monthly);
        assert!(option.is_monthly());
    }

    #[test]
    fn test_null_rates_default_to_zero() {
        let option = normalize(json!({
            "vlr_vendedor_ppg": null,
            "vlr_diretor_ppg": null,
            "vlr_gerente_ppg": null
        }));
        assert_eq!(option.billing_cycle, BillingCycle::Monthly);
    }

    #[test]
    fn test_string_rates_are_parsed() {
        let option = normalize(json!({
            "vlr_vendedor_ppg": "25.00",
            "vlr_diretor_ppg": "10.00",
            "vlr_gerente_ppg": "5.50"
        }));
        assert_eq!(option.billing_cycle, BillingCycle::Annual);
        assert_eq!(option.role_rates.manager, Decimal::new(550, 2));
    }

    #[test]
    fn test_method_id_prefers_ppg_field() {
        let option = normalize(json!({
            "id_forma_pagamento_ppg": 10002,
            "id_forma_pagamento_fmp": 10003
        }));
        assert_eq!(option.payment_method_id, Some(PaymentMethodId::new("10002")));
        assert_eq!(option.method_kind(), PaymentMethodKind::CreditCard);
    }

    #[test]
    fn test_method_id_falls_back_to_fmp_field() {
        let missing = normalize(json!({ "id_forma_pagamento_fmp": "10003" }));
        assert_eq!(missing.payment_method_id, Some(PaymentMethodId::new("10003")));
        assert_eq!(missing.method_kind(), PaymentMethodKind::Boleto);

        let null = normalize(json!({
            "id_forma_pagamento_ppg": null,
            "id_forma_pagamento_fmp": 10001
        }));
        assert_eq!(null.method_kind(), PaymentMethodKind::Pix);

        let empty = normalize(json!({
            "id_forma_pagamento_ppg": "",
            "id_forma_pagamento_fmp": 10001
        }));
        assert_eq!(empty.payment_method_id, Some(PaymentMethodId::new("10001")));

        let zero = normalize(json!({
            "id_forma_pagamento_ppg": 0,
            "id_forma_pagamento_fmp": 10002
        }));
        assert_eq!(zero.payment_method_id, Some(PaymentMethodId::new("10002")));
        assert_eq!(zero.method_kind(), PaymentMethodKind::CreditCard);
    }

    #[test]
    fn test_full_record_normalization() {
        let option = normalize(json!({
            "id_forma_pagamento_ppg": 10002,
            "des_nome_fmp": "Cartão de Crédito",
            "qtd_parcelas_fmp": 12,
            "des_nome_ctb": "",
            "is_ativo_ppg": 1,
            "id_plano_pagamento_ppg": 311,
            "vlr_parcela_ppg": "150.00",
            "num_parcelas_ppg": 12,
            "is_padrao_ppg": 0,
            "vlr_vendedor_ppg": 30,
            "vlr_diretor_ppg": 10,
            "vlr_gerente_ppg": 5
        }));

        assert_eq!(option.display_name, "Cartão de Crédito");
        assert_eq!(option.plan_payment_id, Some(311));
        assert_eq!(option.installment_count, 12);
        assert_eq!(option.installment_value, Some(Decimal::new(150, 0)));
        assert_eq!(option.max_installments, 12);
        assert_eq!(option.account_name, None);
        assert!(option.is_active);
        assert!(!option.is_default);
        assert_eq!(option.billing_cycle, BillingCycle::Annual);
    }

    #[test]
    fn test_method_kinds() {
        assert_eq!(PaymentMethodKind::from_id("10001").label(), "PIX");
        assert!(PaymentMethodKind::Pix.subtitle().is_some());
        assert!(PaymentMethodKind::Boleto.subtitle().is_none());
        assert_eq!(PaymentMethodKind::from_id("20001"), PaymentMethodKind::Other);
    }

    #[test]
    fn test_requested_cycle() {
        assert_eq!(BillingCycle::requested(true), BillingCycle::Annual);
        assert_eq!(BillingCycle::requested(false), BillingCycle::Monthly);
        assert_eq!(BillingCycle::Unclassified.to_string(), "unclassified");
    }
}
