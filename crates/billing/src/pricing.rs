//! User-facing prices for a plan's billing cycles
//!
//! Annual options show the full-cycle total (installments x value). Monthly
//! options show the recurring charge, e.g. `10x de R$ 99,90`. Anything that
//! cannot be priced renders the neutral fallback instead of failing.

use healthplan_shared::{CurrencyFormat, FALLBACK_DISPLAY};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::classify::classify_by_billing_cycle;
use crate::payment_option::{BillingCycle, PaymentOption};

/// Label a plan card shows when it cannot offer both billing cycles
pub const CUSTOM_OPTIONS_LABEL: &str = "Opções personalizadas";

/// Display price for one billing cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cycle", rename_all = "snake_case")]
pub enum PriceDisplay {
    Annual {
        total: Option<Decimal>,
        text: String,
    },
    Monthly {
        installments: u32,
        installment_value: Option<Decimal>,
        text: String,
    },
    Unavailable {
        text: String,
    },
}

impl PriceDisplay {
    pub fn unavailable() -> Self {
        PriceDisplay::Unavailable {
            text: FALLBACK_DISPLAY.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            PriceDisplay::Annual { text, .. }
            | PriceDisplay::Monthly { text, .. }
            | PriceDisplay::Unavailable { text } => text,
        }
    }

    /// Full-cycle total, for annual prices
    pub fn annual_total(&self) -> Option<Decimal> {
        match self {
            PriceDisplay::Annual { total, .. } => *total,
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, PriceDisplay::Unavailable { .. })
    }
}

/// Total paid over an annual option: installments x installment value
pub fn annual_total(option: &PaymentOption) -> Option<Decimal> {
    option
        .installment_value
        .and_then(|value| value.checked_mul(Decimal::from(option.installment_count)))
}

/// Price `option` as a member of `cycle`, using Brazilian real formatting
pub fn derive_price(option: &PaymentOption, cycle: BillingCycle) -> PriceDisplay {
    derive_price_with(option, cycle, &CurrencyFormat::brl())
}

/// Price `option` as a member of `cycle` with an explicit currency format
pub fn derive_price_with(
    option: &PaymentOption,
    cycle: BillingCycle,
    format: &CurrencyFormat,
) -> PriceDisplay {
    match cycle {
        BillingCycle::Annual => {
            let total = annual_total(option);
            PriceDisplay::Annual {
                total,
                text: format.format_opt(total),
            }
        }
        BillingCycle::Monthly => match option.installment_value {
            Some(value) => PriceDisplay::Monthly {
                installments: option.installment_count,
                installment_value: Some(value),
                text: installment_text(option.installment_count, value, format),
            },
            None => PriceDisplay::Monthly {
                installments: option.installment_count,
                installment_value: None,
                text: FALLBACK_DISPLAY.to_string(),
            },
        },
        BillingCycle::Unclassified => PriceDisplay::unavailable(),
    }
}

/// `{count}x de {amount}`
pub fn installment_text(count: u32, value: Decimal, format: &CurrencyFormat) -> String {
    format!("{}x de {}", count, format.format(value))
}

/// Prices a plan card shows for its two billing cycles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanPriceSummary {
    /// Name of the payment method behind the annual price
    pub annual_method: Option<String>,
    pub annual: PriceDisplay,
    pub monthly: PriceDisplay,
    /// Set when either cycle is missing
    pub custom_options: bool,
}

impl Default for PlanPriceSummary {
    fn default() -> Self {
        Self {
            annual_method: None,
            annual: PriceDisplay::unavailable(),
            monthly: PriceDisplay::unavailable(),
            custom_options: true,
        }
    }
}

impl PlanPriceSummary {
    pub fn from_options(options: &[PaymentOption], format: &CurrencyFormat) -> Self {
        let buckets = classify_by_billing_cycle(options);
        let annual = buckets
            .annual
            .map(|o| derive_price_with(o, BillingCycle::Annual, format))
            .unwrap_or_else(PriceDisplay::unavailable);
        let monthly = buckets
            .monthly
            .map(|o| derive_price_with(o, BillingCycle::Monthly, format))
            .unwrap_or_else(PriceDisplay::unavailable);

        Self {
            annual_method: buckets.annual.map(|o| o.display_name.clone()),
            custom_options: !(annual.is_available() && monthly.is_available()),
            annual,
            monthly,
        }
    }

    pub fn annual_text(&self) -> &str {
        self.annual.text()
    }

    pub fn monthly_text(&self) -> &str {
        self.monthly.text()
    }

    /// True when the plan cannot show both an annual and a monthly price
    pub fn is_custom(&self) -> bool {
        self.custom_options
    }

    /// Lines a plan card renders under the enrollment fee
    pub fn display_lines(&self) -> Vec<String> {
        if self.is_custom() {
            return vec![CUSTOM_OPTIONS_LABEL.to_string()];
        }

        let mut lines = Vec::with_capacity(3);
        if let Some(method) = &self.annual_method {
            lines.push(method.clone());
        }
        lines.push(format!("Anual: {}", self.annual_text()));
        lines.push(format!("Mensal: {}", self.monthly_text()));
        lines
    }
}
