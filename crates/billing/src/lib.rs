// Test code patterns (expected in test files):
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! HealthPlan Billing Module
//!
//! Resolves the payment options of a health plan and prices them for the
//! plan card and payment method screens.
//!
//! ## Features
//!
//! - **Plans**: Active plan catalog, plan cards with enrollment fee and features
//! - **Payment Options**: Fetch and normalize a plan's active payment options
//! - **Classification**: Annual vs. monthly billing cycle from role rates
//! - **Pricing**: Full-cycle annual totals and `Nx de R$ ...` monthly charges
//! - **Catalog**: Member-facing payment methods, method and installment pickers
//! - **Installments**: Installment schedule of a signed contract
//! - **Views**: Load state for the plan card and payment method picker

pub mod catalog;
pub mod classify;
pub mod error;
pub mod installments;
pub mod payment_option;
pub mod plans;
pub mod pricing;
pub mod resolver;
pub mod views;

// Catalog
pub use catalog::{
    distinct_method_names, installment_choices, installment_label, InstallmentChoice,
    MethodChoice, PaymentMethod, PaymentMethodService,
};

// Classification
pub use classify::{
    classify_by_billing_cycle, filter_options_by_requested_cycle, is_annual, is_monthly,
    CycleOptions,
};

// Error
pub use error::{BillingError, BillingResult};

// Installments
pub use installments::{ContractId, ContractInstallment, InstallmentService};

// Payment options
pub use payment_option::{
    BillingCycle, PaymentMethodId, PaymentMethodKind, PaymentOption, RawPaymentOption, RoleRates,
};

// Plans
pub use plans::{sort_by_name, Plan, PlanCard, PlanId, PlanService};

// Pricing
pub use pricing::{
    annual_total, derive_price, derive_price_with, installment_text, PlanPriceSummary,
    PriceDisplay, CUSTOM_OPTIONS_LABEL,
};

// Resolver
pub use resolver::{plan_payment_query, PaymentOptionResolver};

// Views
pub use views::{
    load_cycle_options, load_plan_options, MethodRow, PaymentMethodSelectionView, PlanCardView,
};

use healthplan_shared::{ApiClient, Config, CurrencyFormat};

/// Main billing service that combines all billing functionality
#[derive(Debug, Clone)]
pub struct BillingService {
    pub plans: PlanService,
    pub payment_methods: PaymentMethodService,
    pub resolver: PaymentOptionResolver,
    pub installments: InstallmentService,
}

impl BillingService {
    /// Create a new billing service from loaded configuration
    pub fn from_config(config: &Config) -> Self {
        let currency = CurrencyFormat::brl().with_prefix(config.currency_prefix.clone());
        Self::new(ApiClient::from_config(config)).with_currency(currency)
    }

    /// Create a new billing service over an existing client
    pub fn new(client: ApiClient) -> Self {
        Self {
            plans: PlanService::new(client.clone()),
            payment_methods: PaymentMethodService::new(client.clone()),
            resolver: PaymentOptionResolver::new(client.clone()),
            installments: InstallmentService::new(client),
        }
    }

    pub fn with_currency(mut self, currency: CurrencyFormat) -> Self {
        self.resolver = self.resolver.with_currency(currency);
        self
    }

    pub fn currency(&self) -> &CurrencyFormat {
        self.resolver.currency()
    }
}
