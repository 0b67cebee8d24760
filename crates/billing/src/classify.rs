//! Billing cycle classification
//!
//! Both the plan card (one representative option per cycle) and the payment
//! method screen (every option of the requested cycle) read the same
//! normalized [`BillingCycle`] tag, so they cannot disagree about which
//! options are annual.

use crate::payment_option::{BillingCycle, PaymentOption};

/// Whether the option belongs to the annual track
pub fn is_annual(option: &PaymentOption) -> bool {
    option.billing_cycle == BillingCycle::Annual
}

/// Whether the option belongs to the monthly track
pub fn is_monthly(option: &PaymentOption) -> bool {
    option.billing_cycle == BillingCycle::Monthly
}

/// Representative option for each billing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleOptions<'a> {
    pub annual: Option<&'a PaymentOption>,
    pub monthly: Option<&'a PaymentOption>,
}

impl<'a> CycleOptions<'a> {
    pub fn get(&self, cycle: BillingCycle) -> Option<&'a PaymentOption> {
        match cycle {
            BillingCycle::Annual => self.annual,
            BillingCycle::Monthly => self.monthly,
            BillingCycle::Unclassified => None,
        }
    }

    pub fn has_both(&self) -> bool {
        self.annual.is_some() && self.monthly.is_some()
    }
}

/// Pick the first annual and the first monthly option, in fetch order
///
/// Later matches in the same bucket are discarded, and options with mixed
/// rates land in neither bucket. Neither case is an error.
pub fn classify_by_billing_cycle(options: &[PaymentOption]) -> CycleOptions<'_> {
    let mut buckets = CycleOptions::default();

    for (index, option) in options.iter().enumerate() {
        let slot = match option.billing_cycle {
            BillingCycle::Annual => &mut buckets.annual,
            BillingCycle::Monthly => &mut buckets.monthly,
            BillingCycle::Unclassified => {
                tracing::debug!(
                    index = index,
                    name = %option.display_name,
                    rates = ?option.role_rates,
                    "Payment option matches neither billing cycle; excluded"
                );
                continue;
            }
        };

        if slot.is_some() {
            tracing::debug!(
                index = index,
                name = %option.display_name,
                cycle = %option.billing_cycle,
                "Additional payment option for an already matched cycle; keeping first match"
            );
        } else {
            *slot = Some(option);
        }
    }

    buckets
}

/// Every option of the requested cycle, in original order
pub fn filter_options_by_requested_cycle(
    options: Vec<PaymentOption>,
    want_annual: bool,
) -> Vec<PaymentOption> {
    let requested = BillingCycle::requested(want_annual);
    options
        .into_iter()
        .filter(|option| option.billing_cycle == requested)
        .collect()
}
