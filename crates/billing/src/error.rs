//! Billing errors

#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("Invalid plan id: {0:?}")]
    InvalidPlanId(String),
    #[error("Invalid contract id: {0:?}")]
    InvalidContractId(String),
}

pub type BillingResult<T> = Result<T, BillingError>;
