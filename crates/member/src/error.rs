//! Member data errors

#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    #[error("Member has no active contract")]
    NoActiveContract,
    #[error("Active contract has no id")]
    MissingContractId,
    #[error("Invalid date {value:?}, expected YYYY-MM-DD")]
    InvalidDate {
        value: String,
        #[source]
        source: time::error::Parse,
    },
    #[error("Invalid patient id {0:?}")]
    InvalidPatientId(String),
}

pub type MemberResult<T> = Result<T, MemberError>;
