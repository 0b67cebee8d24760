//! Installment schedule of a signed contract

use std::str::FromStr;

use healthplan_shared::{de, ApiClient, FetchOutcome};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BillingError, BillingResult};

/// Positive contract identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContractId(i64);

impl ContractId {
    pub fn new(id: i64) -> BillingResult<Self> {
        if id <= 0 {
            return Err(BillingError::InvalidContractId(id.to_string()));
        }
        Ok(Self(id))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl FromStr for ContractId {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|_| BillingError::InvalidContractId(s.to_string()))?;
        Self::new(id)
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One installment of a contract. Fields the app does not interpret are
/// kept as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractInstallment {
    #[serde(
        rename = "id_contrato_parcela_config_cpc",
        default,
        deserialize_with = "de::opt_int"
    )]
    pub config_id: Option<i64>,
    #[serde(rename = "cod_numparcela_cpc", default, deserialize_with = "de::opt_int")]
    pub number: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct InstallmentService {
    client: ApiClient,
}

impl InstallmentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_for_contract(
        &self,
        contract_id: ContractId,
        access_token: &str,
    ) -> FetchOutcome<ContractInstallment> {
        let path = format!("/parcela/{contract_id}");
        let result = self
            .client
            .get_list::<ContractInstallment>(&path, &[], access_token)
            .await;

        if let Err(e) = &result {
            tracing::warn!(
                contract_id = contract_id.get(),
                reason = e.reason(),
                error = %e,
                "Failed to load contract installments"
            );
        }

        FetchOutcome::from_result(result)
    }
}
