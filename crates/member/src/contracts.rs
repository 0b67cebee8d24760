//! Member contracts and the dependent allowance they grant

use healthplan_shared::{de, CurrencyFormat};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{MemberError, MemberResult};

/// Contract as held in the member's session data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberContract {
    #[serde(rename = "id_contrato_ctt", default, deserialize_with = "de::opt_int")]
    pub id: Option<i64>,
    #[serde(rename = "is_ativo_ctt", default, deserialize_with = "de::flag")]
    pub is_active: bool,
    #[serde(
        rename = "qtd_max_dependentes_pla",
        default,
        deserialize_with = "de::opt_count"
    )]
    pub max_dependents: Option<u32>,
    #[serde(
        rename = "vlr_dependente_adicional_pla",
        default,
        deserialize_with = "de::opt_decimal"
    )]
    pub additional_dependent_fee: Option<Decimal>,
}

impl MemberContract {
    pub fn contract_id(&self) -> MemberResult<i64> {
        self.id.filter(|id| *id > 0).ok_or(MemberError::MissingContractId)
    }

    pub fn allowance(&self, current: usize) -> DependentAllowance {
        DependentAllowance {
            current,
            max: self.max_dependents.unwrap_or_default(),
            additional_fee: self.additional_dependent_fee,
        }
    }
}

/// First active contract, in session order
pub fn active_contract(contracts: &[MemberContract]) -> MemberResult<&MemberContract> {
    contracts
        .iter()
        .find(|c| c.is_active)
        .ok_or(MemberError::NoActiveContract)
}

/// Whether one more dependent fits in the free allowance
pub fn can_add_dependent(current: usize, max: u32) -> bool {
    current < max as usize
}

/// Registered dependents against the plan's free allowance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependentAllowance {
    pub current: usize,
    pub max: u32,
    pub additional_fee: Option<Decimal>,
}

impl DependentAllowance {
    pub fn can_add(&self) -> bool {
        can_add_dependent(self.current, self.max)
    }

    /// `2/3 cadastrados sem custo adicional`
    pub fn summary(&self) -> String {
        format!("{}/{} cadastrados sem custo adicional", self.current, self.max)
    }

    /// Prompt shown before registering a dependent past the free allowance
    pub fn paid_dependent_notice(&self, format: &CurrencyFormat) -> Option<String> {
        if self.can_add() {
            return None;
        }
        Some(format!(
            "A quantidade de dependentes sem custo adicional está cheia. \
             Deseja adicionar mais um dependente por {}?",
            format.format(self.additional_fee.unwrap_or_default())
        ))
    }
}
