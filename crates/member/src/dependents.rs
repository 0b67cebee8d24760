//! Dependents registered under a member's contract

use healthplan_shared::{de, ApiClient, FetchOutcome};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dates::{format_display, parse_timestamp};

const CPF_DIGITS: usize = 11;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependent {
    #[serde(
        rename = "id_rel_titular_dependente_rtd",
        default,
        deserialize_with = "de::opt_int"
    )]
    pub id: Option<i64>,
    #[serde(rename = "id_contrato_rtd", default, deserialize_with = "de::opt_int")]
    pub contract_id: Option<i64>,
    #[serde(rename = "des_nome_pes", default)]
    pub name: String,
    #[serde(rename = "cod_cpf_pes", default, deserialize_with = "de::opt_id")]
    pub cpf: Option<String>,
    #[serde(rename = "is_ativo_rtd", default, deserialize_with = "de::flag")]
    pub is_active: bool,
    #[serde(rename = "dth_cadastro_rtd", default)]
    pub registered_at: Option<String>,
    #[serde(rename = "dth_alteracao_rtd", default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dependent {
    pub fn masked_cpf(&self) -> Option<String> {
        self.cpf.as_deref().map(mask_cpf)
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_active {
            "Ativo"
        } else {
            "Inativo"
        }
    }

    /// Registration time as `DD/MM/YYYY HH:mm`
    pub fn registered_display(&self) -> Option<String> {
        self.registered_at
            .as_deref()
            .and_then(parse_timestamp)
            .map(format_display)
    }

    pub fn updated_display(&self) -> Option<String> {
        self.updated_at
            .as_deref()
            .and_then(parse_timestamp)
            .map(format_display)
    }
}

/// `000.000.000-00`
///
/// Non-digits are ignored. Numeric CPFs that lost their leading zeros are
/// padded back to eleven digits; longer values are returned as bare digits.
pub fn mask_cpf(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() || digits.len() > CPF_DIGITS {
        return digits;
    }

    let padded = format!("{digits:0>width$}", width = CPF_DIGITS);
    format!(
        "{}.{}.{}-{}",
        &padded[0..3],
        &padded[3..6],
        &padded[6..9],
        &padded[9..11]
    )
}

#[derive(Debug, Clone)]
pub struct DependentService {
    client: ApiClient,
}

impl DependentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_for_contract(
        &self,
        contract_id: i64,
        access_token: &str,
    ) -> FetchOutcome<Dependent> {
        let path = format!("/contrato/{contract_id}/dependente");
        let result = self
            .client
            .get_list::<Dependent>(&path, &[], access_token)
            .await;

        if let Err(e) = &result {
            tracing::warn!(
                contract_id = contract_id,
                reason = e.reason(),
                error = %e,
                "Failed to load dependents"
            );
        }

        FetchOutcome::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mask_cpf() {
        assert_eq!(mask_cpf("12345678901"), "123.456.789-01");
        assert_eq!(mask_cpf("123.456.789-01"), "123.456.789-01");
        assert_eq!(mask_cpf("1234567890"), "012.345.678-90");
        assert_eq!(mask_cpf("123456789012"), "123456789012");
        assert_eq!(mask_cpf(""), "");
    }

    #[test]
    fn test_dependent_fields() {
        let dependent: Dependent = serde_json::from_value(json!({
            "id_rel_titular_dependente_rtd": 501,
            "id_contrato_rtd": "11",
            "des_nome_pes": "Ana Souza",
            "cod_cpf_pes": 9876543210u64,
            "is_ativo_rtd": 1,
            "dth_cadastro_rtd": "2025-11-02 10:45:00",
            "dth_alteracao_rtd": null,
            "des_parentesco": "Filha"
        }))
        .unwrap();

        assert_eq!(dependent.id, Some(501));
        assert_eq!(dependent.contract_id, Some(11));
        assert_eq!(dependent.masked_cpf().as_deref(), Some("098.765.432-10"));
        assert_eq!(dependent.status_label(), "Ativo");
        assert_eq!(dependent.registered_display().as_deref(), Some("02/11/2025 10:45"));
        assert_eq!(dependent.updated_display(), None);
        assert_eq!(dependent.extra["des_parentesco"], "Filha");
    }

    #[tokio::test]
    async fn test_list_for_contract() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/contrato/11/dependente")
            .match_header("authorization", "bearer tok")
            .with_status(200)
            .with_body(
                json!({ "response": { "data": [
                    { "des_nome_pes": "Ana", "is_ativo_rtd": 1 },
                    { "des_nome_pes": "Bruno", "is_ativo_rtd": 0 }
                ] } })
                .to_string(),
            )
            .create_async()
            .await;

        let service = DependentService::new(ApiClient::new(server.url()));
        let dependents = service.list_for_contract(11, "tok").await;

        mock.assert_async().await;
        let labels: Vec<&str> = dependents.items().iter().map(Dependent::status_label).collect();
        assert_eq!(labels, vec!["Ativo", "Inativo"]);
    }

    #[tokio::test]
    async fn test_list_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/contrato/11/dependente")
            .with_status(500)
            .create_async()
            .await;

        let service = DependentService::new(ApiClient::new(server.url()));
        assert!(service.list_for_contract(11, "tok").await.is_failed());
    }
}
