//! Waiting-room schedules
//!
//! The scheduling integration answers with a bare JSON array of the
//! patient's appointment history. Only appointments still waiting are kept,
//! newest first.

use std::cmp::Ordering;

use healthplan_shared::{de, ApiClient, ApiError, FetchOutcome};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::macros::time;
use time::{Date, PrimitiveDateTime, Time};

use crate::dates::parse_timestamp;
use crate::error::{MemberError, MemberResult};

const SCHEDULE_HISTORY_PATH: &str = "/integracao/listHistoricoAgendamentos";
const WAITING_STATUS: &str = "ESPERA";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(rename = "agenda_exames_id", default, deserialize_with = "de::opt_id")]
    pub id: Option<String>,
    #[serde(
        rename = "nome_procedimento",
        default,
        deserialize_with = "procedure_names"
    )]
    pub procedures: Vec<String>,
    #[serde(rename = "nome_profissional", default)]
    pub professional: Option<String>,
    #[serde(rename = "data", default)]
    pub date: String,
    #[serde(rename = "fachada_profissional", default)]
    pub professional_facade: Option<String>,
    #[serde(rename = "inicio", default)]
    pub start: Option<String>,
    #[serde(rename = "situacao", default)]
    pub status: Option<String>,
    #[serde(rename = "nome_unidade", default)]
    pub unit: Option<String>,
}

/// Procedure names come as one string or a list of strings
fn procedure_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(name)) => vec![name],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

impl Schedule {
    pub fn is_waiting(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.trim().to_uppercase() == WAITING_STATUS)
    }

    pub fn timestamp(&self) -> Option<PrimitiveDateTime> {
        parse_timestamp(&self.date)
    }

    pub fn procedure_label(&self) -> String {
        self.procedures.join(", ")
    }
}

/// Newest first; schedules with an unreadable date go last
pub fn sort_newest_first(schedules: &mut [Schedule]) {
    schedules.sort_by(|a, b| match (a.timestamp(), b.timestamp()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Waiting schedules only, newest first
pub fn waiting_schedules(schedules: Vec<Schedule>) -> Vec<Schedule> {
    let mut waiting: Vec<Schedule> = schedules.into_iter().filter(Schedule::is_waiting).collect();
    sort_newest_first(&mut waiting);
    waiting
}

/// Schedules dated within `[start 00:00, end 23:59:59.999]`
///
/// Either bound may be open. With no bounds the input comes back unchanged;
/// otherwise schedules with an unreadable date are dropped.
pub fn filter_by_date_range(
    schedules: &[Schedule],
    start: Option<Date>,
    end: Option<Date>,
) -> Vec<Schedule> {
    if start.is_none() && end.is_none() {
        return schedules.to_vec();
    }

    let from = start.map(|day| PrimitiveDateTime::new(day, Time::MIDNIGHT));
    let until = end.map(|day| PrimitiveDateTime::new(day, time!(23:59:59.999_999_999)));

    let mut kept: Vec<Schedule> = schedules
        .iter()
        .filter(|schedule| {
            let Some(at) = schedule.timestamp() else {
                return false;
            };
            from.map_or(true, |from| at >= from) && until.map_or(true, |until| at <= until)
        })
        .cloned()
        .collect();
    sort_newest_first(&mut kept);
    kept
}

/// Patient whose schedules are listed. The integration takes the same id
/// as both the patient token and the patient code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientId(String);

impl PatientId {
    pub fn new(id: impl Into<String>) -> MemberResult<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(MemberError::InvalidPatientId(id));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleService {
    client: ApiClient,
}

impl ScheduleService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Waiting schedules of a patient, newest first
    pub async fn list_waiting(
        &self,
        patient: &PatientId,
        access_token: &str,
    ) -> FetchOutcome<Schedule> {
        let query = [
            ("token_paciente", patient.as_str().to_string()),
            ("cod_paciente", patient.as_str().to_string()),
        ];

        let result = self
            .client
            .get_json(SCHEDULE_HISTORY_PATH, &query, access_token)
            .await
            .and_then(decode_history);

        if let Err(e) = &result {
            tracing::warn!(reason = e.reason(), error = %e, "Failed to load waiting schedules");
        }

        FetchOutcome::from_result(result.map(waiting_schedules))
    }
}

fn decode_history(body: Value) -> Result<Vec<Schedule>, ApiError> {
    let Value::Array(records) = body else {
        tracing::debug!("Schedule history is not a list; treating as empty");
        return Ok(Vec::new());
    };

    records
        .into_iter()
        .map(|record| {
            Schedule::deserialize(record).map_err(|source| ApiError::Decode {
                path: SCHEDULE_HISTORY_PATH.to_string(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    fn schedule(id: &str, date: &str, status: &str) -> Schedule {
        serde_json::from_value(json!({
            "agenda_exames_id": id,
            "nome_procedimento": "Consulta",
            "data": date,
            "situacao": status
        }))
        .unwrap()
    }

    fn ids(schedules: &[Schedule]) -> Vec<&str> {
        schedules.iter().filter_map(|s| s.id.as_deref()).collect()
    }

    #[test]
    fn test_procedure_names() {
        let single: Schedule =
            serde_json::from_value(json!({ "nome_procedimento": " Hemograma " })).unwrap();
        assert_eq!(single.procedures, vec!["Hemograma"]);

        let many: Schedule = serde_json::from_value(json!({
            "nome_procedimento": ["Raio X", "", 3, "Ultrassom"]
        }))
        .unwrap();
        assert_eq!(many.procedure_label(), "Raio X, Ultrassom");

        let none: Schedule = serde_json::from_value(json!({ "nome_procedimento": null })).unwrap();
        assert!(none.procedures.is_empty());
    }

    #[test]
    fn test_waiting_filter_and_order() {
        let schedules = vec![
            schedule("a", "2026-01-10", "espera "),
            schedule("b", "2026-03-01T09:00:00", "ESPERA"),
            schedule("c", "2026-02-01", "CONFIRMADO"),
            schedule("d", "sem data", "Espera"),
            schedule("e", "2026-02-15 08:00:00", " ESPERA"),
        ];

        let waiting = waiting_schedules(schedules);
        assert_eq!(ids(&waiting), vec!["b", "e", "a", "d"]);
    }

    #[test]
    fn test_missing_status_is_not_waiting() {
        let s: Schedule = serde_json::from_value(json!({ "data": "2026-01-01" })).unwrap();
        assert!(!s.is_waiting());
    }

    #[test]
    fn test_date_range_is_inclusive_by_day() {
        let schedules = vec![
            schedule("late", "2026-03-31T23:59:59", "ESPERA"),
            schedule("mid", "2026-03-15T12:00:00", "ESPERA"),
            schedule("early", "2026-03-01T00:00:00", "ESPERA"),
            schedule("before", "2026-02-28T23:59:59", "ESPERA"),
            schedule("bad", "??", "ESPERA"),
        ];

        let march = filter_by_date_range(&schedules, Some(date!(2026 - 03 - 01)), Some(date!(2026 - 03 - 31)));
        assert_eq!(ids(&march), vec!["late", "mid", "early"]);

        let from = filter_by_date_range(&schedules, Some(date!(2026 - 03 - 15)), None);
        assert_eq!(ids(&from), vec!["late", "mid"]);

        let until = filter_by_date_range(&schedules, None, Some(date!(2026 - 02 - 28)));
        assert_eq!(ids(&until), vec!["before"]);
    }

    #[test]
    fn test_date_range_without_bounds_is_identity() {
        let schedules = vec![
            schedule("x", "??", "ESPERA"),
            schedule("y", "2026-01-01", "ESPERA"),
        ];
        assert_eq!(filter_by_date_range(&schedules, None, None), schedules);
    }

    #[test]
    fn test_patient_id() {
        assert_eq!(PatientId::new(" 4411 ").unwrap().as_str(), "4411");
        assert!(matches!(PatientId::new("  "), Err(MemberError::InvalidPatientId(_))));
    }

    #[tokio::test]
    async fn test_list_waiting_from_bare_array() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", SCHEDULE_HISTORY_PATH)
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("token_paciente".into(), "4411".into()),
                mockito::Matcher::UrlEncoded("cod_paciente".into(), "4411".into()),
            ]))
            .match_header("authorization", "bearer tok")
            .with_status(200)
            .with_body(
                json!([
                    { "agenda_exames_id": 1, "data": "2026-01-05", "situacao": "ESPERA" },
                    { "agenda_exames_id": 2, "data": "2026-01-09", "situacao": "REALIZADO" },
                    { "agenda_exames_id": 3, "data": "2026-01-07", "situacao": "espera" }
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let service = ScheduleService::new(ApiClient::new(server.url()));
        let waiting = service
            .list_waiting(&PatientId::new("4411").unwrap(), "tok")
            .await;

        mock.assert_async().await;
        assert_eq!(ids(waiting.items()), vec!["3", "1"]);
    }

    #[tokio::test]
    async fn test_non_array_body_means_no_schedules() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", SCHEDULE_HISTORY_PATH)
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"message":"Paciente sem agendamentos"}"#)
            .create_async()
            .await;

        let service = ScheduleService::new(ApiClient::new(server.url()));
        let waiting = service
            .list_waiting(&PatientId::new("4411").unwrap(), "tok")
            .await;
        assert!(matches!(waiting, FetchOutcome::Empty));
    }

    #[tokio::test]
    async fn test_request_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", SCHEDULE_HISTORY_PATH)
            .match_query(mockito::Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let service = ScheduleService::new(ApiClient::new(server.url()));
        let waiting = service
            .list_waiting(&PatientId::new("4411").unwrap(), "tok")
            .await;
        assert!(waiting.is_failed());
    }
}
