use anyhow::Context as _;
use infrastructure::HttpClientConfig;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::core::time::{Date, Duration};
use crate::habit::{HabitDefinition, HabitId, HabitStatus, StatusRecord};
use crate::port::{RemoteFetchError, StatusSource};

#[derive(Debug, Clone)]
pub struct HabitifyClient {
    client: ClientWithMiddleware,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct StatusDto {
    status: HabitStatus,
}

impl HabitifyClient {
    pub fn new(url: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        //Habitify expects the bare API key in the Authorization header
        let client = HttpClientConfig::raw(api_key)
            .with_timeout(timeout.to_std())
            .new_tracing_client()?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_owned(),
        })
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("Error parsing response of {}", path))?;

        Ok(envelope.data)
    }
}

impl StatusSource for HabitifyClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_habits(&self) -> Result<Vec<HabitDefinition>, RemoteFetchError> {
        self.get_data("/habits", &[])
            .await
            .map_err(|cause| RemoteFetchError::Habits { cause })
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_status(&self, habit_id: &HabitId, date: Date) -> Result<StatusRecord, RemoteFetchError> {
        let path = format!("/status/{}", habit_id);
        let query = [("target_date", date.to_utc_midnight_string())];

        match self.get_data::<StatusDto>(&path, &query).await {
            Ok(dto) => Ok(StatusRecord::new(date, dto.status)),
            Err(cause) => Err(RemoteFetchError::Status {
                habit_id: habit_id.clone(),
                date,
                cause,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::t;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HabitifyClient {
        HabitifyClient::new(&server.uri(), "api-key", t!(5 seconds)).unwrap()
    }

    async fn respond(server: &MockServer, url_path: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetch_habits_parses_definitions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/habits"))
            .and(header("authorization", "api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"message": "Success", "data": [
                    {"id": "1FE92BED", "name": "Read", "is_archived": false},
                    {"id": "19166B2B", "name": "Meditate", "priority": 3}
                ]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let habits = client(&server).fetch_habits().await.unwrap();

        assert_eq!(
            habits,
            vec![
                HabitDefinition {
                    id: HabitId::new("1FE92BED"),
                    name: "Read".to_owned()
                },
                HabitDefinition {
                    id: HabitId::new("19166B2B"),
                    name: "Meditate".to_owned()
                },
            ]
        );
    }

    #[tokio::test]
    async fn fetch_status_queries_utc_midnight_and_keeps_local_date() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/1FE92BED"))
            .and(query_param("target_date", "2024-01-30T00:00:00+00:00"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data": {"status": "completed", "date": "1999-12-31", "progress": {"current_value": 1}}}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let date = Date::ymd(2024, 1, 30).unwrap();
        let record = client(&server).fetch_status(&HabitId::new("1FE92BED"), date).await.unwrap();

        assert_eq!(record, StatusRecord::new(date, HabitStatus::Completed));
    }

    #[tokio::test]
    async fn unknown_status_is_treated_as_skipped() {
        let server = MockServer::start().await;
        respond(&server, "/status/h1", 200, r#"{"data": {"status": "none"}}"#).await;

        let date = Date::ymd(2024, 1, 30).unwrap();
        let record = client(&server).fetch_status(&HabitId::new("h1"), date).await.unwrap();

        assert_eq!(record.status, HabitStatus::Skipped);
    }

    #[tokio::test]
    async fn http_error_becomes_remote_fetch_error() {
        let server = MockServer::start().await;
        respond(&server, "/status/h1", 500, "").await;

        let date = Date::ymd(2024, 1, 30).unwrap();
        let result = client(&server).fetch_status(&HabitId::new("h1"), date).await;

        match result {
            Err(RemoteFetchError::Status {
                habit_id, date: failed, ..
            }) => {
                assert_eq!(habit_id, HabitId::new("h1"));
                assert_eq!(failed, date);
            }
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[tokio::test]
    async fn payload_without_status_is_an_error() {
        let server = MockServer::start().await;
        respond(&server, "/status/h1", 200, r#"{"data": {}}"#).await;

        let date = Date::ymd(2024, 1, 30).unwrap();

        assert!(client(&server).fetch_status(&HabitId::new("h1"), date).await.is_err());
    }

    #[tokio::test]
    async fn failing_definitions_request_is_reported() {
        let server = MockServer::start().await;
        respond(&server, "/habits", 401, "").await;

        let result = client(&server).fetch_habits().await;

        assert!(matches!(result, Err(RemoteFetchError::Habits { .. })));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/h1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"data": {"status": "completed"}}"#)
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = HabitifyClient::new(&server.uri(), "api-key", t!(1 seconds)).unwrap();
        let date = Date::ymd(2024, 1, 30).unwrap();

        let result = client.fetch_status(&HabitId::new("h1"), date).await;

        assert!(matches!(result, Err(RemoteFetchError::Status { .. })));
    }
}
