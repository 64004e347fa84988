//! OpenLigaDB provider: JSON fetching and the team/match fallback search

use crate::config::Config;
use crate::constants;
use crate::error::AppError;
use crate::provider::SportsProvider;
use crate::provider::adapter::UpstreamClient;
use crate::provider::urls::{build_leagues_url, build_match_data_url};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Provider implementation for the OpenLigaDB API.
///
/// Leagues and league matches map directly onto upstream endpoints. Team and
/// match lookups have no direct endpoint and fall back to scanning the
/// candidate leagues' match data linearly; this is O(leagues x matches) by
/// the upstream's API shape.
pub struct OpenLigaProvider {
    base_url: String,
    client: UpstreamClient,
}

impl OpenLigaProvider {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(OpenLigaProvider {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client: UpstreamClient::new(config)?,
        })
    }

    /// Fetches a URL through the retrying adapter and parses the body as
    /// JSON, classifying terminal HTTP statuses, empty bodies and
    /// unparseable payloads.
    async fn fetch_json(&self, url: &str) -> Result<Value, AppError> {
        debug!("Fetching data from URL: {url}");
        let response = self.client.request_with_retry(Method::GET, url).await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown error");
            error!("HTTP {} - {} (URL: {})", status.as_u16(), reason, url);
            return Err(classify_status(status, url));
        }

        let response_text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to read response text from URL {}: {}", url, e);
                return Err(AppError::ApiFetch(e));
            }
        };

        if response_text.trim().is_empty() {
            return Err(AppError::api_no_data("Empty response from API", url));
        }

        match serde_json::from_str::<Value>(&response_text) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                error!("Failed to parse API response: {} (URL: {})", e, url);
                let preview: String = response_text.chars().take(200).collect();
                Err(AppError::api_malformed_json(
                    format!(
                        "{e}. Body length: {}, Body preview: {preview}",
                        response_text.len()
                    ),
                    url,
                ))
            }
        }
    }
}

impl SportsProvider for OpenLigaProvider {
    fn name(&self) -> &'static str {
        "OpenLiga"
    }

    async fn list_leagues(&self) -> Result<Value, AppError> {
        self.fetch_json(&build_leagues_url(&self.base_url)).await
    }

    async fn get_league_matches(&self, league_id: &str) -> Result<Value, AppError> {
        self.fetch_json(&build_match_data_url(&self.base_url, league_id))
            .await
    }

    /// Searches the candidate leagues' matches for a team with the given id.
    ///
    /// First hit in scan order wins. A league that fails to fetch is skipped
    /// and the scan continues; only full exhaustion yields `TeamNotFound`.
    async fn get_team(&self, team_id: &str) -> Result<Value, AppError> {
        for league_id in constants::CANDIDATE_LEAGUES {
            let matches = match self.get_league_matches(league_id).await {
                Ok(matches) => matches,
                Err(e) => {
                    warn!("Skipping league {league_id} while searching for team {team_id}: {e}");
                    continue;
                }
            };
            let Some(matches) = matches.as_array() else {
                warn!("League {league_id} match data is not an array, skipping");
                continue;
            };

            for entry in matches {
                for side in ["team1", "team2"] {
                    if let Some(team) = entry.get(side)
                        && id_matches(team.get("teamId"), team_id)
                    {
                        info!("Found team {team_id} in league {league_id}");
                        return Ok(team.clone());
                    }
                }
            }
        }

        Err(AppError::team_not_found(team_id))
    }

    /// Searches the candidate leagues' matches for a match with the given id,
    /// with the same skip-on-failure semantics as `get_team`.
    async fn get_match(&self, match_id: &str) -> Result<Value, AppError> {
        for league_id in constants::CANDIDATE_LEAGUES {
            let matches = match self.get_league_matches(league_id).await {
                Ok(matches) => matches,
                Err(e) => {
                    warn!("Skipping league {league_id} while searching for match {match_id}: {e}");
                    continue;
                }
            };
            let Some(matches) = matches.as_array() else {
                warn!("League {league_id} match data is not an array, skipping");
                continue;
            };

            for entry in matches {
                if id_matches(entry.get("matchID"), match_id) {
                    info!("Found match {match_id} in league {league_id}");
                    return Ok(entry.clone());
                }
            }
        }

        Err(AppError::match_not_found(match_id))
    }
}

/// Maps a terminal non-success status onto the error taxonomy.
fn classify_status(status: StatusCode, url: &str) -> AppError {
    let status_code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown error");
    match status_code {
        404 => AppError::api_not_found(url),
        429 => AppError::api_rate_limit(reason, url),
        400..=499 => AppError::api_client_error(status_code, reason, url),
        502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
        _ => AppError::api_server_error(status_code, reason, url),
    }
}

/// Upstream ids appear as strings or numbers depending on the payload;
/// compare the string rendering of both.
fn id_matches(value: Option<&Value>, wanted: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == wanted,
        Some(Value::Number(n)) => n.to_string() == wanted,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> Config {
        Config {
            api_base_url: base_url.to_string(),
            rate_limit_rps: 1000.0,
            rate_limit_burst: 100,
            max_retries: 0,
            backoff_base_seconds: 0.01,
            backoff_max_seconds: 0.05,
            jitter_enabled: false,
            request_timeout_seconds: 5.0,
            call_deadline_seconds: 30.0,
            ..Default::default()
        }
    }

    fn match_entry(match_id: u64, team1: (u64, &str), team2: (u64, &str)) -> Value {
        json!({
            "matchID": match_id,
            "team1": {"teamId": team1.0, "teamName": team1.1},
            "team2": {"teamId": team2.0, "teamName": team2.1},
        })
    }

    #[tokio::test]
    async fn test_list_leagues_returns_parsed_array() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getavailableleagues"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"leagueId": 4608, "leagueShortcut": "bl1"},
                {"leagueId": 4609, "leagueShortcut": "bl2"},
            ])))
            .mount(&mock_server)
            .await;

        let provider = OpenLigaProvider::new(&test_config(&mock_server.uri())).unwrap();
        let leagues = provider.list_leagues().await.unwrap();
        assert_eq!(leagues.as_array().unwrap().len(), 2);
        assert_eq!(leagues[0]["leagueShortcut"], "bl1");
    }

    #[tokio::test]
    async fn test_get_league_matches_hits_league_endpoint() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getmatchdata/bl1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([match_entry(1, (10, "FCB"), (20, "BVB"))])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenLigaProvider::new(&test_config(&mock_server.uri())).unwrap();
        let matches = provider.get_league_matches("bl1").await.unwrap();
        assert_eq!(matches[0]["matchID"], 1);
    }

    #[tokio::test]
    async fn test_empty_body_is_classified() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getavailableleagues"))
            .respond_with(ResponseTemplate::new(200).set_body_string("   "))
            .mount(&mock_server)
            .await;

        let provider = OpenLigaProvider::new(&test_config(&mock_server.uri())).unwrap();
        let result = provider.list_leagues().await;
        assert!(matches!(result, Err(AppError::ApiNoData { .. })));
    }

    #[tokio::test]
    async fn test_malformed_body_is_classified() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getavailableleagues"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&mock_server)
            .await;

        let provider = OpenLigaProvider::new(&test_config(&mock_server.uri())).unwrap();
        let result = provider.list_leagues().await;
        match result {
            Err(AppError::ApiMalformedJson { message, .. }) => {
                assert!(message.contains("Body preview"));
            }
            other => panic!("expected ApiMalformedJson, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_terminal_status_is_classified() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getmatchdata/bl1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider = OpenLigaProvider::new(&test_config(&mock_server.uri())).unwrap();
        let result = provider.get_league_matches("bl1").await;
        assert!(matches!(result, Err(AppError::ApiServerError { .. })));
    }

    #[tokio::test]
    async fn test_not_found_status_is_classified() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getmatchdata/unknown"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let provider = OpenLigaProvider::new(&test_config(&mock_server.uri())).unwrap();
        let result = provider.get_league_matches("unknown").await;
        assert!(matches!(result, Err(AppError::ApiNotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_team_survives_failing_candidate_league() {
        // League bl1 fails with a server error; bl2 contains the team as
        // team2. The failure must be swallowed and the scan continue.
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getmatchdata/bl1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/getmatchdata/bl2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                match_entry(7, (30, "HSV"), (40, "STP")),
            ])))
            .mount(&mock_server)
            .await;

        let provider = OpenLigaProvider::new(&test_config(&mock_server.uri())).unwrap();
        let team = provider.get_team("40").await.unwrap();
        assert_eq!(team["teamId"], 40);
        assert_eq!(team["teamName"], "STP");
    }

    #[tokio::test]
    async fn test_get_team_first_hit_in_scan_order_wins() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getmatchdata/bl1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                match_entry(1, (10, "first-league-entry"), (20, "other")),
            ])))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/getmatchdata/bl2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                match_entry(2, (10, "second-league-entry"), (30, "other")),
            ])))
            .mount(&mock_server)
            .await;

        let provider = OpenLigaProvider::new(&test_config(&mock_server.uri())).unwrap();
        let team = provider.get_team("10").await.unwrap();
        assert_eq!(team["teamName"], "first-league-entry");
    }

    #[tokio::test]
    async fn test_get_team_matches_string_ids() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getmatchdata/bl1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"matchID": 3, "team1": {"teamId": "abc", "teamName": "Stringy"}, "team2": {"teamId": 9}},
            ])))
            .mount(&mock_server)
            .await;

        let provider = OpenLigaProvider::new(&test_config(&mock_server.uri())).unwrap();
        let team = provider.get_team("abc").await.unwrap();
        assert_eq!(team["teamName"], "Stringy");
    }

    #[tokio::test]
    async fn test_get_team_exhausted_scan_is_not_found() {
        // All candidate leagues answer (404 by default for unmatched paths);
        // nothing contains the team.
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getmatchdata/bl1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                match_entry(1, (10, "A"), (20, "B")),
            ])))
            .mount(&mock_server)
            .await;

        let provider = OpenLigaProvider::new(&test_config(&mock_server.uri())).unwrap();
        let result = provider.get_team("999").await;
        match result {
            Err(AppError::TeamNotFound { team_id }) => assert_eq!(team_id, "999"),
            other => panic!("expected TeamNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_match_scans_candidate_leagues() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getmatchdata/bl1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                match_entry(100, (1, "A"), (2, "B")),
            ])))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/getmatchdata/bl2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                match_entry(200, (3, "C"), (4, "D")),
            ])))
            .mount(&mock_server)
            .await;

        let provider = OpenLigaProvider::new(&test_config(&mock_server.uri())).unwrap();
        let found = provider.get_match("200").await.unwrap();
        assert_eq!(found["matchID"], 200);
        assert_eq!(found["team1"]["teamName"], "C");
    }

    #[tokio::test]
    async fn test_get_match_exhausted_scan_is_not_found() {
        let mock_server = MockServer::start().await;
        let provider = OpenLigaProvider::new(&test_config(&mock_server.uri())).unwrap();
        let result = provider.get_match("42").await;
        match result {
            Err(AppError::MatchNotFound { match_id }) => assert_eq!(match_id, "42"),
            other => panic!("expected MatchNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_array_match_data_is_skipped() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getmatchdata/bl1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "odd shape"})))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/getmatchdata/bl2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                match_entry(5, (50, "E"), (60, "F")),
            ])))
            .mount(&mock_server)
            .await;

        let provider = OpenLigaProvider::new(&test_config(&mock_server.uri())).unwrap();
        let team = provider.get_team("60").await.unwrap();
        assert_eq!(team["teamName"], "F");
    }

    #[test]
    fn test_classify_status_mapping() {
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, "url"),
            AppError::ApiNotFound { .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "url"),
            AppError::ApiRateLimit { .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, "url"),
            AppError::ApiClientError { .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "url"),
            AppError::ApiServiceUnavailable { .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, "url"),
            AppError::ApiServiceUnavailable { .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, "url"),
            AppError::ApiServerError { .. }
        ));
    }

    #[test]
    fn test_id_matches_coerces_numbers_and_strings() {
        assert!(id_matches(Some(&json!(42)), "42"));
        assert!(id_matches(Some(&json!("42")), "42"));
        assert!(!id_matches(Some(&json!(42)), "43"));
        assert!(!id_matches(Some(&json!(null)), "42"));
        assert!(!id_matches(None, "42"));
    }
}
