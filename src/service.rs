use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    client::{RequestError, Upstream, API_ERROR},
    correlator::correlate,
    halo::GameMode,
    model::{parse_instant, Declared, MatchInfo, MatchQuery},
    normalizer::normalize,
    scanner::scan_history,
};

const NO_GAMES: &str = "No games found matching the parameters provided";

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RequestData {
    #[serde(default)]
    pub matchid: Option<String>,
    #[serde(default)]
    pub gamertag: Option<String>,
    #[serde(default)]
    pub gamemode: Option<String>,
    #[serde(default)]
    pub gamedate: Option<String>,
    #[serde(default)]
    pub players: Option<Vec<Vec<String>>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AdapterRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub data: RequestData,
}

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("No games found matching the parameters provided")]
    NoCandidates,
    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AdapterError {
    pub fn status_code(&self) -> u16 {
        match self {
            AdapterError::Validation(_) | AdapterError::NoCandidates => 400,
            AdapterError::Request(RequestError::UnexpectedStatus { status, .. }) => status.as_u16(),
            AdapterError::Request(_) => 502,
            AdapterError::Encode(_) => 500,
        }
    }
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

impl TryFrom<RequestData> for MatchQuery {
    type Error = AdapterError;

    fn try_from(data: RequestData) -> Result<Self, Self::Error> {
        if let Some(match_id) = present(data.matchid) {
            // the by-id lookup only ever needed the id, the mode is a hint
            let mode = data
                .gamemode
                .and_then(|mode| mode.parse().ok())
                .unwrap_or(GameMode::Custom);
            return Ok(MatchQuery::ById { match_id, mode });
        }

        let gamertag = present(data.gamertag).ok_or_else(|| {
            AdapterError::Validation(
                "gamertag parameter needed to search for games if matchid parameter is not used"
                    .to_string(),
            )
        })?;
        let mode = data
            .gamemode
            .as_deref()
            .and_then(|mode| mode.parse::<GameMode>().ok())
            .ok_or_else(|| {
                AdapterError::Validation(
                    "gamemode parameter needs to be custom or customlocal to indicate which network/lobby type the game was played in"
                        .to_string(),
                )
            })?;
        let date = data
            .gamedate
            .as_deref()
            .and_then(parse_instant)
            .ok_or_else(|| {
                AdapterError::Validation(
                    "gamedate needs to be a valid date that can be turned into an ISO8601 style date"
                        .to_string(),
                )
            })?;

        Ok(MatchQuery::ByPlayer {
            gamertag,
            mode,
            date,
            declared_teams: data.players.unwrap_or_default(),
        })
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum Resolved {
    Single(MatchInfo),
    Many(Vec<MatchInfo>),
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Errored,
}

/// Response body handed back to the node that ran the job.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub status_code: u16,
    #[serde(rename = "jobRunID")]
    pub job_run_id: String,
    pub data: Value,
    pub status: RunStatus,
    pub error: Value,
    pub pending: bool,
}

impl Envelope {
    pub fn completed(job_run_id: String, data: Value) -> Self {
        Self {
            status_code: 200,
            job_run_id,
            data,
            status: RunStatus::Completed,
            error: Value::Null,
            pending: false,
        }
    }

    pub fn errored(job_run_id: String, err: AdapterError) -> Self {
        let status_code = err.status_code();
        let (data, error) = match err {
            AdapterError::Validation(message) => (Value::from(message), Value::Null),
            AdapterError::Request(RequestError::UnexpectedStatus { data, .. }) => {
                (data, Value::Null)
            }
            AdapterError::NoCandidates => (Value::from(NO_GAMES), Value::from(NO_GAMES)),
            other => (Value::from(API_ERROR), Value::from(other.to_string())),
        };
        Self {
            status_code,
            job_run_id,
            data,
            status: RunStatus::Errored,
            error,
            pending: false,
        }
    }
}

pub struct Adapter<U> {
    upstream: U,
}

impl<U: Upstream> Adapter<U> {
    pub fn new(upstream: U) -> Self {
        Self { upstream }
    }

    pub async fn resolve(&self, query: MatchQuery) -> Result<Resolved, AdapterError> {
        match query {
            MatchQuery::ById { match_id, mode } => {
                let info = normalize(&self.upstream, mode, &match_id, None).await?;
                Ok(Resolved::Single(info))
            }
            MatchQuery::ByPlayer {
                gamertag,
                mode,
                date,
                declared_teams,
            } => {
                let candidates = scan_history(&self.upstream, &gamertag, mode, &date).await?;
                if candidates.is_empty() {
                    return Err(AdapterError::NoCandidates);
                }

                // all candidates are fetched at once, the first failure fails the batch
                let fetches = candidates.into_iter().map(|candidate| {
                    let declared = Declared {
                        completed_at: candidate.completed_at,
                        teams: declared_teams.clone(),
                    };
                    let match_id = candidate.match_id;
                    async move { normalize(&self.upstream, mode, &match_id, Some(declared)).await }
                });
                let matches = try_join_all(fetches).await?;

                let matches = correlate(matches);
                if matches.is_empty() {
                    return Err(AdapterError::NoCandidates);
                }
                Ok(Resolved::Many(matches))
            }
        }
    }

    pub async fn run(&self, request: AdapterRequest) -> Envelope {
        let AdapterRequest { id, data } = request;
        log::info!("job {}: {:?}", id, data);
        let result = match MatchQuery::try_from(data) {
            Ok(query) => self.resolve(query).await,
            Err(err) => Err(err),
        };
        match result.and_then(|resolved| Ok(serde_json::to_value(resolved)?)) {
            Ok(data) => Envelope::completed(id, data),
            Err(err) => {
                log::warn!("job {} failed: {}", id, err);
                Envelope::errored(id, err)
            }
        }
    }
}

pub async fn handle<U: Upstream + 'static>(
    State(adapter): State<Arc<Adapter<U>>>,
    payload: Result<Json<AdapterRequest>, JsonRejection>,
) -> (StatusCode, Json<Envelope>) {
    let envelope = match payload {
        Ok(Json(request)) => adapter.run(request).await,
        Err(rejection) => Envelope::errored(
            String::new(),
            AdapterError::Validation(rejection.body_text()),
        ),
    };
    let status =
        StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope))
}

pub fn router<U: Upstream + 'static>(adapter: Arc<Adapter<U>>) -> Router {
    Router::new()
        .route("/", post(handle::<U>))
        .route("/health", get(|| async { "ok" }))
        .with_state(adapter)
}
