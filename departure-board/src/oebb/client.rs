//! ÖBB ticket shop HTTP client.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::config::{Connection, OebbConfig};
use crate::domain::{Rename, Station};
use crate::source::http::{build_client, parse_json, read_body};
use crate::source::{Provider, ProviderError, SourceId, retry_once};

use super::convert::{convert_connections, normalize};
use super::session::{Session, SessionStore, anonymous_user_id};
use super::types::{InitResponse, TimetableRequest, TimetableResponse};

/// Browser user agent; the shop rejects unknown clients.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/74.0.3729.169 Safari/537.36";

/// Connections requested per query.
const RESULT_COUNT: u32 = 5;

/// `datetimeDeparture` format. The API expects local time despite the `Z`.
const DEPARTURE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000Z";

/// Client for the ÖBB timetable.
///
/// Queries each configured connection in turn, sharing one cached session.
#[derive(Clone)]
pub struct OebbClient {
    http: reqwest::Client,
    base_url: String,
    connections: Vec<Connection>,
    renames: Vec<Rename>,
    sessions: SessionStore,
}

impl OebbClient {
    /// Create a client from the `api.oebb` section.
    pub fn new(config: &OebbConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert("channel", HeaderValue::from_static("inet"));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let http = build_client(Duration::from_secs(config.timeout_secs), headers)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            connections: config.connections.clone(),
            renames: config.rename.clone(),
            sessions: SessionStore::new(),
        })
    }

    /// The cached session, or a new one from `init`.
    async fn session(&self) -> Result<Arc<Session>, ProviderError> {
        if let Some(session) = self.sessions.get().await {
            return Ok(session);
        }

        let url = &format!("{}/api/domain/v3/init", self.base_url);
        let init: InitResponse = retry_once(SourceId::Oebb, move || async move {
            let user_id = anonymous_user_id();
            let response = self
                .http
                .get(url)
                .query(&[("userId", user_id.as_str())])
                .send()
                .await?;
            let body = read_body(response).await?;
            parse_json::<InitResponse>(&body)
        })
        .await?;

        debug!(timeout_secs = init.session_timeout, "Started new session");

        let session = Arc::new(Session::from_init(&init)?);
        self.sessions.insert(Arc::clone(&session)).await;
        Ok(session)
    }

    async fn timetable(
        &self,
        connection: Connection,
        now: NaiveDateTime,
    ) -> Result<Vec<Station>, ProviderError> {
        let session = self.session().await?;
        let headers = session.headers();

        let url = &format!("{}/api/hafas/v4/timetable", self.base_url);
        let request = &TimetableRequest::new(
            connection.from,
            connection.to,
            now.format(DEPARTURE_FORMAT).to_string(),
            RESULT_COUNT,
        );

        let response: TimetableResponse = retry_once(SourceId::Oebb, move || async move {
            let response = self
                .http
                .post(url)
                .headers(headers.clone())
                .json(request)
                .send()
                .await?;
            let body = read_body(response).await?;
            parse_json::<TimetableResponse>(&body)
        })
        .await?;

        debug!(
            from = connection.from,
            to = connection.to,
            connections = response.connections.len(),
            "Retrieved timetable"
        );

        Ok(convert_connections(&response.connections, now)?)
    }

    /// Query every configured connection and normalize the result.
    pub async fn get_stations(&self) -> Result<Vec<Station>, ProviderError> {
        let now = Local::now().naive_local();

        let mut stations = Vec::new();
        for connection in &self.connections {
            stations.extend(self.timetable(*connection, now).await?);
        }

        Ok(normalize(stations, &self.renames))
    }
}

impl Provider for OebbClient {
    type Output = Vec<Station>;

    fn source(&self) -> SourceId {
        SourceId::Oebb
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Vec<Station>, ProviderError>> {
        Box::pin(self.get_stations())
    }

    fn reset(&self) {
        self.sessions.invalidate();
    }
}
