//! Anonymous ticket shop sessions.
//!
//! The timetable endpoint needs the tokens handed out by `init`. A session is
//! cached until fewer than [`RENEW_BEFORE`] of its lifetime remain.

use std::sync::Arc;
use std::time::Duration;

use moka::Expiry;
use moka::future::Cache as MokaCache;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::source::ConversionError;

use super::types::InitResponse;

/// Renew a session this long before the server would expire it.
pub const RENEW_BEFORE: Duration = Duration::from_secs(1000);

const USER_ID_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Tokens of one session, ready to send.
#[derive(Debug, Clone)]
pub struct Session {
    headers: HeaderMap,
    timeout: Duration,
}

impl Session {
    /// Build the session headers from an `init` response.
    pub fn from_init(init: &InitResponse) -> Result<Self, ConversionError> {
        let mut headers = HeaderMap::new();
        headers.insert("accesstoken", header_value(&init.access_token, "accessToken")?);
        headers.insert("sessionid", header_value(&init.session_id, "sessionId")?);
        headers.insert("x-ts-supportid", header_value(&init.support_id, "supportId")?);

        Ok(Self {
            headers,
            timeout: Duration::from_secs(init.session_timeout),
        })
    }

    /// Headers to add to every timetable request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// How long the session may be reused.
    pub fn usable_for(&self) -> Duration {
        self.timeout.saturating_sub(RENEW_BEFORE)
    }
}

fn header_value(value: &str, field: &'static str) -> Result<HeaderValue, ConversionError> {
    HeaderValue::from_str(value).map_err(|_| ConversionError::InvalidHeader(field))
}

/// Expires each session after its own usable lifetime.
struct SessionExpiry;

impl Expiry<(), Arc<Session>> for SessionExpiry {
    fn expire_after_create(
        &self,
        _key: &(),
        value: &Arc<Session>,
        _created_at: std::time::Instant,
    ) -> Option<Duration> {
        Some(value.usable_for())
    }
}

/// Holds at most one live session.
#[derive(Clone)]
pub struct SessionStore {
    sessions: MokaCache<(), Arc<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let sessions = MokaCache::builder()
            .max_capacity(1)
            .expire_after(SessionExpiry)
            .build();

        Self { sessions }
    }

    /// The cached session, unless it is due for renewal.
    pub async fn get(&self) -> Option<Arc<Session>> {
        self.sessions.get(&()).await
    }

    /// Cache `session`. Sessions too short to reuse are not stored.
    pub async fn insert(&self, session: Arc<Session>) {
        if session.usable_for().is_zero() {
            return;
        }
        self.sessions.insert((), session).await;
    }

    /// Drop the cached session so the next request starts a new one.
    pub fn invalidate(&self) {
        self.sessions.invalidate_all();
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// A random anonymous user id, `anonym-xxxxxxxx-xxxx-xx`.
pub fn anonymous_user_id() -> String {
    format!(
        "anonym-{}-{}-{}",
        random_segment(8),
        random_segment(4),
        random_segment(2)
    )
}

fn random_segment(len: usize) -> String {
    (0..len)
        .map(|_| USER_ID_CHARSET[fastrand::usize(..USER_ID_CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init(timeout: u64) -> InitResponse {
        InitResponse {
            access_token: "token".into(),
            session_id: "session".into(),
            support_id: "support".into(),
            session_timeout: timeout,
        }
    }

    #[test]
    fn session_headers_carry_tokens() {
        let session = Session::from_init(&init(3600)).unwrap();
        let headers = session.headers();
        assert_eq!(headers["accesstoken"], "token");
        assert_eq!(headers["sessionid"], "session");
        assert_eq!(headers["x-ts-supportid"], "support");
    }

    #[test]
    fn usable_lifetime_leaves_renewal_margin() {
        assert_eq!(
            Session::from_init(&init(3600)).unwrap().usable_for(),
            Duration::from_secs(2600)
        );
        assert_eq!(Session::from_init(&init(600)).unwrap().usable_for(), Duration::ZERO);
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let mut bad = init(3600);
        bad.session_id = "a\nb".into();
        assert_eq!(
            Session::from_init(&bad).unwrap_err(),
            ConversionError::InvalidHeader("sessionId")
        );
    }

    #[test]
    fn user_id_shape() {
        let id = anonymous_user_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts[0], "anonym");
        assert_eq!(
            parts[1..].iter().map(|p| p.len()).collect::<Vec<_>>(),
            vec![8, 4, 2]
        );
        assert!(
            parts[1..]
                .iter()
                .flat_map(|p| p.bytes())
                .all(|b| USER_ID_CHARSET.contains(&b))
        );
    }

    #[tokio::test]
    async fn store_reuses_until_invalidated() {
        let store = SessionStore::new();
        assert!(store.get().await.is_none());

        store
            .insert(Arc::new(Session::from_init(&init(3600)).unwrap()))
            .await;
        assert!(store.get().await.is_some());

        store.invalidate();
        assert!(store.get().await.is_none());
    }

    #[tokio::test]
    async fn short_session_is_never_reused() {
        let store = SessionStore::new();
        store
            .insert(Arc::new(Session::from_init(&init(900)).unwrap()))
            .await;
        assert!(store.get().await.is_none());
    }
}
