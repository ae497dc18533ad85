//! REST layer for the user collection endpoint.
//!
//! `UserStore` is the seam between the UI commands and the network: the real
//! `ApiClient` speaks HTTP via `ureq`, tests substitute a recording mock.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, simple_error};

/// Server-assigned record identifier. The API is free to hand out numeric or
/// string ids; both render identically in URLs and table cells.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Num(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Num(n) => write!(f, "{}", n),
            UserId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One user record as returned by the API. Timestamps stay raw strings here;
/// `format::display_timestamp` decides how they render.
#[derive(Clone, Debug, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
}

/// Payload for create and update submissions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
}

/// Create uses a one-element array so the endpoint's batch shape is honored.
pub fn create_payload(draft: &UserDraft) -> serde_json::Value {
    serde_json::json!([draft])
}

/// Storage operations the UI needs. Implemented by `ApiClient` for real use
/// and by mocks in tests.
pub trait UserStore {
    fn list(&self) -> Result<Vec<UserRecord>>;
    fn create(&self, draft: &UserDraft) -> Result<()>;
    fn update(&self, id: &UserId, draft: &UserDraft) -> Result<()>;
    fn delete(&self, id: &UserId) -> Result<()>;
}

pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::Agent::new(),
        }
    }

    fn record_url(&self, id: &UserId) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

impl UserStore for ApiClient {
    fn list(&self) -> Result<Vec<UserRecord>> {
        tracing::debug!(url = %self.base_url, "fetching user list");
        match self.agent.get(&self.base_url).call() {
            Ok(resp) => Ok(resp.into_json()?),
            Err(ureq::Error::Status(code, resp)) => Err(status_error(code, resp)),
            Err(e) => Err(simple_error(format!("request failed: {}", e))),
        }
    }

    fn create(&self, draft: &UserDraft) -> Result<()> {
        tracing::debug!(url = %self.base_url, name = %draft.name, "creating user");
        match self.agent.post(&self.base_url).send_json(create_payload(draft)) {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, resp)) => Err(status_error(code, resp)),
            Err(e) => Err(simple_error(format!("request failed: {}", e))),
        }
    }

    fn update(&self, id: &UserId, draft: &UserDraft) -> Result<()> {
        let url = self.record_url(id);
        tracing::debug!(url = %url, "updating user");
        match self.agent.put(&url).send_json(serde_json::to_value(draft)?) {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, resp)) => Err(status_error(code, resp)),
            Err(e) => Err(simple_error(format!("request failed: {}", e))),
        }
    }

    fn delete(&self, id: &UserId) -> Result<()> {
        let url = self.record_url(id);
        tracing::debug!(url = %url, "deleting user");
        match self.agent.delete(&url).call() {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, resp)) => Err(status_error(code, resp)),
            Err(e) => Err(simple_error(format!("request failed: {}", e))),
        }
    }
}

/// Map a non-2xx response to an error whose Display is the server-provided
/// body text, falling back to the status code when the body is empty.
fn status_error(code: u16, resp: ureq::Response) -> crate::error::DynError {
    let body = resp.into_string().unwrap_or_default();
    let text = body.trim();
    if text.is_empty() {
        simple_error(format!("server returned {}", code))
    } else {
        simple_error(text.to_string())
    }
}
