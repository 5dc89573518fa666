// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::header::COOKIE;
use roomdesk_app::{Room, RoomId};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("session cookie is empty -- set [session].cookie or ROOMDESK_SESSION_COOKIE")]
    MissingCredential,
    #[error("cannot reach {url} -- check [api].base_url and that the server is running ({source})")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server error ({status}): {message}")]
    Status { status: u16, message: String },
    #[error("decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Where to send requests and the credential to send with each one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    base_url: Url,
    cookie: String,
}

impl Session {
    pub fn new(base_url: &str, cookie: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|error| ApiError::InvalidUrl {
            url: base_url.to_owned(),
            reason: error.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_owned(),
                reason: "expected an http:// or https:// URL".to_owned(),
            });
        }
        let cookie = cookie.trim();
        if cookie.is_empty() {
            return Err(ApiError::MissingCredential);
        }
        Ok(Self {
            base_url: parsed,
            cookie: cookie.to_owned(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Session::new rejects cannot-be-a-base URLs, so segments are always editable.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    session: Session,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(session: Session, timeout: Duration) -> anyhow::Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| anyhow::anyhow!("build HTTP client: {error}"))?;
        Ok(Self {
            session,
            timeout,
            http,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `GET /rooms/myRoom`
    pub fn list_my_rooms(&self) -> Result<Vec<Room>, ApiError> {
        let url = self.session.endpoint(&["rooms", "myRoom"]);
        let body = self.send(self.http.get(url.clone()), &url)?;
        let parsed: MessageEnvelope<Vec<Room>> =
            serde_json::from_str(&body).map_err(|source| ApiError::Decode {
                what: "room list",
                source,
            })?;
        Ok(parsed.message)
    }

    /// `POST /relationship/isRelationship`
    pub fn has_renters(&self, room_id: &RoomId) -> Result<bool, ApiError> {
        let url = self.session.endpoint(&["relationship", "isRelationship"]);
        let request = self.http.post(url.clone()).json(&RoomIdBody { room_id });
        let body = self.send(request, &url)?;
        let parsed: RentersResponse =
            serde_json::from_str(&body).map_err(|source| ApiError::Decode {
                what: "renters check",
                source,
            })?;
        Ok(parsed.renters.as_ref().is_some_and(is_truthy))
    }

    /// `POST /relationship/relationByRoomId`
    pub fn relation_exists(&self, room_id: &RoomId) -> Result<bool, ApiError> {
        let url = self.session.endpoint(&["relationship", "relationByRoomId"]);
        let request = self.http.post(url.clone()).json(&RoomIdBody { room_id });
        let body = self.send(request, &url)?;
        let parsed: MessageEnvelope<Option<Value>> =
            serde_json::from_str(&body).map_err(|source| ApiError::Decode {
                what: "relation check",
                source,
            })?;
        Ok(parsed.message.as_ref().is_some_and(is_truthy))
    }

    /// `PUT /rooms/:roomId` with the whole room.
    pub fn update_room(&self, room: &Room) -> Result<Option<Room>, ApiError> {
        let url = self.session.endpoint(&["rooms", room.id.as_str()]);
        let body = self.send(self.http.put(url.clone()).json(room), &url)?;
        Ok(room_from_update_response(&body))
    }

    /// `DELETE /rooms/:roomId`
    pub fn delete_room(&self, room_id: &RoomId) -> Result<(), ApiError> {
        let url = self.session.endpoint(&["rooms", room_id.as_str()]);
        self.send(self.http.delete(url.clone()), &url)?;
        Ok(())
    }

    fn send(&self, request: RequestBuilder, url: &Url) -> Result<String, ApiError> {
        debug!(%url, "api request");
        let response = request
            .header(COOKIE, &self.session.cookie)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        if !status.is_success() {
            return Err(clean_error_response(status, &body));
        }
        Ok(body)
    }
}

/// JavaScript truthiness, which is what the relationship endpoints rely on.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn room_from_update_response(body: &str) -> Option<Room> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidate = if value.get("_id").is_some() {
        value
    } else {
        ["message", "room", "updatedRoom", "data"]
            .iter()
            .find_map(|key| value.get(*key).filter(|inner| inner.get("_id").is_some()))
            .cloned()?
    };
    match serde_json::from_value(candidate) {
        Ok(room) => Some(room),
        Err(error) => {
            debug!(%error, "update response is not a room; keeping local copy");
            None
        }
    }
}

fn clean_error_response(status: StatusCode, body: &str) -> ApiError {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = parsed.message.or(parsed.error)
        && !message.is_empty()
    {
        return ApiError::Status {
            status: status.as_u16(),
            message,
        };
    }

    let message = if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        body.trim().to_owned()
    } else {
        format!("server returned {}", status.as_u16())
    };
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomIdBody<'a> {
    room_id: &'a RoomId,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope<T> {
    message: T,
}

#[derive(Debug, Deserialize)]
struct RentersResponse {
    #[serde(default)]
    renters: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}
