//! Client for the LXNS maimai API (`https://maimai.lxns.net/api/v0/`).
//!
//! Player endpoints live under `user/maimai/` and need the player's own token,
//! sent in the `X-User-Token` header.  Public endpoints live under `maimai/`.
//! Responses are usually wrapped as `{"success": true, "data": ...}`; the
//! client unwraps the envelope before decoding.

use derive_more::{AsRef, From};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use strum::Display;
use thiserror::Error;
use url::Url;

use crate::{
    de::{decode, DecodeError, Fields, FromJson},
    schema::{
        collection::{Collection, CollectionGenre},
        player::{Player, Score},
        song::{Alias, Song, SongList},
    },
};

pub const DEFAULT_BASE_URL: &str = "https://maimai.lxns.net/api/v0/";
pub const DEFAULT_GAME_VERSION: u32 = 24000;
const TOKEN_HEADER: &str = "X-User-Token";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Personal API token issued to a player.
#[derive(Clone, PartialEq, Eq, Debug, From, AsRef, Deserialize)]
#[as_ref(forward)]
#[serde(transparent)]
pub struct UserToken(String);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to build the request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Request rejected by the server (code {code}): {message}")]
    Rejected { code: i64, message: String },
    #[error("Unexpected response: {0}")]
    Decode(#[from] DecodeError),
}

/// Performs a GET request and returns the response body as JSON.
pub trait Transport {
    fn get_json(&self, url: Url, token: Option<&UserToken>) -> Result<Value, ApiError>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, url: Url, token: Option<&UserToken>) -> Result<Value, ApiError> {
        debug!("GET {url}");
        let mut request = self.client.get(url);
        if let Some(token) = token {
            let token: &str = token.as_ref();
            request = request.header(TOKEN_HEADER, token);
        }
        let response = request.send()?;
        let status_error = response.error_for_status_ref().err();
        match status_error {
            None => Ok(response.json()?),
            Some(e) => {
                // Error statuses usually still carry an envelope with the reason
                match response.json::<Value>().ok().map(unwrap_envelope) {
                    Some(Err(rejected @ ApiError::Rejected { .. })) => Err(rejected),
                    _ => Err(e.into()),
                }
            }
        }
    }
}

fn unwrap_envelope(body: Value) -> Result<Value, ApiError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let code = body.get("code").and_then(Value::as_i64).unwrap_or_default();
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        warn!("Request rejected with code {code}: {message}");
        return Err(ApiError::Rejected { code, message });
    }
    Ok(match body {
        Value::Object(mut object) if object.contains_key("data") => {
            object.remove("data").unwrap_or_default()
        }
        body => body,
    })
}

/// Reads the list stored under `key`; an absent key is an empty list.
fn list_under<R: FromJson>(
    data: &Value,
    record: &'static str,
    key: &'static str,
) -> Result<Vec<R>, DecodeError> {
    Fields::new(record, data)?.or_default(key)
}

/// Icons, name plates and frames share one record shape and one URL scheme.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CollectionKind {
    Icon,
    Plate,
    Frame,
}

impl CollectionKind {
    fn list_key(self) -> &'static str {
        match self {
            Self::Icon => "icons",
            Self::Plate => "plates",
            Self::Frame => "frames",
        }
    }
}

pub struct LxnsClient<T = HttpTransport> {
    transport: T,
    base_url: Url,
}

impl LxnsClient {
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self::with_transport(
            HttpTransport::new()?,
            Url::parse(DEFAULT_BASE_URL)?,
        ))
    }
}

impl<T: Transport> LxnsClient<T> {
    /// `base_url` is treated as a directory even without a trailing slash.
    pub fn with_transport(transport: T, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            transport,
            base_url,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn player_url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join("user/maimai/")?.join(path)?)
    }

    fn public_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.join("maimai/")?.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn get_player(&self, path: &str, token: &UserToken) -> Result<Value, ApiError> {
        unwrap_envelope(self.transport.get_json(self.player_url(path)?, Some(token))?)
    }

    fn get_public(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        unwrap_envelope(self.transport.get_json(self.public_url(path, query)?, None)?)
    }

    pub fn player(&self, token: &UserToken) -> Result<Player, ApiError> {
        Ok(decode(&self.get_player("player", token)?)?)
    }

    pub fn player_scores(&self, token: &UserToken) -> Result<Vec<Score>, ApiError> {
        Ok(decode(&self.get_player("player/scores", token)?)?)
    }

    /// Note counts of each chart are only included when `notes` is set.
    pub fn song_list(&self, version: u32, notes: bool) -> Result<SongList, ApiError> {
        let query = [("version", version.to_string()), ("notes", notes.to_string())];
        Ok(decode(&self.get_public("song/list", &query)?)?)
    }

    pub fn song(&self, id: u32, version: u32) -> Result<Song, ApiError> {
        let query = [("version", version.to_string())];
        Ok(decode(&self.get_public(&format!("song/{id}"), &query)?)?)
    }

    pub fn alias_list(&self) -> Result<Vec<Alias>, ApiError> {
        let data = self.get_public("alias/list", &[])?;
        Ok(list_under(&data, "AliasList", "aliases")?)
    }

    /// With `required` set, each collection carries its unlock conditions.
    pub fn collection_list(
        &self,
        kind: CollectionKind,
        version: u32,
        required: bool,
    ) -> Result<Vec<Collection>, ApiError> {
        let query = [
            ("version", version.to_string()),
            ("required", required.to_string()),
        ];
        let data = self.get_public(&format!("{kind}/list"), &query)?;
        Ok(list_under(&data, "CollectionList", kind.list_key())?)
    }

    pub fn collection(
        &self,
        kind: CollectionKind,
        id: u32,
        version: u32,
    ) -> Result<Collection, ApiError> {
        let query = [("version", version.to_string())];
        Ok(decode(&self.get_public(&format!("{kind}/{id}"), &query)?)?)
    }

    pub fn icon_list(&self, version: u32, required: bool) -> Result<Vec<Collection>, ApiError> {
        self.collection_list(CollectionKind::Icon, version, required)
    }

    pub fn icon(&self, id: u32, version: u32) -> Result<Collection, ApiError> {
        self.collection(CollectionKind::Icon, id, version)
    }

    pub fn plate_list(&self, version: u32, required: bool) -> Result<Vec<Collection>, ApiError> {
        self.collection_list(CollectionKind::Plate, version, required)
    }

    pub fn plate(&self, id: u32, version: u32) -> Result<Collection, ApiError> {
        self.collection(CollectionKind::Plate, id, version)
    }

    pub fn frame_list(&self, version: u32, required: bool) -> Result<Vec<Collection>, ApiError> {
        self.collection_list(CollectionKind::Frame, version, required)
    }

    pub fn frame(&self, id: u32, version: u32) -> Result<Collection, ApiError> {
        self.collection(CollectionKind::Frame, id, version)
    }

    pub fn collection_genre_list(&self, version: u32) -> Result<Vec<CollectionGenre>, ApiError> {
        let query = [("version", version.to_string())];
        let data = self.get_public("collection-genre/list", &query)?;
        Ok(list_under(&data, "CollectionGenreList", "collectionGenres")?)
    }

    pub fn collection_genre(&self, id: u32, version: u32) -> Result<CollectionGenre, ApiError> {
        let query = [("version", version.to_string())];
        Ok(decode(
            &self.get_public(&format!("collection-genre/{id}"), &query)?,
        )?)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::{cell::RefCell, collections::HashMap};

    use serde_json::Value;
    use url::{Position, Url};

    use super::{ApiError, LxnsClient, Transport, UserToken, DEFAULT_BASE_URL};

    /// Serves canned bodies keyed by path and query, and records every request.
    #[derive(Default)]
    pub(crate) struct CannedTransport {
        responses: HashMap<String, Value>,
        pub(crate) requests: RefCell<Vec<(String, Option<String>)>>,
    }

    impl CannedTransport {
        pub(crate) fn with(mut self, path_and_query: &str, body: Value) -> Self {
            self.responses.insert(path_and_query.to_owned(), body);
            self
        }

        pub(crate) fn into_client(self) -> LxnsClient<Self> {
            LxnsClient::with_transport(self, Url::parse(DEFAULT_BASE_URL).unwrap())
        }
    }

    impl Transport for CannedTransport {
        fn get_json(&self, url: Url, token: Option<&UserToken>) -> Result<Value, ApiError> {
            let key = &url[Position::BeforePath..];
            self.requests.borrow_mut().push((
                key.to_owned(),
                token.map(|t| AsRef::<str>::as_ref(t).to_owned()),
            ));
            self.responses
                .get(key)
                .cloned()
                .ok_or_else(|| ApiError::Rejected {
                    code: 404,
                    message: format!("No canned response for {key}"),
                })
        }
    }
}
