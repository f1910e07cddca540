//! Remote question bank synchronization.
//!
//! The remote side is a JSON document database exposing a Firebase-style
//! REST interface: `GET {base}/{collection}.json` returns every question
//! keyed by its remote id, `PATCH {base}/{collection}/{id}.json` updates
//! fields of one question. Imports replace the local bank wholesale; the
//! last write wins.

use crate::db::{CardStore, DbResult};
use crate::models::{Difficulty, NewCard, Tally};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport failure. The request URL is stripped since it carries the
    /// auth token.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
    #[error("remote returned status {0}")]
    Status(u16),
    #[error("invalid question bank: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

/// A question as stored in the remote bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteQuestion {
    /// Key of the question in the remote collection.
    #[serde(skip)]
    pub remote_id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub incorrect_count: u32,
}

impl RemoteQuestion {
    /// Convert into an insertable card. Unknown difficulty labels fall back
    /// to the lowest tier.
    pub fn into_new_card(self) -> NewCard {
        let difficulty = self.difficulty.parse::<Difficulty>().unwrap_or_else(|e| {
            warn!(remote_id = %self.remote_id, error = %e, "unrecognized difficulty");
            Difficulty::default()
        });
        NewCard::new(self.category, self.question, self.answer)
            .with_difficulty(difficulty)
            .with_remote_id(self.remote_id)
            .with_tally(Tally {
                correct: self.correct_count,
                incorrect: self.incorrect_count,
            })
    }
}

/// The collection body comes back as an object keyed by id, as an array
/// when every key is a small integer, or as `null` when empty.
#[derive(Deserialize)]
#[serde(untagged)]
enum CollectionBody {
    Keyed(BTreeMap<String, RemoteQuestion>),
    Listed(Vec<Option<RemoteQuestion>>),
}

/// Decode a collection body into questions ordered by remote id.
pub fn parse_bank(body: &str) -> SyncResult<Vec<RemoteQuestion>> {
    let parsed: Option<CollectionBody> = serde_json::from_str(body)?;
    let questions = match parsed {
        None => Vec::new(),
        Some(CollectionBody::Keyed(map)) => map
            .into_iter()
            .map(|(id, mut q)| {
                q.remote_id = id;
                q
            })
            .collect(),
        Some(CollectionBody::Listed(list)) => list
            .into_iter()
            .enumerate()
            .filter_map(|(i, q)| {
                q.map(|mut q| {
                    q.remote_id = i.to_string();
                    q
                })
            })
            .collect(),
    };
    Ok(questions)
}

/// Source of truth for the shared question bank.
pub trait RemoteBank {
    /// Fetch the whole bank.
    fn fetch(&self) -> impl Future<Output = SyncResult<Vec<RemoteQuestion>>> + Send;

    /// Overwrite the answer counters of one question.
    fn push_tally(
        &self,
        remote_id: &str,
        tally: Tally,
    ) -> impl Future<Output = SyncResult<()>> + Send;
}

/// Connection settings for [`HttpRemoteBank`].
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub base_url: String,
    pub collection: String,
    pub auth_token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpRemoteBank {
    client: reqwest::Client,
    settings: RemoteSettings,
}

impl HttpRemoteBank {
    pub fn new(settings: RemoteSettings) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { client, settings })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.settings.auth_token {
            Some(token) => req.query(&[("auth", token)]),
            None => req,
        }
    }
}

impl RemoteBank for HttpRemoteBank {
    async fn fetch(&self) -> SyncResult<Vec<RemoteQuestion>> {
        let req = self.client.get(self.url(&self.settings.collection));
        let response = self.authorize(req).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_bank(&body)
    }

    async fn push_tally(&self, remote_id: &str, tally: Tally) -> SyncResult<()> {
        let path = format!("{}/{}", self.settings.collection, remote_id);
        let body = serde_json::json!({
            "correctCount": tally.correct,
            "incorrectCount": tally.incorrect,
        });
        let response = self
            .authorize(self.client.patch(self.url(&path)))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// What a sync attempt did to the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The local bank now mirrors the remote one.
    Synced { imported: usize },
    /// The fetch failed; local cards are untouched.
    Offline { reason: String, local_cards: usize },
}

/// Apply a finished fetch to the store: replace everything on success,
/// keep the local snapshot on failure.
pub fn apply_fetch(
    store: &mut CardStore,
    fetched: SyncResult<Vec<RemoteQuestion>>,
) -> DbResult<SyncOutcome> {
    match fetched {
        Ok(questions) => {
            let cards: Vec<NewCard> = questions
                .into_iter()
                .map(RemoteQuestion::into_new_card)
                .collect();
            let imported = store.replace_all(&cards)?;
            info!(imported, "question bank synced");
            Ok(SyncOutcome::Synced { imported })
        }
        Err(err) => {
            warn!(error = %err, "remote fetch failed, keeping local cards");
            Ok(SyncOutcome::Offline {
                reason: err.to_string(),
                local_cards: store.card_count()?,
            })
        }
    }
}

pub async fn sync_from_remote<B: RemoteBank>(
    store: &mut CardStore,
    bank: &B,
) -> DbResult<SyncOutcome> {
    let fetched = bank.fetch().await;
    apply_fetch(store, fetched)
}
