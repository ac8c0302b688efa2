use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::cell::Cell;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, warn};

use super::client::{ServiceConfig, ServiceError};
use super::model::ModelInfo;
use crate::input::RevId;
use crate::scoring::{
    batches, Batch, FeatureCache, RevIds, ScoreDocument, ScoreProcessor, ScoreStream,
    ScoredRevision,
};

/// Scores revisions against an ORES-compatible scoring service.
///
/// Ids are requested in batches of `batch_size`:
/// `GET {host}/v3/scores/{context}/?models={model}&revids=1|2|3`.
/// Feature cache entries ride along as extra query parameters, which the
/// service injects in place of extracted values.
pub struct RemoteScoreProcessor {
    client: reqwest::Client,
    config: ServiceConfig,
    model: ModelInfo,
    version_checked: Cell<bool>,
}

impl RemoteScoreProcessor {
    pub fn new(client: reqwest::Client, config: ServiceConfig, model: ModelInfo) -> Self {
        Self {
            client,
            config,
            model,
            version_checked: Cell::new(false),
        }
    }

    fn scores_url(&self) -> String {
        format!(
            "{}/v3/scores/{}/",
            self.config.host.trim_end_matches('/'),
            self.model.context
        )
    }

    fn query_params(&self, rev_ids: &[RevId], cache: &FeatureCache) -> Vec<(String, String)> {
        let revids = rev_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join("|");

        let mut params = vec![
            ("models".to_string(), self.model.name.clone()),
            ("revids".to_string(), revids),
        ];
        params.extend(cache.iter().map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        }));
        params
    }

    /// Score one batch of ids, returning documents in the same order.
    pub async fn score_batch(
        &self,
        rev_ids: &[RevId],
        cache: &FeatureCache,
    ) -> Result<Vec<ScoredRevision>> {
        let url = self.scores_url();
        let params = self.query_params(rev_ids, cache);

        debug!(count = rev_ids.len(), url = %url, "requesting scores");

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(self.config.retries);

        // Only transient failures come back as the outer error, so
        // permanent ones end the retry loop on the first attempt
        let body = Retry::spawn(retry_strategy, || async {
            match self.request(&url, &params).await {
                Ok(body) => Ok(Ok(body)),
                Err(e) if e.is_transient() => {
                    warn!(error = %e, "transient scoring failure, retrying");
                    Err(e)
                }
                Err(e) => Ok(Err(e)),
            }
        })
        .await
        .and_then(|attempt| attempt)
        .with_context(|| {
            format!(
                "Failed to score {} revisions starting at {}",
                rev_ids.len(),
                rev_ids.first().map(|id| id.get()).unwrap_or_default()
            )
        })?;

        let (scored, version) = extract_scores(body, &self.model, rev_ids)?;
        self.check_version(version.as_deref());
        Ok(scored)
    }

    async fn request(&self, url: &str, params: &[(String, String)]) -> Result<Value, ServiceError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(ServiceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        response.json::<Value>().await.map_err(ServiceError::Body)
    }

    fn check_version(&self, reported: Option<&str>) {
        if self.version_checked.replace(true) {
            return;
        }
        if let (Some(expected), Some(reported)) = (self.model.version.as_deref(), reported) {
            if expected != reported {
                warn!(
                    model = %self.model.name,
                    expected,
                    reported,
                    "scoring service model version differs from model file"
                );
            }
        }
    }

    async fn resolve_batch(&self, batch: Batch, cache: &FeatureCache) -> Vec<Result<ScoredRevision>> {
        let mut items = Vec::with_capacity(batch.rev_ids.len() + 1);

        if !batch.rev_ids.is_empty() {
            match self.score_batch(&batch.rev_ids, cache).await {
                Ok(scored) => items.extend(scored.into_iter().map(Ok)),
                Err(e) => {
                    items.push(Err(e));
                    return items;
                }
            }
        }

        if let Some(e) = batch.error {
            items.push(Err(e));
        }
        items
    }
}

impl ScoreProcessor for RemoteScoreProcessor {
    fn score<'a>(&'a self, rev_ids: RevIds<'a>, cache: &'a FeatureCache) -> ScoreStream<'a> {
        stream::iter(batches(rev_ids, self.config.batch_size))
            .then(move |batch| self.resolve_batch(batch, cache))
            .flat_map(stream::iter)
            .boxed_local()
    }
}

/// Pull one score document per requested id out of a service response.
///
/// Returns the documents in `rev_ids` order plus the model version the
/// service reported, if any. Ids the response says nothing about get a
/// `ScoreMissing` error document.
pub fn extract_scores(
    body: Value,
    model: &ModelInfo,
    rev_ids: &[RevId],
) -> Result<(Vec<ScoredRevision>, Option<String>), ServiceError> {
    let context = body
        .get(&model.context)
        .filter(|c| c.is_object())
        .ok_or_else(|| ServiceError::MissingContext(model.context.clone()))?;

    let version = context
        .pointer(&format!("/models/{}/version", model.name))
        .and_then(Value::as_str)
        .map(str::to_string);

    let scores = context.get("scores");

    let scored = rev_ids
        .iter()
        .map(|id| {
            let entry = scores
                .and_then(|s| s.get(id.to_string()))
                .and_then(|s| s.get(&model.name));

            let document = match entry {
                None => ScoreDocument::error(
                    "ScoreMissing",
                    format!("no {} score returned for revision {}", model.name, id),
                ),
                Some(entry) => {
                    let inner = entry.get("score").or_else(|| entry.get("error"));
                    ScoreDocument::from_value(inner.unwrap_or(entry).clone())
                }
            };
            (*id, document)
        })
        .collect();

    Ok((scored, version))
}
