use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::destinations::models::{Draft, ImageSelection};
use crate::features::destinations::services::destination_service::{
    validate_submission, DestinationService, DestinationSubmission, UpsertOutcome,
};
use crate::features::destinations::services::image_resolver::ResolvedImages;
use crate::shared::constants::MSG_DRAFT_DISMISSED;

/// Photos resolved into a draft's buffer
#[derive(Debug)]
pub struct AttachedImages {
    pub resolved: ResolvedImages,
    /// Buffer position of the first attached photo
    pub first_position: usize,
}

/// Add-destination form sessions.
///
/// A draft buffers resolved photos until submit. Dismissing it cancels its
/// token, so a geocoding result that arrives afterwards is dropped instead of
/// being written to the store. Drafts idle for longer than the TTL are closed
/// the same way by [`DraftService::sweep_expired`].
pub struct DraftService {
    drafts: RwLock<HashMap<Uuid, Draft>>,
    destinations: Arc<DestinationService>,
    ttl: TimeDelta,
}

impl DraftService {
    pub fn new(destinations: Arc<DestinationService>, ttl: Duration) -> Self {
        Self {
            drafts: RwLock::new(HashMap::new()),
            destinations,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    pub async fn open(&self) -> Draft {
        let draft = Draft::new();
        self.drafts.write().await.insert(draft.id, draft.clone());
        debug!("Draft opened: {}", draft.id);
        draft
    }

    pub async fn get(&self, id: Uuid) -> Result<Draft> {
        self.drafts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    /// Resolve photos and add the successes to the draft's buffer
    pub async fn attach(
        &self,
        id: Uuid,
        selections: Vec<ImageSelection>,
    ) -> Result<AttachedImages> {
        let token = self.get(id).await?.token;

        let resolved = self.destinations.resolve_images(selections).await;

        // Positions are taken under the same lock that extends the buffer
        let first_position = {
            let mut drafts = self.drafts.write().await;
            match drafts.get_mut(&id) {
                Some(draft) if !token.is_cancelled() => {
                    let first = draft.pending.len();
                    draft.pending.extend(resolved.attached.iter().cloned());
                    draft.touch();
                    Some(first)
                }
                _ => None,
            }
        };

        match first_position {
            Some(first_position) => {
                debug!(
                    "Draft {}: attached {} at {}, skipped {}",
                    id,
                    resolved.attached.len(),
                    first_position,
                    resolved.skipped.len()
                );
                Ok(AttachedImages {
                    resolved,
                    first_position,
                })
            }
            None => {
                warn!("Draft {} dismissed while resolving images", id);
                self.destinations.discard_images(&resolved.attached).await;
                Err(AppError::Conflict(MSG_DRAFT_DISMISSED.to_string()))
            }
        }
    }

    /// Close the form without saving
    pub async fn dismiss(&self, id: Uuid) -> Result<()> {
        let draft = self
            .drafts
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| Self::not_found(id))?;

        draft.token.cancel();
        self.destinations.discard_images(&draft.pending).await;
        info!("Draft dismissed: {} ({} pending images dropped)", id, draft.pending.len());
        Ok(())
    }

    /// Close every draft idle for longer than the TTL, dropping its photos.
    ///
    /// Returns the number of drafts closed.
    pub async fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let expired: Vec<Draft> = {
            let mut drafts = self.drafts.write().await;
            let ids: Vec<Uuid> = drafts
                .values()
                .filter(|draft| draft.is_expired(now, self.ttl))
                .map(|draft| draft.id)
                .collect();
            ids.iter().filter_map(|id| drafts.remove(id)).collect()
        };

        for draft in &expired {
            draft.token.cancel();
            self.destinations.discard_images(&draft.pending).await;
            debug!(
                "Draft expired: {} ({} pending images dropped)",
                draft.id,
                draft.pending.len()
            );
        }
        if !expired.is_empty() {
            info!("Closed {} expired drafts", expired.len());
        }
        expired.len()
    }

    /// Validate, geocode and commit the draft.
    ///
    /// Validation and geocoding failures keep the draft open for another try.
    pub async fn submit(
        &self,
        id: Uuid,
        address: String,
        description: String,
    ) -> Result<UpsertOutcome> {
        let draft = self.get(id).await?;
        validate_submission(&address, &description, draft.pending.len())?;

        let coordinate = tokio::select! {
            _ = draft.token.cancelled() => {
                return Err(AppError::Conflict(MSG_DRAFT_DISMISSED.to_string()));
            }
            result = self.destinations.geocode(&address) => result?,
        };

        // Liveness check before touching the store
        let closed = {
            let mut drafts = self.drafts.write().await;
            match drafts.get(&id) {
                Some(current) if !current.is_dismissed() => drafts.remove(&id),
                _ => None,
            }
        };
        let Some(closed) = closed else {
            warn!("Draft {} closed while geocoding '{}'", id, address);
            return Err(AppError::Conflict(MSG_DRAFT_DISMISSED.to_string()));
        };

        self.destinations
            .commit(
                DestinationSubmission {
                    address,
                    description,
                    images: closed.pending,
                },
                coordinate,
            )
            .await
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("Draft {} not found", id))
    }
}
