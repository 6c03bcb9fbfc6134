use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::destinations::models::{
    Coordinate, CreateDestination, Destination, DestinationEvent, ImageAttachment, ImageSelection,
};
use crate::features::destinations::services::destination_store::{
    resolve_target_record, DestinationStore, TargetRecord,
};
use crate::features::destinations::services::geocoding_service::{GeocodeFailure, Geocoder};
use crate::features::destinations::services::image_resolver::{
    resolve_selections, ImageResolver, ResolvedImages,
};
use crate::modules::storage::{ImageStorage, StoredImage};
use crate::shared::constants::{
    EVENT_CHANNEL_CAPACITY, MSG_ADDRESS_LOOKUP_FAILED, MSG_ADDRESS_NOT_FOUND, MSG_FIELDS_REQUIRED,
    MSG_LAST_IMAGE,
};

/// Raw input of the add-destination form
#[derive(Debug, Clone)]
pub struct DestinationSubmission {
    pub address: String,
    pub description: String,
    pub images: Vec<ImageAttachment>,
}

/// Result of committing a submission
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub destination: Destination,
    /// False when an existing destination with the same name was updated
    pub created: bool,
}

/// Required-field check that runs before any geocoding
pub fn validate_submission(address: &str, description: &str, image_count: usize) -> Result<()> {
    if address.is_empty() || description.is_empty() || image_count == 0 {
        return Err(AppError::Validation(MSG_FIELDS_REQUIRED.to_string()));
    }
    Ok(())
}

/// Owns the destination store and is its only mutation surface
pub struct DestinationService {
    store: RwLock<DestinationStore>,
    geocoder: Arc<dyn Geocoder>,
    resolver: Arc<dyn ImageResolver>,
    image_storage: Arc<ImageStorage>,
    events: broadcast::Sender<DestinationEvent>,
}

impl DestinationService {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        resolver: Arc<dyn ImageResolver>,
        image_storage: Arc<ImageStorage>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store: RwLock::new(DestinationStore::new()),
            geocoder,
            resolver,
            image_storage,
            events,
        }
    }

    /// Subscribe to change events emitted after each mutation
    pub fn subscribe(&self) -> broadcast::Receiver<DestinationEvent> {
        self.events.subscribe()
    }

    pub async fn list(&self) -> Vec<Destination> {
        self.store.read().await.list()
    }

    pub async fn get(&self, id: Uuid) -> Result<Destination> {
        self.store
            .read()
            .await
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn image(&self, id: Uuid) -> Result<StoredImage> {
        self.image_storage
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Image {} not found", id)))
    }

    /// Resolve picked photos into stored handles
    pub async fn resolve_images(&self, selections: Vec<ImageSelection>) -> ResolvedImages {
        resolve_selections(self.resolver.as_ref(), selections).await
    }

    /// Drop the bytes of handles that will never be committed
    pub async fn discard_images(&self, images: &[ImageAttachment]) {
        self.image_storage
            .delete_many(images.iter().map(|i| i.id))
            .await;
    }

    /// Geocode an address. Both failure kinds are user-correctable and never retried.
    pub async fn geocode(&self, address: &str) -> Result<Coordinate> {
        match self.geocoder.resolve(address).await {
            Ok(coordinate) => {
                debug!(
                    "Resolved '{}' to ({}, {})",
                    address, coordinate.latitude, coordinate.longitude
                );
                Ok(coordinate)
            }
            Err(GeocodeFailure::NotFound) => {
                warn!("Address not found: '{}'", address);
                Err(AppError::GeocodeNotFound(MSG_ADDRESS_NOT_FOUND.to_string()))
            }
            Err(GeocodeFailure::Adapter(reason)) => {
                warn!("Geocoder failed for '{}': {}", address, reason);
                Err(AppError::GeocodeFailed(MSG_ADDRESS_LOOKUP_FAILED.to_string()))
            }
        }
    }

    /// Full creation workflow: validate, geocode, upsert by name
    pub async fn create_or_update(
        &self,
        submission: DestinationSubmission,
    ) -> Result<UpsertOutcome> {
        validate_submission(
            &submission.address,
            &submission.description,
            submission.images.len(),
        )?;
        let coordinate = self.geocode(&submission.address).await?;
        self.commit(submission, coordinate).await
    }

    /// Apply an already validated and geocoded submission.
    ///
    /// Target resolution happens under the write lock so two concurrent
    /// submissions with the same address cannot both create a record.
    pub async fn commit(
        &self,
        submission: DestinationSubmission,
        coordinate: Coordinate,
    ) -> Result<UpsertOutcome> {
        let mut store = self.store.write().await;

        let outcome = match resolve_target_record(&store, &submission.address) {
            TargetRecord::Existing(index) => {
                store.update_description(index, submission.description)?;
                let destination = store.append_images(index, submission.images)?.clone();
                UpsertOutcome {
                    destination,
                    created: false,
                }
            }
            TargetRecord::New => {
                let destination = Destination::new(CreateDestination {
                    name: submission.address,
                    description: submission.description,
                    coordinate,
                    images: submission.images,
                });
                let index = store.add(destination.clone());
                debug!("Destination stored at position {} of {}", index, store.len());
                UpsertOutcome {
                    destination,
                    created: true,
                }
            }
        };
        drop(store);

        let id = outcome.destination.id;
        if outcome.created {
            info!("Destination created: {} ('{}')", id, outcome.destination.name);
            self.emit(DestinationEvent::Created { id });
        } else {
            info!("Destination updated: {} ('{}')", id, outcome.destination.name);
            self.emit(DestinationEvent::Updated { id });
        }

        Ok(outcome)
    }

    pub async fn update_description(&self, id: Uuid, description: String) -> Result<Destination> {
        if description.is_empty() {
            return Err(AppError::Validation("Description must not be empty".to_string()));
        }

        let mut store = self.store.write().await;
        let index = store.index_of(id).ok_or_else(|| Self::not_found(id))?;
        let destination = store.update_description(index, description)?.clone();
        drop(store);

        self.emit(DestinationEvent::Updated { id });
        Ok(destination)
    }

    /// Append already resolved images to a destination
    pub async fn append_images(
        &self,
        id: Uuid,
        images: Vec<ImageAttachment>,
    ) -> Result<Destination> {
        let mut store = self.store.write().await;
        let Some(index) = store.index_of(id) else {
            drop(store);
            self.discard_images(&images).await;
            return Err(Self::not_found(id));
        };
        let destination = store.append_images(index, images)?.clone();
        drop(store);

        self.emit(DestinationEvent::Updated { id });
        Ok(destination)
    }

    /// Remove one photo. The last remaining photo cannot be removed.
    pub async fn remove_image(&self, id: Uuid, position: usize) -> Result<Destination> {
        let mut store = self.store.write().await;
        let index = store.index_of(id).ok_or_else(|| Self::not_found(id))?;

        let image_count = store.get(index).map_or(0, |d| d.images.len());
        if image_count == 1 && position == 0 {
            return Err(AppError::Validation(MSG_LAST_IMAGE.to_string()));
        }

        let removed = store.remove_image(index, position)?;
        let destination = store
            .get(index)
            .cloned()
            .ok_or_else(|| Self::not_found(id))?;
        drop(store);

        self.discard_images(std::slice::from_ref(&removed)).await;
        info!("Removed image {} from destination {}", removed.id, id);
        self.emit(DestinationEvent::ImageRemoved { id, position });
        Ok(destination)
    }

    /// Delete a destination together with its photos
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut store = self.store.write().await;
        let index = store.index_of(id).ok_or_else(|| Self::not_found(id))?;
        let removed = store.remove(index)?;
        drop(store);

        self.discard_images(&removed.images).await;
        info!("Destination deleted: {} ('{}')", id, removed.name);
        self.emit(DestinationEvent::Deleted { id });
        Ok(())
    }

    fn emit(&self, event: DestinationEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("Destination {} not found", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{attachment, test_destination_service, StubGeocoder};

    fn submission(
        address: &str,
        description: &str,
        images: Vec<ImageAttachment>,
    ) -> DestinationSubmission {
        DestinationSubmission {
            address: address.to_string(),
            description: description.to_string(),
            images,
        }
    }

    fn main_st() -> Coordinate {
        Coordinate::new(39.7817, -89.6501).unwrap()
    }

    #[tokio::test]
    async fn test_validation_failures_leave_store_unchanged() {
        let service = test_destination_service(StubGeocoder::new().with("123 Main St", main_st()));
        let img = attachment("img1.jpg");

        let cases = vec![
            submission("", "Nice view", vec![img.clone()]),
            submission("123 Main St", "", vec![img.clone()]),
            submission("123 Main St", "Nice view", vec![]),
        ];
        for case in cases {
            let err = service.create_or_update(case).await.unwrap_err();
            match err {
                AppError::Validation(msg) => assert_eq!(msg, MSG_FIELDS_REQUIRED),
                other => panic!("expected validation error, got {:?}", other),
            }
        }

        assert!(service.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_validation_happens_before_geocoding() {
        let geocoder = StubGeocoder::new();
        let calls = geocoder.calls();
        let service = test_destination_service(geocoder);

        let _ = service
            .create_or_update(submission("", "desc", vec![attachment("a.jpg")]))
            .await;

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_address_is_geocode_not_found() {
        let service = test_destination_service(StubGeocoder::new());

        let err = service
            .create_or_update(submission("Atlantis", "Sunken", vec![attachment("a.jpg")]))
            .await
            .unwrap_err();

        match err {
            AppError::GeocodeNotFound(msg) => assert_eq!(msg, MSG_ADDRESS_NOT_FOUND),
            other => panic!("expected geocode error, got {:?}", other),
        }
        assert!(service.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_adapter_failure_is_distinct_and_leaves_store_unchanged() {
        let service = test_destination_service(StubGeocoder::failing("connection refused"));

        let err = service
            .create_or_update(submission("Paris", "Louvre", vec![attachment("a.jpg")]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::GeocodeFailed(_)));
        assert!(service.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_then_update_same_address() {
        let service = test_destination_service(StubGeocoder::new().with("123 Main St", main_st()));
        let img1 = attachment("img1.jpg");
        let img2 = attachment("img2.jpg");

        let first = service
            .create_or_update(submission("123 Main St", "Nice view", vec![img1.clone()]))
            .await
            .unwrap();
        assert!(first.created);
        assert_eq!(first.destination.name, "123 Main St");
        assert_eq!(first.destination.description, "Nice view");
        assert_eq!(first.destination.coordinate, main_st());
        assert_eq!(first.destination.images, vec![img1.clone()]);

        let second = service
            .create_or_update(submission("123 Main St", "Updated", vec![img2.clone()]))
            .await
            .unwrap();
        assert!(!second.created);

        let all = service.list().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, first.destination.id);
        assert_eq!(all[0].coordinate, main_st());
        assert_eq!(all[0].description, "Updated");
        assert_eq!(all[0].images, vec![img1, img2]);
    }

    #[tokio::test]
    async fn test_same_place_different_text_is_a_new_destination() {
        let here = main_st();
        let service = test_destination_service(
            StubGeocoder::new()
                .with("123 Main St", here)
                .with("123 Main Street", here),
        );

        service
            .create_or_update(submission("123 Main St", "a", vec![attachment("a.jpg")]))
            .await
            .unwrap();
        let outcome = service
            .create_or_update(submission("123 Main Street", "b", vec![attachment("b.jpg")]))
            .await
            .unwrap();

        assert!(outcome.created);
        assert_eq!(service.list().await.len(), 2);
    }

    #[tokio::test]
    async fn test_new_destination_keeps_submission_image_order() {
        let service = test_destination_service(
            StubGeocoder::new().with("Hanoi", Coordinate::new(21.0285, 105.8542).unwrap()),
        );
        let images: Vec<_> = (0..3).map(|i| attachment(&format!("{}.jpg", i))).collect();

        let outcome = service
            .create_or_update(submission("Hanoi", "Pho", images.clone()))
            .await
            .unwrap();

        let stored = service.get(outcome.destination.id).await.unwrap();
        assert_eq!(stored.images, images);
        assert_eq!(stored, outcome.destination);
    }

    #[tokio::test]
    async fn test_remove_image_guards_last_photo() {
        let service = test_destination_service(
            StubGeocoder::new().with("Bern", Coordinate::new(46.948, 7.4474).unwrap()),
        );
        let img1 = attachment("1.jpg");
        let img2 = attachment("2.jpg");
        let created = service
            .create_or_update(submission("Bern", "Bears", vec![img1.clone(), img2.clone()]))
            .await
            .unwrap()
            .destination;

        let after = service.remove_image(created.id, 0).await.unwrap();
        assert_eq!(after.images, vec![img2]);

        let err = service.remove_image(created.id, 0).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(service.get(created.id).await.unwrap().images.len(), 1);

        let err = service.remove_image(created.id, 7).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_description_and_delete() {
        let service = test_destination_service(
            StubGeocoder::new().with("Oslo", Coordinate::new(59.9139, 10.7522).unwrap()),
        );
        let id = service
            .create_or_update(submission("Oslo", "Fjords", vec![attachment("a.jpg")]))
            .await
            .unwrap()
            .destination
            .id;

        let updated = service.update_description(id, "Opera house".to_string()).await.unwrap();
        assert_eq!(updated.description, "Opera house");
        assert!(matches!(
            service.update_description(id, String::new()).await,
            Err(AppError::Validation(_))
        ));

        service.delete(id).await.unwrap();
        assert!(matches!(service.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_each_mutation_emits_one_event() {
        let service = test_destination_service(
            StubGeocoder::new().with("Rome", Coordinate::new(41.9028, 12.4964).unwrap()),
        );
        let mut events = service.subscribe();

        let id = service
            .create_or_update(submission(
                "Rome",
                "Colosseum",
                vec![attachment("a.jpg"), attachment("b.jpg")],
            ))
            .await
            .unwrap()
            .destination
            .id;
        service
            .create_or_update(submission("Rome", "Forum", vec![attachment("c.jpg")]))
            .await
            .unwrap();
        service
            .update_description(id, "Trevi fountain".to_string())
            .await
            .unwrap();
        service.remove_image(id, 1).await.unwrap();
        service.delete(id).await.unwrap();

        assert_eq!(events.recv().await.unwrap(), DestinationEvent::Created { id });
        assert_eq!(events.recv().await.unwrap(), DestinationEvent::Updated { id });
        assert_eq!(events.recv().await.unwrap(), DestinationEvent::Updated { id });
        assert_eq!(
            events.recv().await.unwrap(),
            DestinationEvent::ImageRemoved { id, position: 1 }
        );
        assert_eq!(events.recv().await.unwrap(), DestinationEvent::Deleted { id });
        assert!(events.try_recv().is_err());
    }
}
