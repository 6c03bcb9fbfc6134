use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::Router;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use uuid::Uuid;

use crate::core::config::{DraftConfig, ImageConfig, MapConfig};
use crate::features::destinations::models::{Coordinate, ImageAttachment, ImageSelection};
use crate::features::destinations::routes;
use crate::features::destinations::services::{
    DestinationService, DraftService, GeocodeFailure, Geocoder, UploadImageResolver,
};
use crate::features::destinations::DestinationState;
use crate::modules::storage::ImageStorage;

const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// In-memory geocoder with a fixed address book
#[derive(Clone, Default)]
pub struct StubGeocoder {
    known: HashMap<String, Coordinate>,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl StubGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Geocoder whose every lookup is an adapter failure
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn with(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.known.insert(address.to_string(), coordinate);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of lookups performed so far
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = &self.failure {
            return Err(GeocodeFailure::Adapter(reason.clone()));
        }
        self.known
            .get(address)
            .copied()
            .ok_or(GeocodeFailure::NotFound)
    }
}

/// A resolved photo handle with no stored bytes behind it
pub fn attachment(file_name: &str) -> ImageAttachment {
    ImageAttachment {
        id: Uuid::now_v7(),
        file_name: file_name.to_string(),
        content_type: "image/jpeg".to_string(),
        size: (1_000usize..500_000).fake(),
    }
}

fn selection(file_name: &str, content_type: &str, header: &[u8]) -> ImageSelection {
    let mut data = header.to_vec();
    data.extend_from_slice(&[0u8; 32]);
    ImageSelection {
        file_name: file_name.to_string(),
        content_type: content_type.to_string(),
        data: Bytes::from(data),
    }
}

/// A small selection that passes the JPEG signature check
pub fn jpeg_selection(file_name: &str) -> ImageSelection {
    selection(file_name, "image/jpeg", JPEG_HEADER)
}

/// A small selection that passes the PNG signature check
pub fn png_selection(file_name: &str) -> ImageSelection {
    selection(file_name, "image/png", PNG_HEADER)
}

/// Raw JPEG-looking bytes for multipart uploads
pub fn jpeg_bytes() -> Vec<u8> {
    jpeg_selection("upload.jpg").data.to_vec()
}

pub fn random_description() -> String {
    Sentence(3..8).fake()
}

/// Destination service with in-memory storage and a real upload resolver
pub fn test_destination_service(geocoder: StubGeocoder) -> Arc<DestinationService> {
    let storage = Arc::new(ImageStorage::new());
    let resolver = Arc::new(UploadImageResolver::new(
        Arc::clone(&storage),
        ImageConfig::default().max_image_size,
    ));
    Arc::new(DestinationService::new(
        Arc::new(geocoder),
        resolver,
        storage,
    ))
}

pub fn test_state(geocoder: StubGeocoder) -> DestinationState {
    let destinations = test_destination_service(geocoder);
    DestinationState {
        drafts: Arc::new(DraftService::new(
            Arc::clone(&destinations),
            DraftConfig::default().ttl,
        )),
        destinations,
        images: ImageConfig {
            max_images_per_upload: 3,
            ..ImageConfig::default()
        },
        map: MapConfig::default(),
    }
}

/// Feature router wired to the given geocoder
pub fn test_router(geocoder: StubGeocoder) -> Router {
    routes::routes(test_state(geocoder), 1024 * 1024)
}
