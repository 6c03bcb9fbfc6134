mod destination_service;
mod destination_store;
mod draft_service;
mod geocoding_service;
mod image_resolver;

pub use destination_service::{DestinationService, DestinationSubmission, UpsertOutcome};
pub use draft_service::DraftService;
pub use geocoding_service::{GeocodeFailure, Geocoder, NominatimGeocoder};
pub use image_resolver::{ResolvedImages, SkippedImage, UploadImageResolver};
