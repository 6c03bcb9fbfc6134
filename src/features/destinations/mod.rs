pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod workers;

pub use handlers::DestinationState;
pub use services::{DestinationService, DraftService, NominatimGeocoder, UploadImageResolver};
