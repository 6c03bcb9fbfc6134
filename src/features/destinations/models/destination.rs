use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ImageAttachment;

/// A point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside the WGS84 range
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        valid.then_some(Self {
            latitude,
            longitude,
        })
    }
}

/// One saved place with its photos
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub id: Uuid,
    /// Address text exactly as entered; the upsert key
    pub name: String,
    pub description: String,
    /// Set once from the geocoding result
    pub coordinate: Coordinate,
    /// Display order
    pub images: Vec<ImageAttachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new destination
#[derive(Debug, Clone)]
pub struct CreateDestination {
    pub name: String,
    pub description: String,
    pub coordinate: Coordinate,
    pub images: Vec<ImageAttachment>,
}

impl Destination {
    pub fn new(input: CreateDestination) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            coordinate: input.coordinate,
            images: input.images,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
