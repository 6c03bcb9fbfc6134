use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::destinations::models::{Destination, ImageAttachment};

/// Where a submission with a given address lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRecord {
    /// A destination with exactly this name already exists at this index
    Existing(usize),
    New,
}

/// Upsert-by-name policy.
///
/// Matching is exact string equality on the entered address, not on the
/// geocoded location: "123 Main St" and "123 Main Street" are different
/// destinations even if they resolve to the same point.
pub fn resolve_target_record(store: &DestinationStore, address: &str) -> TargetRecord {
    match store.find_index_by_name(address) {
        Some(index) => TargetRecord::Existing(index),
        None => TargetRecord::New,
    }
}

/// Ordered in-memory collection of destinations.
///
/// Not synchronized; the owning service serializes access.
#[derive(Debug, Default)]
pub struct DestinationStore {
    destinations: Vec<Destination>,
}

impl DestinationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a destination, returning its index
    pub fn add(&mut self, destination: Destination) -> usize {
        self.destinations.push(destination);
        self.destinations.len() - 1
    }

    /// Index of the first destination whose name equals `name` exactly
    pub fn find_index_by_name(&self, name: &str) -> Option<usize> {
        self.destinations.iter().position(|d| d.name == name)
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.id == id)
    }

    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        self.destinations.iter().position(|d| d.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Destination> {
        self.destinations.get(index)
    }

    pub fn update_description(
        &mut self,
        index: usize,
        description: String,
    ) -> Result<&Destination> {
        let destination = self.get_mut(index)?;
        destination.description = description;
        destination.touch();
        Ok(destination)
    }

    /// Append images after the existing ones, keeping their order
    pub fn append_images(
        &mut self,
        index: usize,
        images: Vec<ImageAttachment>,
    ) -> Result<&Destination> {
        let destination = self.get_mut(index)?;
        destination.images.extend(images);
        destination.touch();
        Ok(destination)
    }

    /// Remove exactly one image. No minimum is enforced here.
    pub fn remove_image(&mut self, index: usize, position: usize) -> Result<ImageAttachment> {
        let destination = self.get_mut(index)?;
        if position >= destination.images.len() {
            return Err(AppError::NotFound(format!(
                "Image {} not found on destination {}",
                position, destination.id
            )));
        }
        let removed = destination.images.remove(position);
        destination.touch();
        Ok(removed)
    }

    pub fn remove(&mut self, index: usize) -> Result<Destination> {
        if index >= self.destinations.len() {
            return Err(Self::index_not_found(index));
        }
        Ok(self.destinations.remove(index))
    }

    /// Snapshot of all destinations in store order
    pub fn list(&self) -> Vec<Destination> {
        self.destinations.clone()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Destination> {
        self.destinations
            .get_mut(index)
            .ok_or_else(|| Self::index_not_found(index))
    }

    fn index_not_found(index: usize) -> AppError {
        AppError::NotFound(format!("No destination at position {}", index))
    }
}
