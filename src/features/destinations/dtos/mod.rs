mod destination_dto;
mod draft_dto;

pub use destination_dto::*;
pub use draft_dto::*;
