mod destination_handler;
mod draft_handler;
mod image_handler;
mod upload;

pub use destination_handler::*;
pub use draft_handler::*;
pub use image_handler::*;
