mod destination;
mod draft;
mod event;
mod image_attachment;

pub use destination::{Coordinate, CreateDestination, Destination};
pub use draft::Draft;
pub use event::DestinationEvent;
pub use image_attachment::{ImageAttachment, ImageSelection};
