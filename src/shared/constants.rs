/// Shown when the add-destination form is submitted with a missing field or photo
pub const MSG_FIELDS_REQUIRED: &str = "All fields must be filled, and a photo must be selected.";

/// Shown when the geocoder has no match for the entered address
pub const MSG_ADDRESS_NOT_FOUND: &str = "Address not found.";

/// Shown when the geocoder itself could not be reached or answered garbage
pub const MSG_ADDRESS_LOOKUP_FAILED: &str = "Address lookup failed. Please try again later.";

/// Shown when the last photo of a destination is about to be removed
pub const MSG_LAST_IMAGE: &str = "A destination must keep at least one photo.";

/// Returned when a draft is dismissed while its submission is still geocoding
pub const MSG_DRAFT_DISMISSED: &str = "The form was dismissed before the address was resolved.";

/// Multipart field name carrying photos
pub const IMAGE_FIELD_NAME: &str = "image";

/// Buffered change events per subscriber before it starts lagging
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
