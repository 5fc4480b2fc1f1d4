//! Database model type aliases.
//!
//! Convenient aliases for the SeaORM models generated in the `entity` crate so the rest of
//! the server does not import entity modules directly.

/// Registered comet.
///
/// # Fields (from `entity::comet::Model`)
/// - `id` - Primary key
/// - `designation` - NASA designation, unique (e.g. `1P/Halley`)
/// - `name` - Optional common name
/// - `created_at` / `updated_at` - Record timestamps
pub type CometModel = entity::comet::Model;

/// Perihelion passage of a comet.
///
/// # Fields (from `entity::flyby::Model`)
/// - `id` - Primary key, used to build window keys
/// - `comet_id` - Owning comet
/// - `year` - Perihelion year, possibly fractional, `None` when unknown
/// - `description` - Free text
/// - `created_at` - Record timestamp
pub type FlybyModel = entity::flyby::Model;

/// Generated summary of a flyby window.
///
/// # Fields (from `entity::flyby_summary::Model`)
/// - `id` - Primary key
/// - `comet_id` - Owning comet
/// - `previous_flyby` / `next_flyby` - Flyby references in document shape
/// - `title` / `body` - Generated narrative
/// - `image_url` - Illustration, attached at most once
/// - `model` - Generation model identifier
/// - `generated_at` - Generation timestamp
pub type SummaryModel = entity::flyby_summary::Model;

/// Stored illustration bytes.
pub type ImageBlobModel = entity::image_blob::Model;
