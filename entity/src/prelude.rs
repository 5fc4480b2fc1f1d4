pub use super::comet::Entity as Comet;
pub use super::flyby::Entity as Flyby;
pub use super::flyby_summary::Entity as FlybySummary;
pub use super::image_blob::Entity as ImageBlob;
