pub mod geo;
pub mod outbreak;
pub mod thread;

pub use geo::{Coordinates, GeoPoint, DEFAULT_POINT_WEIGHT};
pub use outbreak::{MetricsBundle, NewsDetailRecord, OutbreakRecord};
pub use thread::{ConversationThread, RunStatus, ThreadMessage};
