//! Domain types for the travel planning pipeline

mod credentials;
mod itinerary;
mod request;
mod source;

pub use credentials::PipelineCredentials;
pub use itinerary::{DEFAULT_EXPORT_FILE, DaySection, ItineraryDocument, ItineraryWarning};
pub use request::{Accommodation, Interest, Pace, Request, RequestDraft, RequestError, Transport};
pub use source::{MAX_SOURCES, SourceReference};
