//! Itinerary documents and the map/timeline synchronisation logic built on
//! top of them.

pub mod correlate;
pub mod document;
pub mod focus;
pub mod sample;
pub mod scroll;
pub mod sequence;
pub mod session;
pub mod store;

pub use correlate::{event_for_pin, pin_for_event, EventTarget};
pub use document::{parse_itinerary, DocumentError};
pub use focus::{FocusController, InputSource};
pub use sample::sample_itinerary;
pub use scroll::{ScrollSync, ScrollTarget};
pub use sequence::{PinSequence, SequencedPin};
pub use session::ItinerarySession;
pub use store::{DocumentSource, ItineraryStore, LoadedItinerary, StoreError};
