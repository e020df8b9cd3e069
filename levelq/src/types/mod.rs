pub mod priority;
pub mod events;
pub mod record;
pub mod outcome;

pub use priority::{Level, EMPTY_LEVEL};
pub use events::{QueueAction, QueueEvent};
pub use record::HistoryRecord;
pub use outcome::Outcome;
