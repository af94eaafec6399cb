// src/engine/mod.rs

pub mod directory;
pub mod feed;
pub mod pass;
pub mod selection;
pub mod session;
pub mod status;

pub use directory::{OfficerDirectory, OfficerIdentity};
pub use feed::{FeedSnapshot, TargetFeed};
pub use pass::{PassConfirmation, PassTransaction};
pub use selection::{SelectionMode, SelectionSet, ToggleOutcome};
pub use session::{AllocationSession, PassReceipt, SessionSettings, SessionView};
pub use status::{bucket_of, is_selectable, Bucket, DisplayLocale};
