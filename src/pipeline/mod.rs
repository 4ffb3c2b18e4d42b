//! # Track Enrichment Pipeline
//!
//! The stages run one after the other on an in-memory list of tracks:
//!
//! ```text
//! liked songs (paginated)
//!     → audio features (batches of 100)
//!     → artist genres (one request per distinct artist)
//!     → classification
//!     → grouping
//!     → playlist creation (tracks added in chunks of 100)
//! ```
//!
//! Every stage reports `{current}/{total}` on the passed progress bar.
//! Failed enrichment requests are logged and skipped so a single bad batch
//! does not lose the whole library.

pub mod classify;
pub mod enrich;
pub mod playlists;
