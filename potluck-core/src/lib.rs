//! Domain logic for Potluck.
//!
//! Everything in this crate is pure: no database, no network. The server
//! loads rows, hands them to these types, and writes back whatever they
//! compute. That keeps the rules for rating aggregation, saved-set
//! reconciliation, listing order and pagination testable on their own.

pub mod difficulty;
pub mod error;
pub mod listing;
pub mod rating;
pub mod saved;
pub mod shops;
pub mod suggestions;

pub use difficulty::Difficulty;
pub use error::CoreError;
pub use listing::{sort_recipes, Listable, Page, PageRequest, SortMode};
pub use rating::{Aggregate, RatingEntry, RatingLedger, RatingValue, RecordOutcome};
pub use saved::{saved_official_ids, SavedSet};
pub use shops::{normalize_shop_refs, ShopRef};
pub use suggestions::ItemSuggestions;
