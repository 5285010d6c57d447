//! Typed shapes exchanged with the backend. The backend is authoritative for
//! all of these; local copies live in the query cache as replaceable
//! projections.

mod collection;
mod discovery;
mod extraction;
mod recipe;

pub use collection::{Collection, CollectionKind};
pub use discovery::{DiscoveryFeed, DiscoverySection};
pub use extraction::{CreditBalance, ExtractionJob, ExtractionSource, ExtractionStatus};
pub use recipe::{Ingredient, RatingSummary, Recipe, RecipeStep, RecipeUserData};
