pub mod catalog;
pub mod profile;

pub use catalog::{CatalogEntry, Coupon, EntryId, KeySpecs, Offer};
pub use profile::{BudgetRange, Interaction, InteractionKind, PriorityMode, UseCase, UserProfile};
