pub mod mission;
pub mod nudge;
pub mod product;
pub mod profile;
