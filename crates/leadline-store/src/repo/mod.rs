pub mod interactions;
pub mod leads;
pub mod tags;

pub use interactions::{InteractionNew, InteractionsRepo, RecentInteraction};
pub use leads::{LeadUpdate, LeadsRepo};
pub use tags::TagsRepo;
