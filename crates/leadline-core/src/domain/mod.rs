pub mod email;
pub mod follow_up;
pub mod ids;
pub mod interaction;
pub mod lead;
pub mod phone;
pub mod status;
pub mod tag;

pub use email::{is_valid_email, normalize_email};
pub use follow_up::FollowUpMethod;
pub use ids::{InteractionId, LeadId, TagId};
pub use interaction::{Interaction, InteractionKind};
pub use lead::{Lead, LeadNew};
pub use phone::{is_valid_phone, with_calling_code};
pub use status::LeadStatus;
pub use tag::{dedupe_tags, normalize_tag_name, Tag, TagName};
