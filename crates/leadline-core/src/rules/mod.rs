pub mod follow_up;
pub mod pipeline;

pub use follow_up::{follow_up_state, DueSelector, FollowUpState, TaskFilter};
pub use pipeline::{advance_status, PIPELINE};
