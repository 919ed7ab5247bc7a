//! Guided lead-capture conversation used by the chat widget.
//!
//! [`Conversation::apply`] is a pure transition function: it never sleeps,
//! performs I/O or reads the clock. Drivers interpret the returned
//! [`Effect`]s (rendering bot lines after a typing pause, posting the
//! submission) and feed results back as [`Event`]s.

mod catalog;
mod locale;
mod machine;
mod params;

pub use catalog::{brand_key, calling_code, Brand, Catalog, CountryChoice, DEFAULT_BRAND_KEY};
pub use locale::Messages;
pub use machine::{
    ChatState, Conversation, Draft, Effect, Event, Step, SubmitFailure, DEFAULT_WHATSAPP_NUMBER,
};
pub use params::{Lang, Theme, WidgetParams, DEFAULT_SOURCE};
