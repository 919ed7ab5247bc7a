use anyhow::Result;
use leadline_core::domain::Lead;
use leadline_core::dto::LeadListItemDto;
use leadline_core::rules::follow_up_state;
use leadline_store::Store;
use serde::Serialize;
use std::io::{self, Write};

pub mod chat;
pub mod completions;
pub mod follow_ups;
pub mod interactions;
pub mod leads;
pub mod report;
pub mod serve;

pub const RECENT_LIMIT: u32 = 5;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub fn list_item(lead: &Lead, now_utc: i64, offset: chrono::FixedOffset) -> LeadListItemDto {
    LeadListItemDto {
        id: lead.id,
        name: lead.name.clone(),
        email: lead.email.clone(),
        status: lead.status,
        source: lead.source.clone(),
        product_interest: lead.product_interest.clone(),
        follow_up_state: follow_up_state(now_utc, lead.next_follow_up, offset),
        next_follow_up: lead.next_follow_up,
        created_at: lead.created_at,
        tags: lead.tags.iter().map(|tag| tag.as_str().to_string()).collect(),
    }
}
