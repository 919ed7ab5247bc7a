use crate::commands::{list_item, print_json, Context};
use crate::error::invalid_input;
use crate::util::{follow_up_label, parse_lead_id};
use anyhow::Result;
use clap::Args;
use leadline_core::domain::FollowUpMethod;
use leadline_core::rules::TaskFilter;
use leadline_core::time::{format_timestamp_datetime, local_offset, now_utc, parse_local_timestamp};

#[derive(Debug, Args)]
pub struct FollowUpArgs {
    pub id: String,
    #[arg(long)]
    pub at: String,
    /// whatsapp (default), call, email or in-person.
    #[arg(long)]
    pub method: Option<String>,
}

#[derive(Debug, Args)]
pub struct TasksArgs {
    /// all, today or overdue.
    #[arg(long, default_value = "all")]
    pub filter: String,
}

#[derive(Debug, Args)]
pub struct CompleteArgs {
    pub id: String,
}

pub fn schedule_follow_up(ctx: &Context<'_>, args: FollowUpArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;
    let at = parse_local_timestamp(&args.at)?;
    let method = match args.method {
        Some(raw) => Some(raw.parse::<FollowUpMethod>()?),
        None => None,
    };

    let lead = ctx
        .store
        .leads()
        .set_follow_up(now_utc(), id, Some(at), method)?;
    if ctx.json {
        print_json(&lead)?;
    } else {
        println!(
            "follow up with {} at {} via {}",
            lead.name,
            format_timestamp_datetime(at),
            lead.follow_up_method.unwrap_or_default()
        );
    }
    Ok(())
}

pub fn list_tasks(ctx: &Context<'_>, args: TasksArgs) -> Result<()> {
    let filter = args.filter.parse::<TaskFilter>().map_err(invalid_input)?;
    let now = now_utc();
    let offset = local_offset();
    let leads = ctx.store.leads().list_follow_ups(now, offset, filter)?;

    if ctx.json {
        let items: Vec<_> = leads
            .iter()
            .map(|lead| list_item(lead, now, offset))
            .collect();
        return print_json(&items);
    }

    if leads.is_empty() {
        println!("no follow-ups");
        return Ok(());
    }
    for lead in &leads {
        let item = list_item(lead, now, offset);
        let at = lead.next_follow_up.unwrap_or_default();
        println!(
            "{}  {:<8} {}  {} via {}",
            format_timestamp_datetime(at),
            follow_up_label(item.follow_up_state),
            lead.id,
            lead.name,
            lead.follow_up_method.unwrap_or_default()
        );
    }
    Ok(())
}

pub fn complete_follow_up(ctx: &Context<'_>, args: CompleteArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;
    let lead = ctx.store.leads().set_follow_up(now_utc(), id, None, None)?;
    if ctx.json {
        print_json(&lead)?;
    } else {
        println!("completed follow-up for {}", lead.name);
    }
    Ok(())
}
