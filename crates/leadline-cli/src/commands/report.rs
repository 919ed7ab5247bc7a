use crate::commands::{list_item, print_json, Context, RECENT_LIMIT};
use crate::error::invalid_input;
use anyhow::Result;
use clap::Args;
use leadline_core::domain::{InteractionKind, LeadId};
use leadline_core::dto::LeadListItemDto;
use leadline_core::report::{build_report, LeadReport, DEFAULT_WEEKS};
use leadline_core::time::{format_timestamp_date, format_timestamp_datetime, local_offset, now_utc};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Number of weeks in the new-lead trend.
    #[arg(long, default_value_t = DEFAULT_WEEKS)]
    pub weeks: u32,
}

#[derive(Debug, Serialize)]
struct ReportOutput {
    #[serde(flatten)]
    report: LeadReport,
    tags: Vec<TagCountDto>,
    recent_leads: Vec<LeadListItemDto>,
    recent_interactions: Vec<RecentInteractionDto>,
}

#[derive(Debug, Serialize)]
struct TagCountDto {
    name: String,
    count: i64,
}

#[derive(Debug, Serialize)]
struct RecentInteractionDto {
    lead_id: LeadId,
    lead_name: String,
    created_at: i64,
    kind: InteractionKind,
    content: String,
}

pub fn report(ctx: &Context<'_>, args: ReportArgs) -> Result<()> {
    if args.weeks == 0 || args.weeks > 52 {
        return Err(invalid_input("weeks must be between 1 and 52"));
    }
    let now = now_utc();
    let offset = local_offset();
    let leads = ctx.store.leads().list_all()?;
    let report = build_report(&leads, now, offset, args.weeks);
    let tags = ctx
        .store
        .tags()
        .list_with_counts()?
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(tag, count)| TagCountDto {
            name: tag.name.into(),
            count,
        })
        .collect();

    let recent_leads = ctx
        .store
        .leads()
        .list_recent(RECENT_LIMIT)?
        .iter()
        .map(|lead| list_item(lead, now, offset))
        .collect();
    let recent_interactions = ctx
        .store
        .interactions()
        .list_recent(RECENT_LIMIT)?
        .into_iter()
        .map(|recent| RecentInteractionDto {
            lead_id: recent.interaction.lead_id,
            lead_name: recent.lead_name,
            created_at: recent.interaction.created_at,
            kind: recent.interaction.kind,
            content: recent.interaction.content,
        })
        .collect();

    let output = ReportOutput {
        report,
        tags,
        recent_leads,
        recent_interactions,
    };
    if ctx.json {
        return print_json(&output);
    }
    print_report(&output);
    Ok(())
}

fn print_report(output: &ReportOutput) {
    let report = &output.report;
    println!(
        "leads: {}  new today: {}  closed: {}  conversion: {:.1}%",
        report.total, report.new_today, report.closed, report.conversion_rate
    );

    println!("\nby status");
    for entry in &report.by_status {
        println!("  {:<12} {}", entry.status, entry.count);
    }
    println!("\nby source");
    for entry in &report.by_source {
        println!("  {:<24} {}", entry.label, entry.count);
    }
    println!("\nby product");
    for entry in &report.by_product {
        println!("  {:<24} {}", entry.label, entry.count);
    }
    println!("\nconversion by product");
    for entry in &report.conversion_by_product {
        println!(
            "  {:<24} {}/{} ({:.1}%)",
            entry.product, entry.closed, entry.total, entry.rate
        );
    }
    if !output.tags.is_empty() {
        println!("\nby tag");
        for entry in &output.tags {
            println!("  {:<24} {}", entry.name, entry.count);
        }
    }
    println!("\nnew leads per week");
    for bucket in &report.weekly {
        println!("  {}  {}", format_timestamp_date(bucket.start), bucket.count);
    }

    if !output.recent_leads.is_empty() {
        println!("\nrecent leads");
        for lead in &output.recent_leads {
            println!(
                "  {}  {} [{}]",
                format_timestamp_date(lead.created_at),
                lead.name,
                lead.status
            );
        }
    }
    if !output.recent_interactions.is_empty() {
        println!("\nrecent activity");
        for item in &output.recent_interactions {
            println!(
                "  {}  {} {}: {}",
                format_timestamp_datetime(item.created_at),
                item.lead_name,
                item.kind,
                item.content
            );
        }
    }
}
