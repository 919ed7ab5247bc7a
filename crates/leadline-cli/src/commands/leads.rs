use crate::commands::{list_item, print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{
    checked_email, follow_up_label, normalize_optional_value, parse_lead_id, parse_tags,
};
use anyhow::Result;
use clap::{ArgAction, Args};
use leadline_core::domain::{FollowUpMethod, LeadNew, LeadStatus};
use leadline_core::dto::{InteractionDto, LeadDetailDto, PipelineColumnDto};
use leadline_core::filter::parse_filter;
use leadline_core::rules::PIPELINE;
use leadline_core::time::{
    format_timestamp_date, format_timestamp_datetime, local_offset, now_utc, parse_local_timestamp,
};
use leadline_store::repo::LeadUpdate;
use leadline_store::{LeadQuery, Page};

#[derive(Debug, Args)]
pub struct AddLeadArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub source: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long = "product")]
    pub product_interest: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long, value_name = "TAG")]
    pub tag: Vec<String>,
    #[arg(long = "follow-up")]
    pub follow_up: Option<String>,
    #[arg(long, requires = "follow_up")]
    pub method: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditLeadArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub source: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long = "product")]
    pub product_interest: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long, value_name = "TAG", conflicts_with = "clear_tags")]
    pub tag: Vec<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub clear_tags: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub filter: Option<String>,
    /// 1-based page of 15 leads; all matches when omitted.
    #[arg(long)]
    pub page: Option<u32>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Args)]
pub struct AdvanceArgs {
    pub id: String,
}

pub fn add_lead(ctx: &Context<'_>, args: AddLeadArgs) -> Result<()> {
    let status = match args.status {
        Some(raw) => raw.parse::<LeadStatus>()?,
        None => LeadStatus::New,
    };
    let next_follow_up = match args.follow_up {
        Some(raw) => Some(parse_local_timestamp(&raw)?),
        None => None,
    };
    let method = match args.method {
        Some(raw) => Some(raw.parse::<FollowUpMethod>()?),
        None => None,
    };

    let lead = ctx.store.leads().create(
        now_utc(),
        LeadNew {
            name: args.name,
            email: checked_email(args.email)?,
            phone: args.phone.and_then(normalize_optional_value),
            source: args.source.and_then(normalize_optional_value),
            status,
            product_interest: args.product_interest.and_then(normalize_optional_value),
            country: args.country.and_then(normalize_optional_value),
            city: args.city.and_then(normalize_optional_value),
            tags: parse_tags(&args.tag)?,
            next_follow_up,
            follow_up_method: next_follow_up.map(|_| method.unwrap_or_default()),
            notes: args.notes.and_then(normalize_optional_value),
        },
    )?;

    if ctx.json {
        print_json(&lead)?;
    } else {
        println!("created {} {}", lead.id, lead.name);
    }
    Ok(())
}

pub fn edit_lead(ctx: &Context<'_>, args: EditLeadArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;

    let mut update = LeadUpdate::default();
    if let Some(name) = args.name {
        update.name = Some(name);
    }
    if let Some(email) = args.email {
        update.email = Some(checked_email(Some(email))?);
    }
    if let Some(phone) = args.phone {
        update.phone = Some(normalize_optional_value(phone));
    }
    if let Some(source) = args.source {
        update.source = Some(normalize_optional_value(source));
    }
    if let Some(status) = args.status {
        update.status = Some(status.parse::<LeadStatus>()?);
    }
    if let Some(product) = args.product_interest {
        update.product_interest = Some(normalize_optional_value(product));
    }
    if let Some(country) = args.country {
        update.country = Some(normalize_optional_value(country));
    }
    if let Some(city) = args.city {
        update.city = Some(normalize_optional_value(city));
    }
    if let Some(notes) = args.notes {
        update.notes = Some(normalize_optional_value(notes));
    }
    if args.clear_tags {
        update.tags = Some(Vec::new());
    } else if !args.tag.is_empty() {
        update.tags = Some(parse_tags(&args.tag)?);
    }

    if update_is_empty(&update) {
        return Err(invalid_input("no updates provided"));
    }

    let lead = ctx.store.leads().update(now_utc(), id, update)?;
    if ctx.json {
        print_json(&lead)?;
    } else {
        println!("updated {} {}", lead.id, lead.name);
    }
    Ok(())
}

pub fn show_lead(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;
    let lead = ctx
        .store
        .leads()
        .get(id)?
        .ok_or_else(|| not_found("lead not found"))?;
    let interactions: Vec<InteractionDto> = ctx
        .store
        .interactions()
        .list_for_lead(lead.id)?
        .into_iter()
        .map(|interaction| InteractionDto {
            id: interaction.id,
            created_at: interaction.created_at,
            kind: interaction.kind,
            content: interaction.content,
        })
        .collect();

    let detail = LeadDetailDto {
        id: lead.id,
        name: lead.name,
        email: lead.email,
        phone: lead.phone,
        source: lead.source,
        status: lead.status,
        product_interest: lead.product_interest,
        country: lead.country,
        city: lead.city,
        next_follow_up: lead.next_follow_up,
        follow_up_method: lead.follow_up_method,
        notes: lead.notes,
        created_at: lead.created_at,
        updated_at: lead.updated_at,
        tags: lead.tags.iter().map(|tag| tag.as_str().to_string()).collect(),
        interactions,
    };

    if ctx.json {
        return print_json(&detail);
    }

    println!("{} [{}]", detail.name, detail.status);
    println!("id: {}", detail.id);
    print_optional("email", detail.email.as_deref());
    print_optional("phone", detail.phone.as_deref());
    print_optional("source", detail.source.as_deref());
    print_optional("product", detail.product_interest.as_deref());
    print_optional("country", detail.country.as_deref());
    print_optional("city", detail.city.as_deref());
    if let Some(next) = detail.next_follow_up {
        let method = detail.follow_up_method.unwrap_or_default();
        println!("follow-up: {} via {}", format_timestamp_datetime(next), method);
    }
    if !detail.tags.is_empty() {
        println!("tags: {}", detail.tags.join(", "));
    }
    print_optional("notes", detail.notes.as_deref());
    println!("created: {}", format_timestamp_datetime(detail.created_at));
    if !detail.interactions.is_empty() {
        println!("interactions:");
        for interaction in &detail.interactions {
            println!(
                "  {} {}: {}",
                format_timestamp_datetime(interaction.created_at),
                interaction.kind,
                interaction.content
            );
        }
    }
    Ok(())
}

pub fn list_leads(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let filter = parse_filter(args.filter.as_deref().unwrap_or(""))?;
    let query = LeadQuery::from_filter(&filter)?;
    let now = now_utc();
    let offset = local_offset();
    let page = args.page.map(Page::new);

    let leads = ctx.store.leads().list(&query, now, offset, page)?;
    let items: Vec<_> = leads
        .iter()
        .map(|lead| list_item(lead, now, offset))
        .collect();

    if ctx.json {
        return print_json(&items);
    }

    for item in &items {
        println!(
            "{}  {:<24} {:<10} {:<8} {}",
            item.id,
            item.name,
            item.status,
            follow_up_label(item.follow_up_state),
            item.source.as_deref().unwrap_or("-")
        );
    }
    if let Some(page) = page {
        let total = ctx.store.leads().count(&query, now, offset)?;
        let pages = ((total.max(1) - 1) / i64::from(page.size)) + 1;
        println!("page {} of {} ({} leads)", page.number, pages, total);
    }
    Ok(())
}

pub fn delete_lead(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;
    ctx.store.leads().delete(id)?;
    if ctx.json {
        print_json(&serde_json::json!({ "deleted": id }))?;
    } else {
        println!("deleted {}", id);
    }
    Ok(())
}

pub fn set_status(ctx: &Context<'_>, args: StatusArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;
    let status = args.status.parse::<LeadStatus>()?;
    let lead = ctx.store.leads().set_status(now_utc(), id, status)?;
    if ctx.json {
        print_json(&lead)?;
    } else {
        println!("{} is now {}", lead.name, lead.status);
    }
    Ok(())
}

pub fn advance_lead(ctx: &Context<'_>, args: AdvanceArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;
    let lead = ctx.store.leads().advance(now_utc(), id)?;
    if ctx.json {
        print_json(&lead)?;
    } else {
        println!("{} is now {}", lead.name, lead.status);
    }
    Ok(())
}

pub fn pipeline(ctx: &Context<'_>) -> Result<()> {
    let now = now_utc();
    let offset = local_offset();
    let leads = ctx.store.leads().list_all()?;

    let mut columns: Vec<PipelineColumnDto> = PIPELINE
        .into_iter()
        .map(|status| PipelineColumnDto {
            status,
            leads: Vec::new(),
        })
        .collect();
    for lead in &leads {
        if let Some(column) = columns.iter_mut().find(|column| column.status == lead.status) {
            column.leads.push(list_item(lead, now, offset));
        }
    }

    if ctx.json {
        return print_json(&columns);
    }

    for column in &columns {
        println!("{} ({})", column.status, column.leads.len());
        for item in &column.leads {
            println!(
                "  {}  {}  {}",
                item.id,
                item.name,
                format_timestamp_date(item.created_at)
            );
        }
    }
    Ok(())
}

fn print_optional(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("{label}: {value}");
    }
}

fn update_is_empty(update: &LeadUpdate) -> bool {
    update.name.is_none()
        && update.email.is_none()
        && update.phone.is_none()
        && update.source.is_none()
        && update.status.is_none()
        && update.product_interest.is_none()
        && update.country.is_none()
        && update.city.is_none()
        && update.notes.is_none()
        && update.next_follow_up.is_none()
        && update.follow_up_method.is_none()
        && update.tags.is_none()
}
