use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::parse_lead_id;
use anyhow::Result;
use clap::Args;
use leadline_core::domain::InteractionKind;
use leadline_core::dto::InteractionDto;
use leadline_core::time::now_utc;
use leadline_store::repo::InteractionNew;
use std::io::{self, Read};

#[derive(Debug, Args)]
pub struct AddNoteArgs {
    pub id: String,
    #[arg(long, default_value = "note")]
    pub kind: String,
    #[arg(long)]
    pub content: Option<String>,
}

pub fn add_note(ctx: &Context<'_>, args: AddNoteArgs) -> Result<()> {
    let lead_id = parse_lead_id(&args.id)?;
    let kind = args.kind.parse::<InteractionKind>()?;
    let content = match args.content {
        Some(value) => value,
        None => read_content_from_stdin()?,
    };

    let interaction = ctx.store.interactions().add(InteractionNew {
        lead_id,
        created_at: now_utc(),
        kind,
        content,
    })?;

    if ctx.json {
        print_json(&InteractionDto {
            id: interaction.id,
            created_at: interaction.created_at,
            kind: interaction.kind,
            content: interaction.content,
        })?;
    } else {
        println!("added {} {}", interaction.kind, interaction.id);
    }
    Ok(())
}

fn read_content_from_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    if buffer.trim().is_empty() {
        return Err(invalid_input("content is empty (provide --content or stdin)"));
    }
    Ok(buffer.trim_end().to_string())
}
