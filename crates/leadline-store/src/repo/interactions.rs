use crate::error::{Result, StoreError};
use leadline_core::domain::{Interaction, InteractionId, InteractionKind, LeadId};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct InteractionNew {
    pub lead_id: LeadId,
    pub created_at: i64,
    pub kind: InteractionKind,
    pub content: String,
}

/// Interaction joined with the name of the lead it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentInteraction {
    pub interaction: Interaction,
    pub lead_name: String,
}

pub struct InteractionsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> InteractionsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn add(&self, input: InteractionNew) -> Result<Interaction> {
        let interaction = Interaction {
            id: InteractionId::new(),
            lead_id: input.lead_id,
            created_at: input.created_at,
            kind: input.kind,
            content: input.content.trim().to_string(),
        };
        interaction.validate()?;

        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM leads WHERE id = ?1;",
                [interaction.lead_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::LeadNotFound(interaction.lead_id));
        }

        self.conn.execute(
            "INSERT INTO interactions (id, lead_id, created_at, kind, content)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                interaction.id.to_string(),
                interaction.lead_id.to_string(),
                interaction.created_at,
                interaction.kind.as_str(),
                interaction.content,
            ],
        )?;
        Ok(interaction)
    }

    /// Newest first.
    pub fn list_for_lead(&self, lead_id: LeadId) -> Result<Vec<Interaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lead_id, created_at, kind, content
             FROM interactions
             WHERE lead_id = ?1
             ORDER BY created_at DESC, rowid DESC;",
        )?;
        let mut rows = stmt.query([lead_id.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(interaction_from_row(row)?);
        }
        Ok(items)
    }

    pub fn list_recent(&self, limit: u32) -> Result<Vec<RecentInteraction>> {
        let mut stmt = self.conn.prepare(
            "SELECT interactions.id, interactions.lead_id, interactions.created_at,
                    interactions.kind, interactions.content, leads.name
             FROM interactions
             INNER JOIN leads ON leads.id = interactions.lead_id
             ORDER BY interactions.created_at DESC, interactions.rowid DESC
             LIMIT ?1;",
        )?;
        let mut rows = stmt.query([i64::from(limit)])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(RecentInteraction {
                interaction: interaction_from_row(row)?,
                lead_name: row.get(5)?,
            });
        }
        Ok(items)
    }
}

fn interaction_from_row(row: &rusqlite::Row<'_>) -> Result<Interaction> {
    let id_str: String = row.get(0)?;
    let id = InteractionId::from_str(&id_str).map_err(|_| StoreError::CorruptValue {
        column: "interactions.id",
        value: id_str.clone(),
    })?;
    let lead_raw: String = row.get(1)?;
    let lead_id = LeadId::from_str(&lead_raw).map_err(|_| StoreError::CorruptValue {
        column: "interactions.lead_id",
        value: lead_raw.clone(),
    })?;
    let kind_raw: String = row.get(3)?;
    Ok(Interaction {
        id,
        lead_id,
        created_at: row.get(2)?,
        kind: InteractionKind::from_str(&kind_raw)?,
        content: row.get(4)?,
    })
}
