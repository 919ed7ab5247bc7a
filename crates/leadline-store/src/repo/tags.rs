use crate::error::{Result, StoreError};
use leadline_core::domain::{LeadId, Tag, TagId, TagName};
use rusqlite::{params, params_from_iter, Connection};
use std::collections::HashMap;
use std::str::FromStr;

// SQLite's default host parameter limit is 999 on older builds.
const ID_CHUNK: usize = 500;

pub struct TagsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> TagsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn upsert(&self, name: TagName) -> Result<Tag> {
        upsert_inner(self.conn, name)
    }

    pub fn list_with_counts(&self) -> Result<Vec<(Tag, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT tags.id, tags.name, COUNT(lead_tags.lead_id) AS cnt
             FROM tags
             LEFT JOIN lead_tags ON tags.id = lead_tags.tag_id
             GROUP BY tags.id, tags.name
             ORDER BY tags.name COLLATE NOCASE ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let tag = tag_from_row(row)?;
            let count: i64 = row.get(2)?;
            items.push((tag, count));
        }
        Ok(items)
    }

    /// Tags of one lead in the order they were attached.
    pub fn list_for_lead(&self, lead_id: LeadId) -> Result<Vec<TagName>> {
        list_for_lead_inner(self.conn, lead_id)
    }

    pub fn list_names_for_leads(
        &self,
        lead_ids: &[LeadId],
    ) -> Result<HashMap<LeadId, Vec<TagName>>> {
        list_names_for_leads_inner(self.conn, lead_ids)
    }

    pub fn set_lead_tags(&self, lead_id: LeadId, tags: Vec<TagName>) -> Result<()> {
        if self.conn.is_autocommit() {
            let tx = self.conn.unchecked_transaction()?;
            set_lead_tags_inner(&tx, lead_id, tags)?;
            tx.commit()?;
            Ok(())
        } else {
            set_lead_tags_inner(self.conn, lead_id, tags)
        }
    }
}

pub(crate) fn set_lead_tags_inner(
    conn: &Connection,
    lead_id: LeadId,
    tags: Vec<TagName>,
) -> Result<()> {
    conn.execute("DELETE FROM lead_tags WHERE lead_id = ?1;", [lead_id.to_string()])?;

    for (position, tag) in tags.into_iter().enumerate() {
        let tag = upsert_inner(conn, tag)?;
        conn.execute(
            "INSERT OR IGNORE INTO lead_tags (lead_id, tag_id, position) VALUES (?1, ?2, ?3);",
            params![lead_id.to_string(), tag.id.to_string(), position as i64],
        )?;
    }
    Ok(())
}

pub(crate) fn list_for_lead_inner(conn: &Connection, lead_id: LeadId) -> Result<Vec<TagName>> {
    let mut stmt = conn.prepare(
        "SELECT tags.name
         FROM tags
         INNER JOIN lead_tags ON tags.id = lead_tags.tag_id
         WHERE lead_tags.lead_id = ?1
         ORDER BY lead_tags.position ASC;",
    )?;
    let mut rows = stmt.query([lead_id.to_string()])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let raw: String = row.get(0)?;
        tags.push(TagName::new(&raw)?);
    }
    Ok(tags)
}

pub(crate) fn list_names_for_leads_inner(
    conn: &Connection,
    lead_ids: &[LeadId],
) -> Result<HashMap<LeadId, Vec<TagName>>> {
    let mut map: HashMap<LeadId, Vec<TagName>> = HashMap::new();
    for chunk in lead_ids.chunks(ID_CHUNK) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
            "SELECT lead_tags.lead_id, tags.name
             FROM lead_tags
             INNER JOIN tags ON tags.id = lead_tags.tag_id
             WHERE lead_tags.lead_id IN ({placeholders})
             ORDER BY lead_tags.lead_id ASC, lead_tags.position ASC;"
        ))?;
        let mut rows = stmt.query(params_from_iter(chunk.iter().map(|id| id.to_string())))?;
        while let Some(row) = rows.next()? {
            let lead_raw: String = row.get(0)?;
            let lead_id =
                LeadId::from_str(&lead_raw).map_err(|_| StoreError::CorruptValue {
                    column: "lead_tags.lead_id",
                    value: lead_raw.clone(),
                })?;
            let name: String = row.get(1)?;
            map.entry(lead_id).or_default().push(TagName::new(&name)?);
        }
    }
    Ok(map)
}

fn upsert_inner(conn: &Connection, name: TagName) -> Result<Tag> {
    conn.execute(
        "INSERT INTO tags (id, name) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING;",
        params![TagId::new().to_string(), name.as_str()],
    )?;

    let mut stmt = conn.prepare("SELECT id, name FROM tags WHERE name = ?1;")?;
    let mut rows = stmt.query([name.as_str()])?;
    match rows.next()? {
        Some(row) => tag_from_row(row),
        None => Err(StoreError::TagNotFound(name.as_str().to_string())),
    }
}

fn tag_from_row(row: &rusqlite::Row<'_>) -> Result<Tag> {
    let id_str: String = row.get(0)?;
    let id = TagId::from_str(&id_str).map_err(|_| StoreError::CorruptValue {
        column: "tags.id",
        value: id_str.clone(),
    })?;
    let name_raw: String = row.get(1)?;
    let name = TagName::new(&name_raw)?;
    Ok(Tag { id, name })
}
