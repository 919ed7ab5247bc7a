use crate::error::{Result, StoreError};
use crate::query::{LeadQuery, Page, LEAD_COLUMNS};
use crate::repo::tags::{list_for_lead_inner, list_names_for_leads_inner, set_lead_tags_inner};
use chrono::{FixedOffset, Offset, Utc};
use leadline_core::domain::{
    normalize_email, FollowUpMethod, Lead, LeadId, LeadNew, LeadStatus, TagName,
};
use leadline_core::intake::{IntakeProfile, IntakeRequest};
use leadline_core::rules::{advance_status, TaskFilter};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::str::FromStr;

/// Partial update. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct LeadUpdate {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub source: Option<Option<String>>,
    pub status: Option<LeadStatus>,
    pub product_interest: Option<Option<String>>,
    pub country: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub next_follow_up: Option<Option<i64>>,
    pub follow_up_method: Option<Option<FollowUpMethod>>,
    pub tags: Option<Vec<TagName>>,
}

pub struct LeadsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> LeadsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Inserts the lead and its tags in one transaction.
    pub fn create(&self, now_utc: i64, input: LeadNew) -> Result<Lead> {
        self.in_tx(|conn| create_inner(conn, now_utc, input))
    }

    /// Applies the channel profile to an external request and stores the result.
    pub fn ingest(
        &self,
        now_utc: i64,
        request: IntakeRequest,
        profile: &IntakeProfile,
    ) -> Result<Lead> {
        let input = request.into_lead(profile)?;
        self.create(now_utc, input)
    }

    pub fn get(&self, id: LeadId) -> Result<Option<Lead>> {
        get_inner(self.conn, id)
    }

    pub fn update(&self, now_utc: i64, id: LeadId, update: LeadUpdate) -> Result<Lead> {
        self.in_tx(|conn| update_inner(conn, now_utc, id, update))
    }

    pub fn set_status(&self, now_utc: i64, id: LeadId, status: LeadStatus) -> Result<Lead> {
        let update = LeadUpdate {
            status: Some(status),
            ..Default::default()
        };
        self.update(now_utc, id, update)
    }

    /// Moves the lead one pipeline stage forward.
    pub fn advance(&self, now_utc: i64, id: LeadId) -> Result<Lead> {
        self.in_tx(|conn| {
            let lead = get_inner(conn, id)?.ok_or_else(|| StoreError::LeadNotFound(id))?;
            let update = LeadUpdate {
                status: Some(advance_status(lead.status)?),
                ..Default::default()
            };
            update_inner(conn, now_utc, id, update)
        })
    }

    /// Schedules (or with `None` clears) the next follow-up. A scheduled
    /// follow-up without a method defaults to WhatsApp.
    pub fn set_follow_up(
        &self,
        now_utc: i64,
        id: LeadId,
        at: Option<i64>,
        method: Option<FollowUpMethod>,
    ) -> Result<Lead> {
        let method = at.map(|_| method.unwrap_or_default());
        let update = LeadUpdate {
            next_follow_up: Some(at),
            follow_up_method: Some(method),
            ..Default::default()
        };
        self.update(now_utc, id, update)
    }

    /// Deletes the lead with its interactions and tag links.
    pub fn delete(&self, id: LeadId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM leads WHERE id = ?1;", [id.to_string()])?;
        if deleted == 0 {
            return Err(StoreError::LeadNotFound(id));
        }
        Ok(())
    }

    pub fn list(
        &self,
        query: &LeadQuery,
        now_utc: i64,
        local_offset: FixedOffset,
        page: Option<Page>,
    ) -> Result<Vec<Lead>> {
        let compiled = query.to_sql(now_utc, local_offset, page);
        let mut stmt = self.conn.prepare(&compiled.sql)?;
        let mut rows = stmt.query(params_from_iter(compiled.params))?;
        let mut leads = Vec::new();
        while let Some(row) = rows.next()? {
            leads.push(lead_from_row(row)?);
        }
        attach_tags(self.conn, leads)
    }

    pub fn count(&self, query: &LeadQuery, now_utc: i64, local_offset: FixedOffset) -> Result<i64> {
        let compiled = query.to_count_sql(now_utc, local_offset);
        let count = self.conn.query_row(
            &compiled.sql,
            params_from_iter(compiled.params),
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn list_all(&self) -> Result<Vec<Lead>> {
        self.list(&LeadQuery::default(), 0, Utc.fix(), None)
    }

    pub fn list_recent(&self, limit: u32) -> Result<Vec<Lead>> {
        let page = Page {
            number: 1,
            size: limit,
        };
        self.list(&LeadQuery::default(), 0, Utc.fix(), Some(page))
    }

    /// Leads with a scheduled follow-up matching `filter`, soonest first.
    pub fn list_follow_ups(
        &self,
        now_utc: i64,
        local_offset: FixedOffset,
        filter: TaskFilter,
    ) -> Result<Vec<Lead>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads
             WHERE next_follow_up IS NOT NULL
             ORDER BY next_follow_up ASC, name COLLATE NOCASE ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut leads = Vec::new();
        while let Some(row) = rows.next()? {
            let lead = lead_from_row(row)?;
            let due = lead.next_follow_up.unwrap_or_default();
            if filter.matches(now_utc, due, local_offset) {
                leads.push(lead);
            }
        }
        attach_tags(self.conn, leads)
    }

    fn in_tx<T>(&self, op: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        if self.conn.is_autocommit() {
            let tx = self.conn.unchecked_transaction()?;
            let value = op(&tx)?;
            tx.commit()?;
            Ok(value)
        } else {
            op(self.conn)
        }
    }
}

fn create_inner(conn: &Connection, now_utc: i64, input: LeadNew) -> Result<Lead> {
    let lead = Lead {
        id: LeadId::new(),
        name: input.name.trim().to_string(),
        email: input.email.and_then(|email| normalize_email(&email)),
        phone: input.phone,
        source: input.source,
        status: input.status,
        product_interest: input.product_interest,
        country: input.country,
        city: input.city,
        tags: input.tags,
        next_follow_up: input.next_follow_up,
        follow_up_method: input
            .next_follow_up
            .map(|_| input.follow_up_method.unwrap_or_default()),
        notes: input.notes,
        created_at: now_utc,
        updated_at: now_utc,
    };

    lead.validate()?;
    insert_row(conn, &lead)?;
    if !lead.tags.is_empty() {
        set_lead_tags_inner(conn, lead.id, lead.tags.clone())?;
    }
    // Reload so tag casing matches what is stored.
    get_inner(conn, lead.id)?.ok_or_else(|| StoreError::LeadNotFound(lead.id))
}

fn insert_row(conn: &Connection, lead: &Lead) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO leads ({LEAD_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);"
        ),
        params![
            lead.id.to_string(),
            lead.name,
            lead.email,
            lead.phone,
            lead.source,
            lead.status.as_str(),
            lead.product_interest,
            lead.country,
            lead.city,
            lead.next_follow_up,
            lead.follow_up_method.map(|method| method.as_str()),
            lead.notes,
            lead.created_at,
            lead.updated_at,
        ],
    )?;
    Ok(())
}

fn update_inner(conn: &Connection, now_utc: i64, id: LeadId, update: LeadUpdate) -> Result<Lead> {
    let mut lead = get_inner(conn, id)?.ok_or_else(|| StoreError::LeadNotFound(id))?;

    if let Some(name) = update.name {
        lead.name = name.trim().to_string();
    }
    if let Some(email) = update.email {
        lead.email = email.and_then(|email| normalize_email(&email));
    }
    if let Some(phone) = update.phone {
        lead.phone = phone;
    }
    if let Some(source) = update.source {
        lead.source = source;
    }
    if let Some(status) = update.status {
        lead.status = status;
    }
    if let Some(product) = update.product_interest {
        lead.product_interest = product;
    }
    if let Some(country) = update.country {
        lead.country = country;
    }
    if let Some(city) = update.city {
        lead.city = city;
    }
    if let Some(notes) = update.notes {
        lead.notes = notes;
    }
    if let Some(next) = update.next_follow_up {
        lead.next_follow_up = next;
    }
    if let Some(method) = update.follow_up_method {
        lead.follow_up_method = method;
    }
    if lead.next_follow_up.is_none() {
        lead.follow_up_method = None;
    } else if lead.follow_up_method.is_none() {
        lead.follow_up_method = Some(FollowUpMethod::default());
    }
    lead.updated_at = now_utc;
    lead.validate()?;

    conn.execute(
        "UPDATE leads SET name = ?2, email = ?3, phone = ?4, source = ?5, status = ?6,
             product_interest = ?7, country = ?8, city = ?9, next_follow_up = ?10,
             follow_up_method = ?11, notes = ?12, updated_at = ?13
         WHERE id = ?1;",
        params![
            lead.id.to_string(),
            lead.name,
            lead.email,
            lead.phone,
            lead.source,
            lead.status.as_str(),
            lead.product_interest,
            lead.country,
            lead.city,
            lead.next_follow_up,
            lead.follow_up_method.map(|method| method.as_str()),
            lead.notes,
            lead.updated_at,
        ],
    )?;

    if let Some(tags) = update.tags {
        set_lead_tags_inner(conn, id, tags)?;
        lead.tags = list_for_lead_inner(conn, id)?;
    }
    Ok(lead)
}

fn get_inner(conn: &Connection, id: LeadId) -> Result<Option<Lead>> {
    let lead = conn
        .query_row(
            &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1;"),
            [id.to_string()],
            |row| Ok(lead_from_row(row)),
        )
        .optional()?
        .transpose()?;
    match lead {
        Some(mut lead) => {
            lead.tags = list_for_lead_inner(conn, lead.id)?;
            Ok(Some(lead))
        }
        None => Ok(None),
    }
}

fn attach_tags(conn: &Connection, mut leads: Vec<Lead>) -> Result<Vec<Lead>> {
    let ids: Vec<LeadId> = leads.iter().map(|lead| lead.id).collect();
    let mut tags = list_names_for_leads_inner(conn, &ids)?;
    for lead in &mut leads {
        lead.tags = tags.remove(&lead.id).unwrap_or_default();
    }
    Ok(leads)
}

fn lead_from_row(row: &rusqlite::Row<'_>) -> Result<Lead> {
    let id_str: String = row.get(0)?;
    let id = LeadId::from_str(&id_str).map_err(|_| StoreError::CorruptValue {
        column: "leads.id",
        value: id_str.clone(),
    })?;
    let status_raw: String = row.get(5)?;
    let method_raw: Option<String> = row.get(10)?;
    let follow_up_method = method_raw
        .as_deref()
        .map(FollowUpMethod::from_str)
        .transpose()?;
    Ok(Lead {
        id,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        source: row.get(4)?,
        status: LeadStatus::from_str(&status_raw)?,
        product_interest: row.get(6)?,
        country: row.get(7)?,
        city: row.get(8)?,
        tags: Vec::new(),
        next_follow_up: row.get(9)?,
        follow_up_method,
        notes: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}
