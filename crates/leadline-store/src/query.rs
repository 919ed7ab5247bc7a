use crate::error::{Result, StoreError};
use chrono::FixedOffset;
use leadline_core::domain::{LeadStatus, TagName};
use leadline_core::filter::{FilterExpr, LeadFilter};
use leadline_core::rules::DueSelector;
use leadline_core::time::day_bounds;
use rusqlite::types::Value;

pub(crate) const LEAD_COLUMNS: &str = "id, name, email, phone, source, status, product_interest, \
     country, city, next_follow_up, follow_up_method, notes, created_at, updated_at";

/// Compiled form of a [`LeadFilter`]: every clause must hold.
#[derive(Debug, Default, Clone)]
pub struct LeadQuery {
    pub text_terms: Vec<String>,
    pub tags: Vec<TagName>,
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub due: Option<DueSelector>,
}

/// One page of a listing; pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    pub const DEFAULT_SIZE: u32 = 15;

    pub fn new(number: u32) -> Self {
        Self {
            number: number.max(1),
            size: Self::DEFAULT_SIZE,
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.number.saturating_sub(1)) * i64::from(self.size)
    }
}

pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl LeadQuery {
    pub fn from_filter(filter: &LeadFilter) -> Result<Self> {
        let mut query = LeadQuery::default();
        query.push_expr(filter)?;
        Ok(query)
    }

    fn push_expr(&mut self, expr: &FilterExpr) -> Result<()> {
        match expr {
            FilterExpr::Text(text) => self.text_terms.push(text.to_string()),
            FilterExpr::Tag(tag) => self.tags.push(tag.clone()),
            FilterExpr::Status(status) => set_once(&mut self.status, *status, "status")?,
            FilterExpr::Source(value) => set_once(&mut self.source, value.clone(), "source")?,
            FilterExpr::Country(value) => set_once(&mut self.country, value.clone(), "country")?,
            FilterExpr::City(value) => set_once(&mut self.city, value.clone(), "city")?,
            FilterExpr::Due(selector) => set_once(&mut self.due, *selector, "due")?,
            FilterExpr::And(terms) => {
                for term in terms {
                    self.push_expr(term)?;
                }
            }
        }
        Ok(())
    }

    /// Newest first; `page` adds LIMIT/OFFSET.
    pub fn to_sql(&self, now_utc: i64, local_offset: FixedOffset, page: Option<Page>) -> SqlQuery {
        let select = format!("SELECT {LEAD_COLUMNS} FROM leads");
        let (mut sql, mut params) = self.base_sql(&select, now_utc, local_offset);
        sql.push_str(" ORDER BY created_at DESC, id ASC");
        if let Some(page) = page {
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(Value::from(i64::from(page.size)));
            params.push(Value::from(page.offset()));
        }
        SqlQuery { sql, params }
    }

    pub fn to_count_sql(&self, now_utc: i64, local_offset: FixedOffset) -> SqlQuery {
        let (sql, params) = self.base_sql("SELECT COUNT(*) FROM leads", now_utc, local_offset);
        SqlQuery { sql, params }
    }

    fn base_sql(
        &self,
        select: &str,
        now_utc: i64,
        local_offset: FixedOffset,
    ) -> (String, Vec<Value>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        for term in &self.text_terms {
            clauses.push("(name LIKE ? ESCAPE '\\' OR email LIKE ? ESCAPE '\\')".to_string());
            let like = format!("%{}%", escape_like(term));
            params.push(Value::from(like.clone()));
            params.push(Value::from(like));
        }

        for tag in &self.tags {
            clauses.push(
                "EXISTS (SELECT 1 FROM lead_tags lt INNER JOIN tags t ON t.id = lt.tag_id \
                 WHERE lt.lead_id = leads.id AND t.name = ?)"
                    .to_string(),
            );
            params.push(Value::from(tag.as_str().to_string()));
        }

        if let Some(status) = self.status {
            clauses.push("status = ?".to_string());
            params.push(Value::from(status.as_str().to_string()));
        }

        for (column, value) in [
            ("source", &self.source),
            ("country", &self.country),
            ("city", &self.city),
        ] {
            if let Some(value) = value {
                clauses.push(format!("{column} = ? COLLATE NOCASE"));
                params.push(Value::from(value.clone()));
            }
        }

        if let Some(selector) = self.due {
            match selector {
                DueSelector::Overdue => {
                    clauses.push("next_follow_up IS NOT NULL AND next_follow_up < ?".to_string());
                    params.push(Value::from(now_utc));
                }
                DueSelector::Today => {
                    let (start, end) = day_bounds(now_utc, local_offset);
                    clauses.push("next_follow_up >= ? AND next_follow_up < ?".to_string());
                    params.push(Value::from(start));
                    params.push(Value::from(end));
                }
                DueSelector::Any => clauses.push("next_follow_up IS NOT NULL".to_string()),
                DueSelector::None => clauses.push("next_follow_up IS NULL".to_string()),
            }
        }

        let mut sql = select.to_string();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        (sql, params)
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, key: &str) -> Result<()> {
    if slot.is_some() {
        return Err(StoreError::InvalidFilter(format!(
            "multiple {key} filters are not supported"
        )));
    }
    *slot = Some(value);
    Ok(())
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
