//! Aggregate lead statistics for the dashboard and reports views.

use crate::domain::{Lead, LeadStatus};
use crate::time::day_bounds;
use chrono::{Duration, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const UNKNOWN_SOURCE: &str = "Unknown";
pub const UNSPECIFIED_PRODUCT: &str = "Unspecified";
pub const DEFAULT_WEEKS: u32 = 8;

const WEEK_SECONDS: i64 = 7 * 86_400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadReport {
    pub total: usize,
    pub new_today: usize,
    pub closed: usize,
    /// Closed over total, percent with one decimal.
    pub conversion_rate: f64,
    pub by_status: Vec<StatusCount>,
    pub by_source: Vec<LabelCount>,
    pub by_product: Vec<LabelCount>,
    pub conversion_by_product: Vec<ProductConversion>,
    pub weekly: Vec<WeekBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: LeadStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConversion {
    pub product: String,
    pub total: usize,
    pub closed: usize,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBucket {
    pub start: i64,
    pub end: i64,
    pub count: usize,
}

pub fn build_report(leads: &[Lead], now_utc: i64, offset: FixedOffset, weeks: u32) -> LeadReport {
    let (today_start, today_end) = day_bounds(now_utc, offset);
    let closed = count_status(leads, LeadStatus::Closed);

    LeadReport {
        total: leads.len(),
        new_today: leads
            .iter()
            .filter(|lead| lead.created_at >= today_start && lead.created_at < today_end)
            .count(),
        closed,
        conversion_rate: percent(closed, leads.len()),
        by_status: LeadStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: count_status(leads, *status),
            })
            .collect(),
        by_source: tally(leads.iter().map(|lead| label_or(&lead.source, UNKNOWN_SOURCE))),
        by_product: tally(leads.iter().map(product_label)),
        conversion_by_product: conversion_by_product(leads),
        weekly: weekly_buckets(leads, today_start, weeks),
    }
}

/// Consecutive seven-day windows; the last one starts at today's local midnight.
pub fn weekly_buckets(leads: &[Lead], today_start: i64, weeks: u32) -> Vec<WeekBucket> {
    (0..i64::from(weeks))
        .rev()
        .map(|i| {
            let start = today_start - i * WEEK_SECONDS;
            let end = start + Duration::days(7).num_seconds();
            let count = leads
                .iter()
                .filter(|lead| lead.created_at >= start && lead.created_at < end)
                .count();
            WeekBucket { start, end, count }
        })
        .collect()
}

fn conversion_by_product(leads: &[Lead]) -> Vec<ProductConversion> {
    let mut totals: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for lead in leads {
        let product = product_label(lead);
        let entry = totals.entry(product).or_insert_with(|| {
            order.push(product);
            (0, 0)
        });
        entry.0 += 1;
        if lead.status == LeadStatus::Closed {
            entry.1 += 1;
        }
    }

    let mut out: Vec<ProductConversion> = order
        .into_iter()
        .map(|product| {
            let (total, closed) = totals.get(product).copied().unwrap_or_default();
            ProductConversion {
                product: product.to_string(),
                total,
                closed,
                rate: percent(closed, total),
            }
        })
        .collect();
    out.sort_by(|a, b| b.rate.total_cmp(&a.rate));
    out
}

fn tally<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<LabelCount> {
    let mut out: Vec<LabelCount> = Vec::new();
    for label in labels {
        match out.iter_mut().find(|entry| entry.label == label) {
            Some(entry) => entry.count += 1,
            None => out.push(LabelCount {
                label: label.to_string(),
                count: 1,
            }),
        }
    }
    // Stable sort keeps first-seen order among ties.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

fn count_status(leads: &[Lead], status: LeadStatus) -> usize {
    leads.iter().filter(|lead| lead.status == status).count()
}

fn product_label(lead: &Lead) -> &str {
    label_or(&lead.product_interest, UNSPECIFIED_PRODUCT)
}

fn label_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    match value.as_deref() {
        Some(value) if !value.trim().is_empty() => value,
        _ => fallback,
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::{build_report, weekly_buckets, UNKNOWN_SOURCE, UNSPECIFIED_PRODUCT};
    use crate::domain::{Lead, LeadId, LeadStatus};
    use chrono::{FixedOffset, TimeZone, Utc};

    fn lead(
        status: LeadStatus,
        source: Option<&str>,
        product: Option<&str>,
        created_at: i64,
    ) -> Lead {
        Lead {
            id: LeadId::new(),
            name: "Lead".to_string(),
            email: None,
            phone: None,
            source: source.map(str::to_string),
            status,
            product_interest: product.map(str::to_string),
            country: None,
            city: None,
            tags: Vec::new(),
            next_follow_up: None,
            follow_up_method: None,
            notes: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn report_counts_and_fallback_labels() {
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 15, 0, 0).unwrap().timestamp();
        let yesterday = now - 86_400;
        let leads = vec![
            lead(LeadStatus::New, Some("web"), Some("Nitro Infusion"), now - 60),
            lead(LeadStatus::Closed, Some("colbrew"), Some("Nitro Infusion"), yesterday),
            lead(LeadStatus::Closed, None, None, yesterday),
            lead(LeadStatus::Discarded, Some("  "), Some("Catas"), yesterday),
        ];

        let report = build_report(&leads, now, utc(), 8);
        assert_eq!(report.total, 4);
        assert_eq!(report.new_today, 1);
        assert_eq!(report.closed, 2);
        assert_eq!(report.conversion_rate, 50.0);

        let statuses: Vec<usize> = report.by_status.iter().map(|entry| entry.count).collect();
        assert_eq!(statuses, vec![1, 0, 0, 2, 1]);

        assert_eq!(report.by_source[0].label, UNKNOWN_SOURCE);
        assert_eq!(report.by_source[0].count, 2);
        assert_eq!(report.by_source[1].label, "web");
        assert_eq!(report.by_source[1].count, 1);

        assert!(report
            .by_product
            .iter()
            .any(|entry| entry.label == UNSPECIFIED_PRODUCT && entry.count == 1));

        let top = &report.conversion_by_product[0];
        assert_eq!(top.product, UNSPECIFIED_PRODUCT);
        assert_eq!(top.rate, 100.0);
        let nitro = report
            .conversion_by_product
            .iter()
            .find(|entry| entry.product == "Nitro Infusion")
            .unwrap();
        assert_eq!((nitro.total, nitro.closed, nitro.rate), (2, 1, 50.0));
    }

    #[test]
    fn conversion_rounds_to_one_decimal() {
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 15, 0, 0).unwrap().timestamp();
        let leads = vec![
            lead(LeadStatus::Closed, None, None, now),
            lead(LeadStatus::New, None, None, now),
            lead(LeadStatus::New, None, None, now),
        ];
        assert_eq!(build_report(&leads, now, utc(), 1).conversion_rate, 33.3);
        assert_eq!(build_report(&[], now, utc(), 1).conversion_rate, 0.0);
    }

    #[test]
    fn weekly_buckets_end_with_current_week() {
        let today = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap().timestamp();
        let leads = vec![
            lead(LeadStatus::New, None, None, today + 3600),
            lead(LeadStatus::New, None, None, today - 3600),
            lead(LeadStatus::New, None, None, today - 8 * 86_400),
            lead(LeadStatus::New, None, None, today - 100 * 86_400),
        ];
        let weeks = weekly_buckets(&leads, today, 3);
        assert_eq!(weeks.len(), 3);
        assert_eq!(weeks[2].start, today);
        assert_eq!(weeks[2].end - weeks[2].start, 7 * 86_400);
        let counts: Vec<usize> = weeks.iter().map(|week| week.count).collect();
        assert_eq!(counts, vec![1, 1, 1]);
    }
}
