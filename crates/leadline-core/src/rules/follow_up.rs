use crate::time::day_bounds;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpState {
    Unscheduled,
    Overdue,
    Today,
    Upcoming,
}

/// Filter-language selector over `next_follow_up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueSelector {
    Overdue,
    Today,
    Any,
    None,
}

/// Task list tabs. A follow-up due earlier today counts for both `Today` and `Overdue`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilter {
    #[default]
    All,
    Today,
    Overdue,
}

impl TaskFilter {
    pub fn matches(&self, now_utc: i64, follow_up: i64, offset: FixedOffset) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Overdue => follow_up < now_utc,
            TaskFilter::Today => {
                let (start, end) = day_bounds(now_utc, offset);
                follow_up >= start && follow_up < end
            }
        }
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "today" => Ok(TaskFilter::Today),
            "overdue" => Ok(TaskFilter::Overdue),
            other => Err(format!("invalid task filter: {other}")),
        }
    }
}

pub fn follow_up_state(
    now_utc: i64,
    next_follow_up: Option<i64>,
    offset: FixedOffset,
) -> FollowUpState {
    let Some(next) = next_follow_up else {
        return FollowUpState::Unscheduled;
    };
    if next < now_utc {
        return FollowUpState::Overdue;
    }
    let (_, end_of_today) = day_bounds(now_utc, offset);
    if next < end_of_today {
        FollowUpState::Today
    } else {
        FollowUpState::Upcoming
    }
}

#[cfg(test)]
mod tests {
    use super::{follow_up_state, FollowUpState, TaskFilter};
    use chrono::{FixedOffset, TimeZone, Utc};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn classifies_follow_ups() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap().timestamp();
        assert_eq!(follow_up_state(now, None, utc()), FollowUpState::Unscheduled);
        assert_eq!(follow_up_state(now, Some(now - 60), utc()), FollowUpState::Overdue);
        assert_eq!(follow_up_state(now, Some(now + 3600), utc()), FollowUpState::Today);
        assert_eq!(
            follow_up_state(now, Some(now + 86_400), utc()),
            FollowUpState::Upcoming
        );
    }

    #[test]
    fn earlier_today_is_both_today_and_overdue() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap().timestamp();
        let earlier = now - 3600;
        assert!(TaskFilter::Today.matches(now, earlier, utc()));
        assert!(TaskFilter::Overdue.matches(now, earlier, utc()));
        assert!(!TaskFilter::Today.matches(now, now - 86_400, utc()));
        assert!(TaskFilter::All.matches(now, now + 999_999, utc()));
    }

    #[test]
    fn parse_task_filter() {
        assert_eq!("Overdue".parse::<TaskFilter>().unwrap(), TaskFilter::Overdue);
        assert!("later".parse::<TaskFilter>().is_err());
    }
}
