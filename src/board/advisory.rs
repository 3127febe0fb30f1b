use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::models::PrItem;

/// A reminder that is due (or overdue) for a scheduled PR. Best effort:
/// nothing here is durable or server-verified; missing a run simply means
/// the reminder shows up on the next scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminder {
    pub pr_id: i32,
    pub title: String,
    pub scheduled_for: NaiveDateTime,
    pub calendar_url: Option<String>,
}

/// Parse the card's schedule fields. Date is `YYYY-MM-DD`; time is
/// `HH:MM` and defaults to 09:00 when absent.
fn scheduled_at(pr: &PrItem) -> Option<NaiveDateTime> {
    let date = pr.scheduled_date.as_deref()?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;

    let time = pr
        .scheduled_time
        .as_deref()
        .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M").ok())
        .unwrap_or_else(|| NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default());

    Some(date.and_time(time))
}

/// Scan the card list for reminders due at `now`. A card qualifies when
/// it opted into reminders, carries a parseable schedule, and that
/// schedule is not in the future.
#[must_use]
pub fn due_reminders(prs: &[PrItem], now: DateTime<Utc>) -> Vec<DueReminder> {
    prs.iter()
        .filter(|pr| pr.email_reminder || pr.calendar_event)
        .filter_map(|pr| {
            let scheduled_for = scheduled_at(pr)?;
            (scheduled_for <= now.naive_utc()).then(|| DueReminder {
                pr_id: pr.id,
                title: pr.title.clone(),
                scheduled_for,
                calendar_url: pr
                    .calendar_event
                    .then(|| google_calendar_url(pr, scheduled_for)),
            })
        })
        .collect()
}

/// Deep link that prefills a Google Calendar event for the card's review
/// slot. One hour long, starting at the scheduled time.
#[must_use]
pub fn google_calendar_url(pr: &PrItem, start: NaiveDateTime) -> String {
    let end = start + Duration::hours(1);
    let fmt = "%Y%m%dT%H%M%SZ";

    let mut details = format!("PR review: {}", pr.title);
    if let Some(workspace) = pr.workspace_name() {
        details.push_str(&format!(" ({} {})", pr.category, workspace));
    }

    format!(
        "https://calendar.google.com/calendar/render?action=TEMPLATE&text={}&dates={}/{}&details={}",
        urlencoding::encode(&pr.title),
        start.format(fmt),
        end.format(fmt),
        urlencoding::encode(&details),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, PrStatus, Priority};
    use chrono::TimeZone;

    fn scheduled_card(id: i32, date: Option<&str>, time: Option<&str>, remind: bool) -> PrItem {
        PrItem {
            id,
            title: format!("PR {id}"),
            category: Category::Project,
            project: Some("Core".to_string()),
            service: None,
            author: "A".to_string(),
            description: None,
            status: PrStatus::InReview,
            priority: Priority::Medium,
            links: vec![],
            scheduled_date: date.map(str::to_string),
            scheduled_time: time.map(str::to_string),
            email_reminder: remind,
            calendar_event: false,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn past_schedules_are_due_future_ones_are_not() {
        let now = Utc.with_ymd_and_hms(2025, 9, 10, 12, 0, 0).unwrap();
        let prs = vec![
            scheduled_card(1, Some("2025-09-10"), Some("10:00"), true),
            scheduled_card(2, Some("2025-09-10"), Some("15:00"), true),
            scheduled_card(3, Some("2025-09-09"), None, true),
        ];

        let due = due_reminders(&prs, now);
        let ids: Vec<i32> = due.iter().map(|r| r.pr_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn cards_without_opt_in_or_schedule_are_skipped() {
        let now = Utc.with_ymd_and_hms(2025, 9, 10, 12, 0, 0).unwrap();
        let prs = vec![
            scheduled_card(1, Some("2025-09-01"), None, false),
            scheduled_card(2, None, None, true),
            scheduled_card(3, Some("not-a-date"), None, true),
        ];

        assert!(due_reminders(&prs, now).is_empty());
    }

    #[test]
    fn calendar_url_encodes_title_and_window() {
        let pr = scheduled_card(1, Some("2025-09-10"), Some("10:30"), true);
        let start = scheduled_at(&pr).unwrap();
        let url = google_calendar_url(&pr, start);

        assert!(url.starts_with("https://calendar.google.com/calendar/render"));
        assert!(url.contains("PR%201"));
        assert!(url.contains("20250910T103000Z/20250910T113000Z"));
    }
}
