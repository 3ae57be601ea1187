//! Presentation components: badges, rows, and tables.
//!
//! Pure functions from domain values to text. No workflow decisions are
//! made here.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::{Complaint, ComplaintStatus, User};

/// Visual weight of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Finished well.
    Success,
    /// Work under way.
    Info,
    /// Awaiting action.
    Warning,
    /// Declined.
    Danger,
}

impl Tone {
    /// Lower-case tone name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// Status label plus tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    /// Status shown.
    pub status: ComplaintStatus,
    /// Tone for the status.
    pub tone: Tone,
}

impl Badge {
    /// Badge for `status`.
    pub const fn for_status(status: ComplaintStatus) -> Self {
        let tone = match status {
            ComplaintStatus::Resolved => Tone::Success,
            ComplaintStatus::InProgress => Tone::Info,
            ComplaintStatus::Pending => Tone::Warning,
            ComplaintStatus::Rejected => Tone::Danger,
        };
        Self { status, tone }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.status)
    }
}

/// Calendar date as `YYYY-MM-DD`.
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// One table row for a complaint.
pub fn complaint_row(complaint: &Complaint) -> String {
    format!(
        "#{:<5} {}  {:<10}  {:<13}  {}",
        complaint.id().get(),
        format_date(complaint.created_at()),
        complaint.category().as_str(),
        Badge::for_status(complaint.status()).to_string(),
        complaint.title()
    )
}

/// Heading, then one row per complaint or the empty-state message.
pub fn complaint_table(
    heading: &str,
    view: &[&Complaint],
    total: usize,
    empty_message: &str,
) -> String {
    let mut lines = vec![heading.to_owned()];
    if view.is_empty() {
        lines.push(empty_message.to_owned());
    } else {
        lines.extend(view.iter().map(|complaint| complaint_row(complaint)));
        if view.len() != total {
            lines.push(format!("Showing {} of {total} complaints", view.len()));
        }
    }
    lines.join("\n")
}

/// Multi-line detail view of one complaint.
pub fn complaint_detail(complaint: &Complaint) -> String {
    let badge = Badge::for_status(complaint.status());
    let mut lines = vec![
        format!("#{} {}", complaint.id(), complaint.title()),
        format!("Category: {}", complaint.category()),
        format!("Status:   {} ({})", badge.status, badge.tone.as_str()),
        format!("Created:  {}", format_date(complaint.created_at())),
    ];
    if let Some(updated) = complaint.updated_at() {
        lines.push(format!("Updated:  {}", format_date(updated)));
    }
    if !complaint.description().is_empty() {
        lines.push(String::new());
        lines.push(complaint.description().to_owned());
    }
    lines.join("\n")
}

/// Profile summary.
pub fn profile(user: &User) -> String {
    let mut lines = vec![
        format!("{} <{}>", user.name(), user.email()),
        format!("Role:        {}", user.role()),
        format!("Roll number: {}", user.roll_number()),
    ];
    match (user.hostel(), user.room_number()) {
        (Some(hostel), Some(room)) => lines.push(format!("Hostel:      {hostel}, room {room}")),
        (Some(hostel), None) => lines.push(format!("Hostel:      {hostel}")),
        (None, Some(room)) => lines.push(format!("Room:        {room}")),
        (None, None) => {}
    }
    lines.join("\n")
}

/// One line per user.
pub fn user_table(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_owned();
    }
    users
        .iter()
        .map(|user| {
            format!(
                "{:<5} {:<8} {:<10} {} <{}>",
                user.id().get(),
                user.role().as_str(),
                user.roll_number(),
                user.name(),
                user.email()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    //! Rendering of badges and complaint rows.
    use super::*;
    use crate::domain::{Category, ComplaintId, Hostel, Role, UserId};
    use chrono::TimeZone;
    use rstest::rstest;

    fn sample() -> Complaint {
        let created = Utc
            .with_ymd_and_hms(2024, 3, 1, 23, 59, 0)
            .single()
            .expect("valid date");
        Complaint::builder(ComplaintId::new(7), created)
            .title("Fan not working")
            .category(Category::Electrical)
            .description("Room 12")
            .build()
    }

    #[rstest]
    #[case(ComplaintStatus::Resolved, Tone::Success)]
    #[case(ComplaintStatus::InProgress, Tone::Info)]
    #[case(ComplaintStatus::Pending, Tone::Warning)]
    #[case(ComplaintStatus::Rejected, Tone::Danger)]
    fn badge_tones(#[case] status: ComplaintStatus, #[case] tone: Tone) {
        assert_eq!(Badge::for_status(status).tone, tone);
    }

    #[rstest]
    fn rows_show_id_date_category_and_status() {
        let row = complaint_row(&sample());
        assert!(row.starts_with("#7"));
        assert!(row.contains("2024-03-01"));
        assert!(row.contains("Electrical"));
        assert!(row.contains("[Pending]"));
        assert!(row.ends_with("Fan not working"));
    }

    #[rstest]
    fn empty_table_shows_message() {
        let table = complaint_table("My Complaints", &[], 0, "Nothing here");
        assert_eq!(table, "My Complaints\nNothing here");
    }

    #[rstest]
    fn filtered_table_reports_counts() {
        let complaint = sample();
        let table = complaint_table("Manage Complaints", &[&complaint], 3, "unused");
        assert!(table.ends_with("Showing 1 of 3 complaints"));
    }

    #[rstest]
    fn detail_includes_tone_and_description() {
        let detail = complaint_detail(&sample());
        assert!(detail.contains("Status:   Pending (warning)"));
        assert!(detail.ends_with("Room 12"));
    }

    #[rstest]
    fn profile_lists_hostel_and_room() {
        let user = User::builder(UserId::new(2), "asha@example.edu")
            .name("Asha")
            .roll_number("21CS042")
            .hostel(Some(Hostel::NewRuby))
            .room_number(Some("B-114".to_owned()))
            .role(Role::Student)
            .build();
        let rendered = profile(&user);
        assert!(rendered.starts_with("Asha <asha@example.edu>"));
        assert!(rendered.contains("Hostel:      New Ruby, room B-114"));
    }
}
