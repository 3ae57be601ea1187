//! Wire DTOs for the complaint backend.
//!
//! Responses decode into these shapes first and are then mapped into domain
//! values in one pass. Mapping failures are plain strings; the adapter wraps
//! them as fetch errors.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{
    AccessToken, Category, Complaint, ComplaintId, ComplaintStatus, Hostel, NewComplaint,
    Registration, Role, Session, User, UserId,
};

const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Serialize)]
pub(super) struct LoginRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginResponseDto {
    pub(super) access_token: String,
    pub(super) role: String,
}

impl LoginResponseDto {
    pub(super) fn into_session(self) -> Result<Session, String> {
        let token = AccessToken::new(self.access_token);
        if token.is_blank() {
            return Err("login response carried an empty access token".to_owned());
        }
        let role = self.role.parse::<Role>().map_err(|err| err.to_string())?;
        Ok(Session::new(token, role))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RegisterRequestDto<'a> {
    pub(super) name: &'a str,
    pub(super) email: &'a str,
    pub(super) roll_number: &'a str,
    pub(super) password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) hostel_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) room_number: Option<&'a str>,
}

impl<'a> From<&'a Registration> for RegisterRequestDto<'a> {
    fn from(registration: &'a Registration) -> Self {
        Self {
            name: registration.name(),
            email: registration.email(),
            roll_number: registration.roll_number(),
            password: registration.password(),
            hostel_name: registration.hostel().map(Hostel::as_str),
            room_number: registration.room_number(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: i64,
    pub(super) name: String,
    pub(super) email: String,
    pub(super) roll_number: String,
    #[serde(default)]
    pub(super) hostel_name: Option<String>,
    #[serde(default)]
    pub(super) room_number: Option<String>,
    pub(super) role: String,
}

impl UserDto {
    pub(super) fn into_domain(self) -> Result<User, String> {
        let role = self.role.parse::<Role>().map_err(|err| err.to_string())?;
        let hostel = match self.hostel_name.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<Hostel>() {
                Ok(hostel) => Some(hostel),
                Err(err) => {
                    warn!(user_id = self.id, error = %err, "ignoring unknown hostel");
                    None
                }
            },
        };
        Ok(User::builder(UserId::new(self.id), self.email)
            .name(self.name)
            .roll_number(self.roll_number)
            .hostel(hostel)
            .room_number(self.room_number.filter(|room| !room.trim().is_empty()))
            .role(role)
            .build())
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreateComplaintDto<'a> {
    pub(super) category: &'static str,
    pub(super) title: &'a str,
    pub(super) description: &'a str,
}

impl<'a> From<&'a NewComplaint> for CreateComplaintDto<'a> {
    fn from(complaint: &'a NewComplaint) -> Self {
        Self {
            category: complaint.category().as_str(),
            title: complaint.title(),
            description: complaint.description(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateStatusDto {
    pub(super) status: ComplaintStatus,
}

#[derive(Debug, Deserialize)]
pub(super) struct ComplaintDto {
    pub(super) id: i64,
    #[serde(default)]
    pub(super) user_id: Option<i64>,
    pub(super) title: String,
    pub(super) category: String,
    #[serde(default)]
    pub(super) description: Option<String>,
    pub(super) status: String,
    pub(super) created_at: String,
    #[serde(default)]
    pub(super) updated_at: Option<String>,
}

impl ComplaintDto {
    pub(super) fn into_domain(self) -> Result<Complaint, String> {
        let status = self
            .status
            .parse::<ComplaintStatus>()
            .map_err(|err| format!("complaint {}: {err}", self.id))?;
        let category = self.category.parse::<Category>().unwrap_or_else(|err| {
            warn!(complaint_id = self.id, error = %err, "treating unknown category as Others");
            Category::Others
        });
        let created_at = parse_timestamp(&self.created_at)
            .map_err(|err| format!("complaint {} created_at: {err}", self.id))?;
        let updated_at = self
            .updated_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()
            .map_err(|err| format!("complaint {} updated_at: {err}", self.id))?;

        let builder = Complaint::builder(ComplaintId::new(self.id), created_at)
            .title(self.title)
            .category(category)
            .description(self.description.unwrap_or_default())
            .status(status)
            .updated_at(updated_at);
        Ok(match self.user_id {
            Some(owner) => builder.owner(UserId::new(owner)),
            None => builder,
        }
        .build())
    }
}

/// Accept RFC 3339, or a naive ISO-8601 timestamp interpreted as UTC.
pub(super) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, NAIVE_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|err| format!("invalid timestamp '{raw}': {err}"))
}

/// Human-readable message from an error body: a `detail` string, or the
/// first `msg` of a validation list.
pub(super) fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let detail = value.get("detail")?;
    let message = match detail {
        serde_json::Value::String(text) => text.as_str(),
        serde_json::Value::Array(items) => items.first()?.get("msg")?.as_str()?,
        _ => return None,
    };
    let trimmed = message.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
