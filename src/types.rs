use chrono::{DateTime, NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::payment::PaymentProof;

pub type SlotId = u32;
pub type TournamentId = u32;

lazy_static! {
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\d{10}$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    #[serde(with = "slot_time")]
    pub start_time: NaiveTime,
    pub display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_past: Option<bool>,
}

/// Slot start times travel as `HH:MM:SS`, older catalogs send `HH:MM`.
pub mod slot_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(value: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(value, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
    }

    pub fn format(time: &NaiveTime) -> String {
        time.format("%H:%M:%S").to_string()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub event_date: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub entry_fee: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Column name after the `image_url` rename on newer backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Tournament {
    /// The backend sends either `YYYY-MM-DD` or an HTTP date.
    pub fn event_day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.event_date, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc2822(&self.event_date)
                    .ok()
                    .map(|datetime| datetime.date_naive())
            })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fees arrive as numbers or as decimal strings; a null fee counts as free.
fn deserialize_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Option::<Amount>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Amount::Number(value)) => Ok(value),
        Some(Amount::Text(text)) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentToken {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockRequest {
    pub slot_id: SlotId,
    pub user_identifier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CustomerDetails {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(regex(
        path = *PHONE_REGEX,
        message = "Phone number must be exactly 10 digits."
    ))]
    pub phone: String,
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TournamentRegistration {
    pub tournament_id: TournamentId,
    #[validate(length(min = 1, message = "Team name is required"))]
    pub team_name: String,
    #[validate(length(min = 1, message = "Captain name is required"))]
    pub captain_name: String,
    #[validate(length(min = 1, message = "Captain phone is required"))]
    pub captain_phone: String,
}

/// Everything `/api/book_slot` receives as one multipart form.
#[derive(Debug, Clone)]
pub struct BookingSubmission {
    pub details: CustomerDetails,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub paid_amount: u32,
    pub payment_token: String,
    pub selected_slot_ids: Vec<SlotId>,
    pub user_identifier: String,
    pub proof: PaymentProof,
}
