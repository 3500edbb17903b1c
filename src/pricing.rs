use crate::{
    error::BookingError, selection::Selection, slot_loader::SlotBoard, types::SlotId,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

pub const HOURLY_RATE: u32 = 800;
pub const WEEKEND_TWO_HOUR_PRICE: u32 = 1500;
/// Every catalog slot is a one hour block.
pub const SLOT_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub slot_ids: Vec<SlotId>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub minutes: i64,
    pub price: u32,
}

impl Quote {
    pub fn hours(&self) -> f64 {
        self.minutes as f64 / 60.0
    }

    /// e.g. `2 hours (10:00 AM - 12:00 PM)`
    pub fn summary(&self) -> String {
        let hours = if self.minutes % 60 == 0 {
            (self.minutes / 60).to_string()
        } else {
            format!("{:.1}", self.hours())
        };
        format!(
            "{hours} hours ({} - {})",
            self.start_time.format("%I:%M %p"),
            self.end_time.format("%I:%M %p")
        )
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn price_for(date: NaiveDate, minutes: i64) -> u32 {
    if is_weekend(date) && minutes == 120 {
        return WEEKEND_TWO_HOUR_PRICE;
    }
    (minutes.max(0) as u64 * HOURLY_RATE as u64 / 60) as u32
}

/// Price the current selection. A lone start slot counts as a one slot range.
pub fn quote(board: &SlotBoard, selection: &Selection) -> Result<Option<Quote>, BookingError> {
    let Some(start) = selection.start else {
        return Ok(None);
    };
    let end = selection.end.unwrap_or(start);

    let range = board.range(start, end)?;
    let (Some(first), Some(last)) = (range.first(), range.last()) else {
        return Err(BookingError::EmptySelection);
    };

    let date = board.date();
    let begins = date.and_time(first.start_time);
    let ends = date.and_time(last.start_time) + Duration::minutes(SLOT_MINUTES);
    let minutes = (ends - begins).num_minutes();

    Ok(Some(Quote {
        slot_ids: range.iter().map(|slot| slot.id).collect(),
        start_time: begins.time(),
        end_time: ends.time(),
        minutes,
        price: price_for(date, minutes),
    }))
}
