use crate::{
    backend::BookingBackend,
    error::BookingError,
    types::{Slot, SlotId},
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use tracing::{error, info};

/// Slot catalog of one date merged with the ids already booked on it.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotBoard {
    date: NaiveDate,
    slots: Vec<Slot>,
    booked: HashSet<SlotId>,
    past: HashSet<SlotId>,
}

impl SlotBoard {
    pub fn new(
        date: NaiveDate,
        mut slots: Vec<Slot>,
        booked_ids: Vec<SlotId>,
        now: NaiveDateTime,
    ) -> Self {
        slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));

        // The server's flag wins; otherwise only today's slots can have passed.
        let past = slots
            .iter()
            .filter(|slot| {
                slot.is_past
                    .unwrap_or_else(|| date == now.date() && date.and_time(slot.start_time) < now)
            })
            .map(|slot| slot.id)
            .collect();

        Self {
            date,
            slots,
            booked: booked_ids.into_iter().collect(),
            past,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    pub fn index_of(&self, id: SlotId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    pub fn is_booked(&self, id: SlotId) -> bool {
        self.booked.contains(&id)
    }

    pub fn is_past(&self, id: SlotId) -> bool {
        self.past.contains(&id)
    }

    pub fn is_available(&self, id: SlotId) -> bool {
        !self.is_booked(id) && !self.is_past(id)
    }

    /// Slots from `start` to `end`, both inclusive, in catalog order.
    pub fn range(&self, start: SlotId, end: SlotId) -> Result<&[Slot], BookingError> {
        let start_index = self.index_of(start).ok_or(BookingError::UnknownSlot(start))?;
        let end_index = self.index_of(end).ok_or(BookingError::UnknownSlot(end))?;
        if end_index < start_index {
            return Ok(&[]);
        }
        Ok(&self.slots[start_index..=end_index])
    }

    pub fn range_is_available(&self, start: SlotId, end: SlotId) -> Result<bool, BookingError> {
        let range = self.range(start, end)?;
        Ok(!range.is_empty() && range.iter().all(|slot| self.is_available(slot.id)))
    }
}

pub fn check_bookable_date(date: NaiveDate, today: NaiveDate) -> Result<(), BookingError> {
    if date < today {
        return Err(BookingError::PastDate(date));
    }
    Ok(())
}

pub async fn load_board<B: BookingBackend>(
    backend: &B,
    date: NaiveDate,
) -> Result<SlotBoard, BookingError> {
    let now = Local::now().naive_local();
    check_bookable_date(date, now.date())?;

    let slots = backend.slots(date).await.map_err(|err| {
        error!(?err, %date, "Error loading slots");
        err
    })?;
    let booked_ids = backend.booked_slot_ids(date).await.map_err(|err| {
        error!(?err, %date, "Error loading availability");
        err
    })?;
    info!(%date, slots = slots.len(), booked = booked_ids.len(), "Loaded slot board");

    Ok(SlotBoard::new(date, slots, booked_ids, now))
}
