use crate::{error::BookingError, slot_loader::SlotBoard, types::SlotId};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: Option<SlotId>,
    pub end: Option<SlotId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Started(SlotId),
    Cleared,
    Restarted(SlotId),
    Completed { start: SlotId, end: SlotId },
}

/// Two-click range picker over a `SlotBoard`.
///
/// The end is only ever set when every slot from start to end is free, so a
/// rejected click leaves the selection exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct RangeSelector {
    selection: Selection,
}

impl RangeSelector {
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn click(&mut self, board: &SlotBoard, id: SlotId) -> Result<SelectionChange, BookingError> {
        let clicked = board.slot(id).ok_or(BookingError::UnknownSlot(id))?;
        if !board.is_available(id) {
            warn!(slot_id = id, "Click on unavailable slot ignored");
            return Err(BookingError::SlotUnavailable(id));
        }

        let change = match (self.selection.start, self.selection.end) {
            (Some(start), _) if start == id => {
                self.selection = Selection::default();
                SelectionChange::Cleared
            }
            (Some(start), None) => match board.slot(start) {
                Some(start_slot) if clicked.start_time > start_slot.start_time => {
                    if !board.range_is_available(start, id)? {
                        warn!(start, end = id, "Selection includes booked slots");
                        return Err(BookingError::RangeUnavailable);
                    }
                    self.selection.end = Some(id);
                    SelectionChange::Completed { start, end: id }
                }
                _ => self.start_at(id, SelectionChange::Restarted(id)),
            },
            (Some(_), Some(_)) => self.start_at(id, SelectionChange::Restarted(id)),
            (None, _) => self.start_at(id, SelectionChange::Started(id)),
        };

        debug!(?change, selection = ?self.selection, "Selection changed");
        Ok(change)
    }

    fn start_at(&mut self, id: SlotId, change: SelectionChange) -> SelectionChange {
        self.selection = Selection {
            start: Some(id),
            end: None,
        };
        change
    }
}

/// Replays the start and end clicks of a range picked in one go.
pub fn select_range(
    board: &SlotBoard,
    start: SlotId,
    end: Option<SlotId>,
) -> Result<Selection, BookingError> {
    let mut selector = RangeSelector::default();
    selector.click(board, start)?;
    if let Some(end) = end.filter(|end| *end != start) {
        if let SelectionChange::Restarted(_) = selector.click(board, end)? {
            return Err(BookingError::InvalidRange { start, end });
        }
    }
    Ok(selector.selection())
}
