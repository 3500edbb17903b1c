use crate::{
    selection::Selection,
    slot_loader::SlotBoard,
    types::{Slot, SlotId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Available,
    Booked,
    Past,
    Selected,
}

impl SlotStatus {
    pub fn title(&self) -> Option<&'static str> {
        match self {
            SlotStatus::Booked => Some("Booked"),
            SlotStatus::Past => Some("Time Passed"),
            SlotStatus::Available | SlotStatus::Selected => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotView {
    pub id: SlotId,
    pub display: String,
    pub status: SlotStatus,
}

fn status_of(board: &SlotBoard, selection: &Selection, slot: &Slot) -> SlotStatus {
    if board.is_booked(slot.id) {
        return SlotStatus::Booked;
    }
    if board.is_past(slot.id) {
        return SlotStatus::Past;
    }

    let selected = match (selection.start, selection.end) {
        (Some(start), Some(end)) => match (board.slot(start), board.slot(end)) {
            (Some(start), Some(end)) => {
                slot.start_time >= start.start_time && slot.start_time <= end.start_time
            }
            _ => false,
        },
        (Some(start), None) => start == slot.id,
        _ => false,
    };

    if selected {
        SlotStatus::Selected
    } else {
        SlotStatus::Available
    }
}

pub fn slot_views(board: &SlotBoard, selection: &Selection) -> Vec<SlotView> {
    board
        .slots()
        .iter()
        .map(|slot| SlotView {
            id: slot.id,
            display: slot.display.clone(),
            status: status_of(board, selection, slot),
        })
        .collect()
}

pub fn render_board(board: &SlotBoard, selection: &Selection) -> String {
    if board.is_empty() {
        return "No slots configured.".into();
    }

    slot_views(board, selection)
        .iter()
        .map(|view| {
            let marker = match view.status {
                SlotStatus::Selected => '*',
                SlotStatus::Available => ' ',
                SlotStatus::Booked | SlotStatus::Past => 'x',
            };
            let title = view
                .status
                .title()
                .map(|title| format!("  ({title})"))
                .unwrap_or_default();
            format!("[{marker}] #{:<4} {}{title}", view.id, view.display)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
