use chrono::NaiveDate;
use thiserror::Error;

use crate::types::SlotId;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Slot {0} does not exist for this date")]
    UnknownSlot(SlotId),

    #[error("Slot {0} is not available")]
    SlotUnavailable(SlotId),

    #[error("Selection includes booked slots. Please select a continuous available range.")]
    RangeUnavailable,

    #[error("End slot {end} must come after start slot {start}")]
    InvalidRange { start: SlotId, end: SlotId },

    #[error("Please select a time slot first")]
    EmptySelection,

    #[error("Bookings for {0} are no longer possible")]
    PastDate(NaiveDate),

    #[error("Paid amount must exactly match the total price. Expected {required}, got {paid}")]
    AmountMismatch { paid: u32, required: u32 },

    #[error("Payment time expired! The slot has been released.")]
    PaymentExpired,

    #[error("Invalid file type. Only PNG or JPEG images allowed.")]
    InvalidProofType,

    #[error("File too large ({0} bytes). Max 2MB.")]
    ProofTooLarge(u64),

    #[error("Invalid form: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
