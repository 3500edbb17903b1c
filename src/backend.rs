use crate::{
    error::BookingError,
    types::{BookingSubmission, LockRequest, Slot, SlotId, Tournament, TournamentRegistration},
};
use chrono::NaiveDate;
use std::future::Future;

/// Remote booking service the client talks to.
///
/// Every call resolves to the server's confirmation message or to the
/// `BookingError` that should be shown to the user.
pub trait BookingBackend: Clone + Send + Sync + 'static {
    fn slots(&self, date: NaiveDate) -> impl Future<Output = Result<Vec<Slot>, BookingError>> + Send;
    fn booked_slot_ids(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<SlotId>, BookingError>> + Send;
    fn lock_slot(
        &self,
        request: LockRequest,
    ) -> impl Future<Output = Result<String, BookingError>> + Send;
    fn initiate_payment(&self) -> impl Future<Output = Result<String, BookingError>> + Send;
    fn book_slot(
        &self,
        submission: BookingSubmission,
    ) -> impl Future<Output = Result<String, BookingError>> + Send;
    fn tournaments(&self) -> impl Future<Output = Result<Vec<Tournament>, BookingError>> + Send;
    fn register_tournament(
        &self,
        registration: TournamentRegistration,
    ) -> impl Future<Output = Result<String, BookingError>> + Send;
}
