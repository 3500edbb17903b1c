use crate::{
    backend::BookingBackend,
    countdown::Countdown,
    error::BookingError,
    payment::{check_paid_amount, PaymentProof},
    pricing::{quote, Quote},
    selection::Selection,
    slot_loader::{load_board, SlotBoard},
    types::{BookingSubmission, CustomerDetails, LockRequest},
};
use chrono::NaiveDate;
use futures::StreamExt;
use std::{future::Future, time::Duration};
use tracing::{error, info, warn};
use validator::Validate;

/// Slots held for this user while the payment window is open.
#[derive(Debug)]
pub struct PaymentSession {
    pub token: String,
    pub date: NaiveDate,
    pub quote: Quote,
    countdown: Countdown,
}

impl PaymentSession {
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }
}

/// How the wait for the customer's payment ended.
#[derive(Debug)]
pub enum PaymentWait {
    Confirmed,
    /// The window closed and the slots were released. Holds the reloaded
    /// board unless fetching it failed.
    Expired { board: Option<SlotBoard> },
}

#[derive(Debug, Clone)]
pub struct LockAndPay<B: BookingBackend> {
    backend: B,
    user_identifier: String,
    payment_window: Duration,
}

impl<B: BookingBackend> LockAndPay<B> {
    pub fn new(backend: B, user_identifier: String, payment_window: Duration) -> Self {
        Self {
            backend,
            user_identifier,
            payment_window,
        }
    }

    /// Locks every selected slot in catalog order, then opens the payment
    /// window. The first refused lock aborts the flow with the server's error.
    pub async fn lock_and_pay<F>(
        &self,
        board: &SlotBoard,
        selection: &Selection,
        on_timeout: F,
    ) -> Result<PaymentSession, BookingError>
    where
        F: FnOnce() + Send + 'static,
    {
        let quote = quote(board, selection)?.ok_or(BookingError::EmptySelection)?;

        for slot_id in &quote.slot_ids {
            let request = LockRequest {
                slot_id: *slot_id,
                user_identifier: self.user_identifier.clone(),
            };
            self.backend.lock_slot(request).await.map_err(|err| {
                error!(?err, slot_id, "Failed to lock slot");
                err
            })?;
        }

        let token = self.backend.initiate_payment().await.map_err(|err| {
            error!(?err, "Error starting payment session");
            err
        })?;
        info!(
            slots = ?quote.slot_ids,
            price = quote.price,
            window_secs = self.payment_window.as_secs(),
            "Slots locked, payment window open"
        );

        Ok(PaymentSession {
            token,
            date: board.date(),
            quote,
            countdown: Countdown::start(self.payment_window, on_timeout),
        })
    }

    /// Waits until `confirmation` resolves or the payment window closes,
    /// reporting every countdown tick to `on_tick`. On expiry the board of
    /// the session's date is fetched again.
    pub async fn wait_for_payment<C, T>(
        &self,
        session: &PaymentSession,
        confirmation: C,
        mut on_tick: T,
    ) -> Result<PaymentWait, BookingError>
    where
        C: Future<Output = Result<(), BookingError>>,
        T: FnMut(u64),
    {
        let mut ticks = session.countdown.stream();
        tokio::pin!(confirmation);
        loop {
            tokio::select! {
                Some(left) = ticks.next() => on_tick(left),
                _ = session.countdown.expired() => break,
                confirmed = &mut confirmation => {
                    confirmed?;
                    return Ok(PaymentWait::Confirmed);
                }
            }
        }

        info!(date = %session.date, "Reloading slots after payment timeout");
        let board = match load_board(&self.backend, session.date).await {
            Ok(board) => Some(board),
            Err(err) => {
                warn!(?err, "Failed to reload slots after timeout");
                None
            }
        };
        Ok(PaymentWait::Expired { board })
    }

    /// May be retried with the same session after a server rejection.
    pub async fn submit(
        &self,
        session: &PaymentSession,
        details: CustomerDetails,
        paid_amount: u32,
        proof: PaymentProof,
    ) -> Result<String, BookingError> {
        if session.countdown.is_expired() {
            warn!("Submission after payment window closed");
            return Err(BookingError::PaymentExpired);
        }
        details.validate()?;
        check_paid_amount(paid_amount, session.quote.price)?;

        let submission = BookingSubmission {
            details,
            date: session.date,
            start_time: session.quote.start_time,
            end_time: session.quote.end_time,
            paid_amount,
            payment_token: session.token.clone(),
            selected_slot_ids: session.quote.slot_ids.clone(),
            user_identifier: self.user_identifier.clone(),
            proof,
        };

        let message = self.backend.book_slot(submission).await.map_err(|err| {
            error!(?err, "Booking submission failed");
            err
        })?;
        session.countdown.cancel();
        info!(%message, "Booking submitted");
        Ok(message)
    }
}
