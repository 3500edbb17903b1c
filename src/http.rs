use crate::backend::BookingBackend;
use crate::error::BookingError;
use crate::types::{
    slot_time, ApiMessage, BookingSubmission, LockRequest, PaymentToken, Slot, SlotId, Tournament,
    TournamentRegistration,
};
use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BookingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiMessage>(&body)
        .ok()
        .and_then(|message| message.error)
        .unwrap_or(body);
    error!(status = status.as_u16(), %message, "Request rejected by server");
    Err(BookingError::Server {
        status: status.as_u16(),
        message,
    })
}

/// Endpoints answering with `{"message": ..}` may still carry an `error`.
async fn read_message(response: Response) -> Result<String, BookingError> {
    let status = response.status().as_u16();
    let reply: ApiMessage = read_json(response).await?;
    match reply.error {
        Some(message) => {
            error!(status, %message, "Server reported an error");
            Err(BookingError::Server { status, message })
        }
        None => Ok(reply.message.unwrap_or_default()),
    }
}

fn booking_form(submission: BookingSubmission) -> Result<Form, BookingError> {
    let proof = submission.proof;
    let screenshot = Part::bytes(proof.bytes)
        .file_name(proof.file_name)
        .mime_str(proof.kind.mime_type())?;
    let selected_slot_ids = serde_json::to_string(&submission.selected_slot_ids)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;

    Ok(Form::new()
        .text("name", submission.details.name)
        .text("phone", submission.details.phone)
        .text("email", submission.details.email)
        .text("date", submission.date.format("%Y-%m-%d").to_string())
        .text("start_time", slot_time::format(&submission.start_time))
        .text("end_time", slot_time::format(&submission.end_time))
        .text("paid_amount", submission.paid_amount.to_string())
        .text("payment_token", submission.payment_token)
        .text("selected_slot_ids", selected_slot_ids)
        .text("user_identifier", submission.user_identifier)
        .part("payment_screenshot", screenshot))
}

impl BookingBackend for HttpBackend {
    async fn slots(&self, date: NaiveDate) -> Result<Vec<Slot>, BookingError> {
        debug!(%date, "Fetching slot catalog");
        let response = self
            .client
            .get(self.url("slots"))
            .query(&[("date", date.format("%Y-%m-%d").to_string())])
            .send()
            .await?;
        read_json(response).await
    }

    async fn booked_slot_ids(&self, date: NaiveDate) -> Result<Vec<SlotId>, BookingError> {
        debug!(%date, "Fetching booked slots");
        let response = self
            .client
            .get(self.url("check_availability"))
            .query(&[("date", date.format("%Y-%m-%d").to_string())])
            .send()
            .await?;
        read_json(response).await
    }

    async fn lock_slot(&self, request: LockRequest) -> Result<String, BookingError> {
        debug!(slot_id = request.slot_id, "Locking slot");
        let response = self
            .client
            .post(self.url("lock_slot"))
            .json(&request)
            .send()
            .await?;
        read_message(response).await
    }

    async fn initiate_payment(&self) -> Result<String, BookingError> {
        let response = self.client.post(self.url("initiate_payment")).send().await?;
        let token: PaymentToken = read_json(response).await?;
        Ok(token.token)
    }

    async fn book_slot(&self, submission: BookingSubmission) -> Result<String, BookingError> {
        let form = booking_form(submission)?;
        let response = self
            .client
            .post(self.url("book_slot"))
            .multipart(form)
            .send()
            .await?;
        read_message(response).await
    }

    async fn tournaments(&self) -> Result<Vec<Tournament>, BookingError> {
        let response = self.client.get(self.url("tournaments")).send().await?;
        read_json(response).await
    }

    async fn register_tournament(
        &self,
        registration: TournamentRegistration,
    ) -> Result<String, BookingError> {
        let response = self
            .client
            .post(self.url("register_tournament"))
            .json(&registration)
            .send()
            .await?;
        read_message(response).await
    }
}
