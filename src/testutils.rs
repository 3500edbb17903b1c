use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::json;
use tokio::task::JoinHandle;

use crate::{
    backend::BookingBackend,
    error::BookingError,
    slot_loader::SlotBoard,
    types::{BookingSubmission, LockRequest, Slot, SlotId, Tournament, TournamentRegistration},
};

/// Five one hour slots from 10:00 to 14:00 with ids 1 to 5.
pub fn example_slots() -> Vec<Slot> {
    (0..5)
        .map(|offset| {
            let start_time = NaiveTime::from_hms_opt(10 + offset, 0, 0).unwrap();
            Slot {
                id: offset + 1,
                start_time,
                display: start_time.format("%I:%M %p").to_string(),
                is_past: None,
            }
        })
        .collect()
}

pub fn board_at(date: NaiveDate, now: NaiveDateTime, booked: Vec<SlotId>) -> SlotBoard {
    SlotBoard::new(date, example_slots(), booked, now)
}

pub fn board_on(date: NaiveDate, booked: Vec<SlotId>) -> SlotBoard {
    let day_before = (date - Duration::days(1)).and_hms_opt(9, 0, 0).unwrap();
    board_at(date, day_before, booked)
}

/// Board for Wednesday 2026-10-21, seen from the day before.
pub fn example_board(booked: Vec<SlotId>) -> SlotBoard {
    board_on(NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(), booked)
}

pub fn example_tournament() -> Tournament {
    Tournament {
        id: 1,
        title: "Night Cup".into(),
        description: "Six a side, floodlit".into(),
        event_date: "Fri, 20 Nov 2026 00:00:00 GMT".into(),
        entry_fee: 1500.0,
        image_url: None,
        image: None,
    }
}

pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.resize(len.max(bytes.len()), 0);
    bytes
}

pub fn jpeg_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.resize(len.max(bytes.len()), 0);
    bytes
}

pub struct MockBookingBackendInner {
    pub success: AtomicBool,
    pub calls_to_slots: AtomicU64,
    pub calls_to_booked_slot_ids: AtomicU64,
    pub calls_to_lock_slot: AtomicU64,
    pub calls_to_initiate_payment: AtomicU64,
    pub calls_to_book_slot: AtomicU64,
    pub calls_to_tournaments: AtomicU64,
    pub calls_to_register_tournament: AtomicU64,
    pub booked_ids: Mutex<Vec<SlotId>>,
    pub refuse_lock_for: Mutex<Option<SlotId>>,
    pub locked: Mutex<Vec<LockRequest>>,
    pub submissions: Mutex<Vec<BookingSubmission>>,
    pub registrations: Mutex<Vec<TournamentRegistration>>,
}

#[derive(Clone)]
pub struct MockBookingBackend(pub Arc<MockBookingBackendInner>);

impl MockBookingBackendInner {
    fn new() -> Self {
        Self {
            success: AtomicBool::new(true),
            calls_to_slots: AtomicU64::default(),
            calls_to_booked_slot_ids: AtomicU64::default(),
            calls_to_lock_slot: AtomicU64::default(),
            calls_to_initiate_payment: AtomicU64::default(),
            calls_to_book_slot: AtomicU64::default(),
            calls_to_tournaments: AtomicU64::default(),
            calls_to_register_tournament: AtomicU64::default(),
            booked_ids: Mutex::default(),
            refuse_lock_for: Mutex::default(),
            locked: Mutex::default(),
            submissions: Mutex::default(),
            registrations: Mutex::default(),
        }
    }
}

impl MockBookingBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockBookingBackendInner::new()))
    }

    fn result(&self) -> Result<(), BookingError> {
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(BookingError::Server {
                status: 500,
                message: "Supposed to fail".into(),
            }),
        }
    }
}

impl BookingBackend for MockBookingBackend {
    async fn slots(&self, _date: NaiveDate) -> Result<Vec<Slot>, BookingError> {
        self.0.calls_to_slots.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(example_slots())
    }

    async fn booked_slot_ids(&self, _date: NaiveDate) -> Result<Vec<SlotId>, BookingError> {
        self.0.calls_to_booked_slot_ids.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.booked_ids.lock().unwrap().clone())
    }

    async fn lock_slot(&self, request: LockRequest) -> Result<String, BookingError> {
        self.0.calls_to_lock_slot.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        if *self.0.refuse_lock_for.lock().unwrap() == Some(request.slot_id) {
            return Err(BookingError::Server {
                status: 409,
                message: format!("Slot {} is held by another user", request.slot_id),
            });
        }
        self.0.locked.lock().unwrap().push(request);
        Ok("Slot locked".into())
    }

    async fn initiate_payment(&self) -> Result<String, BookingError> {
        self.0.calls_to_initiate_payment.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok("token-1".into())
    }

    async fn book_slot(&self, submission: BookingSubmission) -> Result<String, BookingError> {
        self.0.calls_to_book_slot.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        self.0.submissions.lock().unwrap().push(submission);
        Ok("Booking request submitted. Waiting for verification.".into())
    }

    async fn tournaments(&self) -> Result<Vec<Tournament>, BookingError> {
        self.0.calls_to_tournaments.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(vec![example_tournament()])
    }

    async fn register_tournament(
        &self,
        registration: TournamentRegistration,
    ) -> Result<String, BookingError> {
        self.0
            .calls_to_register_tournament
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;
        self.0.registrations.lock().unwrap().push(registration);
        Ok("Registration successful!".into())
    }
}

/// In-process stand-in for the booking website's `/api` routes.
#[derive(Default)]
pub struct FakeApi {
    pub booked: Vec<SlotId>,
    pub lock_calls: AtomicU64,
    pub submitted_fields: Mutex<HashMap<String, String>>,
}

impl FakeApi {
    pub fn with_booked(booked: Vec<SlotId>) -> Self {
        Self {
            booked,
            ..Self::default()
        }
    }
}

type SharedApi = Arc<FakeApi>;

#[derive(Deserialize)]
struct DateQuery {
    date: Option<String>,
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn fake_slots() -> Json<Vec<Slot>> {
    Json(example_slots())
}

async fn fake_availability(State(api): State<SharedApi>, Query(query): Query<DateQuery>) -> Response {
    match query.date {
        Some(_) => Json(api.booked.clone()).into_response(),
        None => api_error(StatusCode::BAD_REQUEST, "Date required"),
    }
}

async fn fake_lock(State(api): State<SharedApi>, Json(request): Json<LockRequest>) -> Response {
    api.lock_calls.fetch_add(1, Ordering::SeqCst);
    if api.booked.contains(&request.slot_id) {
        return api_error(StatusCode::CONFLICT, "Slot is currently held by another user");
    }
    Json(json!({ "message": "Slot locked" })).into_response()
}

async fn fake_initiate_payment() -> impl IntoResponse {
    Json(json!({ "token": "token-1" }))
}

async fn fake_book(State(api): State<SharedApi>, mut multipart: Multipart) -> Response {
    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let value = match file_name {
            Some(file_name) => {
                field.bytes().await.unwrap();
                file_name
            }
            None => field.text().await.unwrap(),
        };
        fields.insert(name, value);
    }

    if fields.get("payment_token").map_or(true, |token| token.is_empty()) {
        return api_error(
            StatusCode::BAD_REQUEST,
            "Payment token missing. Please restart payment timer.",
        );
    }
    *api.submitted_fields.lock().unwrap() = fields;
    Json(json!({ "message": "Booking request submitted. Waiting for verification." }))
        .into_response()
}

async fn fake_tournaments() -> Json<Vec<Tournament>> {
    Json(vec![example_tournament()])
}

async fn fake_register(Json(registration): Json<TournamentRegistration>) -> Response {
    if registration.tournament_id != example_tournament().id {
        return api_error(StatusCode::BAD_REQUEST, "Invalid Tournament ID");
    }
    Json(json!({ "message": "Registration successful!" })).into_response()
}

pub async fn spawn_fake_api(api: FakeApi) -> (JoinHandle<()>, String, SharedApi) {
    let api = Arc::new(api);
    let app = Router::new()
        .route("/api/slots", get(fake_slots))
        .route("/api/check_availability", get(fake_availability))
        .route("/api/lock_slot", post(fake_lock))
        .route("/api/initiate_payment", post(fake_initiate_payment))
        .route("/api/book_slot", post(fake_book))
        .route("/api/tournaments", get(fake_tournaments))
        .route("/api/register_tournament", post(fake_register))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (server, format!("http://{address}"), api)
}
