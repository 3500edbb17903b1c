use crate::{
    backend::BookingBackend,
    error::BookingError,
    types::{Tournament, TournamentRegistration},
};
use tracing::{error, info};
use validator::Validate;

pub const TOURNAMENT_IMAGE_DIR: &str = "/static/tournament_images";

/// Prefers `image_url` and falls back to the renamed `image` column.
pub fn image_source(tournament: &Tournament) -> String {
    let image = [&tournament.image_url, &tournament.image]
        .into_iter()
        .filter_map(|image| image.as_deref().map(str::trim))
        .find(|image| !image.is_empty());
    match image {
        Some(image) if image.starts_with("http") => image.to_string(),
        Some(image) if !image.is_empty() => format!("{TOURNAMENT_IMAGE_DIR}/{image}"),
        _ => format!("{TOURNAMENT_IMAGE_DIR}/default.jpg"),
    }
}

pub fn render_tournaments(tournaments: &[Tournament]) -> String {
    if tournaments.is_empty() {
        return "No upcoming tournaments.".into();
    }

    tournaments
        .iter()
        .map(|tournament| {
            let date = tournament
                .event_day()
                .map(|day| day.format("%d %b %Y").to_string())
                .unwrap_or_else(|| tournament.event_date.clone());
            format!(
                "#{} {}\n    {}\n    {date} | entry ₹{} | {}",
                tournament.id,
                tournament.title,
                tournament.description,
                tournament.entry_fee,
                image_source(tournament)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn list_tournaments<B: BookingBackend>(
    backend: &B,
) -> Result<Vec<Tournament>, BookingError> {
    let tournaments = backend.tournaments().await.map_err(|err| {
        error!(?err, "Error loading tournaments");
        err
    })?;
    info!(count = tournaments.len(), "Loaded tournaments");
    Ok(tournaments)
}

pub async fn register<B: BookingBackend>(
    backend: &B,
    registration: TournamentRegistration,
) -> Result<String, BookingError> {
    let registration = TournamentRegistration {
        tournament_id: registration.tournament_id,
        team_name: registration.team_name.trim().to_string(),
        captain_name: registration.captain_name.trim().to_string(),
        captain_phone: registration.captain_phone.trim().to_string(),
    };
    registration.validate()?;

    let tournament_id = registration.tournament_id;
    let message = backend
        .register_tournament(registration)
        .await
        .map_err(|err| {
            error!(?err, tournament_id, "Registration failed");
            err
        })?;
    info!(tournament_id, "Team registered");
    Ok(message)
}
