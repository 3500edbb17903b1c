use std::process::ExitCode;

use crate::{
    backend::BookingBackend,
    booking_flow::{LockAndPay, PaymentWait},
    configuration::Configuration,
    configuration_handler::{BookArgs, Command, ConfigurationHandler},
    countdown::format_remaining,
    error::BookingError,
    http::HttpBackend,
    payment::PaymentProof,
    pricing::quote,
    selection::select_range,
    slot_loader::load_board,
    types::{CustomerDetails, TournamentRegistration},
    view_model::render_board,
};
use chrono::NaiveDate;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use validator::Validate;

mod backend;
mod booking_flow;
mod configuration;
mod configuration_handler;
mod countdown;
mod error;
mod http;
mod payment;
mod pricing;
mod selection;
mod slot_loader;
#[cfg(test)]
mod testutils;
mod tournaments;
mod types;
mod view_model;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("#################");
    println!("# Venue Booking #");
    println!("#################");

    let configuration = ConfigurationHandler::parse_arguments();
    let backend = HttpBackend::new(&configuration.api_url());

    let result = match configuration.command().clone() {
        Command::Slots { date } => show_slots(&backend, date).await,
        Command::Book(args) => book(&backend, &configuration, args).await,
        Command::Tournaments => show_tournaments(&backend).await,
        Command::Register {
            tournament_id,
            team_name,
            captain_name,
            captain_phone,
        } => {
            let registration = TournamentRegistration {
                tournament_id,
                team_name,
                captain_name,
                captain_phone,
            };
            tournaments::register(&backend, registration)
                .await
                .map(|message| println!("{message}"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn show_slots<B: BookingBackend>(backend: &B, date: NaiveDate) -> Result<(), BookingError> {
    let board = load_board(backend, date).await?;
    println!("Slots for {date}:");
    println!("{}", render_board(&board, &Default::default()));
    Ok(())
}

async fn show_tournaments<B: BookingBackend>(backend: &B) -> Result<(), BookingError> {
    let tournaments = tournaments::list_tournaments(backend).await?;
    println!("{}", tournaments::render_tournaments(&tournaments));
    Ok(())
}

async fn book<B: BookingBackend, C: Configuration>(
    backend: &B,
    configuration: &C,
    args: BookArgs,
) -> Result<(), BookingError> {
    let details = CustomerDetails {
        name: args.name,
        phone: args.phone,
        email: args.email,
    };
    details.validate()?;
    let proof = PaymentProof::from_path(&args.screenshot).await?;

    let board = load_board(backend, args.date).await?;
    let selection = select_range(&board, args.start, args.end)?;
    let quote = quote(&board, &selection)?.ok_or(BookingError::EmptySelection)?;

    println!("{}", render_board(&board, &selection));
    println!("Total: ₹{} for {}", quote.price, quote.summary());

    let flow = LockAndPay::new(
        backend.clone(),
        configuration.user_identifier(),
        configuration.payment_window(),
    );
    let session = flow
        .lock_and_pay(&board, &selection, || {
            warn!("Payment window closed, slots released");
        })
        .await?;

    println!(
        "Slots held. Pay ₹{} and press Enter to upload {}.",
        quote.price,
        args.screenshot.display()
    );

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let confirmation = async move {
        stdin.next_line().await?;
        Ok::<(), BookingError>(())
    };
    let wait = flow
        .wait_for_payment(&session, confirmation, |left| {
            if left % 60 == 0 || left <= 10 {
                println!("Time left: {}", format_remaining(left));
            }
        })
        .await?;

    if let PaymentWait::Expired { board } = wait {
        println!("{}", BookingError::PaymentExpired);
        if let Some(board) = board {
            println!("{}", render_board(&board, &Default::default()));
        }
        return Err(BookingError::PaymentExpired);
    }

    let paid_amount = args.paid_amount.unwrap_or(quote.price);
    let message = flow.submit(&session, details, paid_amount, proof).await?;
    println!("Booking Confirmed Successfully!");
    println!("{message}");
    Ok(())
}
