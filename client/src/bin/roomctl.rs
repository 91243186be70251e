use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use client::{submit_booking, AdminBoard, BookingClient, BookingList, ClientError, RoomBrowser, RoomClient};
use common_net::telemetry;
use domain::{datetime::now_local, AdminAction, BookingForm};

const DEFAULT_API: &str = "http://127.0.0.1:3000/api";

#[derive(Debug, Parser)]
#[command(author, version, about = "Browse rooms and manage bookings through the booking gateway")]
struct Cli {
    /// Gateway API prefix.
    #[arg(long, env = "ROOMCTL_API", default_value = DEFAULT_API, global = true)]
    api: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List rooms with their current availability.
    Rooms,
    /// List bookings.
    Bookings(FilterArgs),
    /// Admin board: summary counts, filtered bookings and the actions they allow.
    Board(FilterArgs),
    /// Book a room.
    Book(BookArgs),
    /// Approve a pending booking.
    Approve { id: String },
    /// Reject a pending booking.
    Reject { id: String },
    /// Mark an approved booking as completed.
    Complete { id: String },
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// Case-insensitive match on title, organizer or room name.
    #[arg(long, default_value = "")]
    search: String,
    /// `all`, `pending`, `approved`, `rejected` or `completed`.
    #[arg(long, default_value = "all")]
    status: String,
}

#[derive(Debug, Args)]
struct BookArgs {
    room_id: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    /// Local time, e.g. 2025-01-01T10:00.
    #[arg(long)]
    start: String,
    #[arg(long)]
    end: String,
}

async fn run(cli: Cli) -> Result<String, ClientError> {
    let bookings = BookingClient::new(&cli.api);

    match cli.command {
        Command::Rooms => {
            let rooms = RoomClient::new(&cli.api);
            Ok(RoomBrowser::load(&rooms).await?.render())
        }
        Command::Bookings(filter) => {
            if filter.search.is_empty() && filter.status == "all" {
                return Ok(BookingList::load(&bookings).await?.render());
            }
            let board = load_board(bookings, &filter).await?;
            Ok(BookingList {
                bookings: board.visible(),
            }
            .render())
        }
        Command::Board(filter) => Ok(load_board(bookings, &filter).await?.render()),
        Command::Book(args) => {
            let form = BookingForm {
                name: args.name,
                title: args.title,
                description: args.description,
                start_time: args.start,
                end_time: args.end,
            };
            let booking = submit_booking(&bookings, &args.room_id, form, now_local()).await?;
            Ok(format!("Booking {} created ({})", booking.id, booking.status))
        }
        Command::Approve { id } => act(bookings, &id, AdminAction::Approve).await,
        Command::Reject { id } => act(bookings, &id, AdminAction::Reject).await,
        Command::Complete { id } => act(bookings, &id, AdminAction::Complete).await,
    }
}

async fn load_board(
    api: BookingClient,
    filter: &FilterArgs,
) -> Result<AdminBoard<BookingClient>, ClientError> {
    let mut board = AdminBoard::new(api);
    board.refresh().await?;
    board.set_search(filter.search.as_str());
    board.set_status_filter(filter.status.as_str());
    Ok(board)
}

async fn act(api: BookingClient, id: &str, action: AdminAction) -> Result<String, ClientError> {
    let mut board = AdminBoard::new(api);
    board.refresh().await?;
    let updated = board.apply(id, action).await?;
    Ok(format!("Booking {} is now {}", updated.id, updated.status))
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_with_filter("roomctl", "warn");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
