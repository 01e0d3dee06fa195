mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calhelper")]
#[command(about = "Read and write Google Calendar events as plain JSON")]
struct Cli {
    /// Calendar to use instead of google.default_calendar_id
    #[arg(short, long, global = true)]
    calendar: Option<String>,

    /// Config file (defaults to ~/.config/calhelper/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Include the raw Google objects in the output
    #[arg(long, global = true)]
    raw: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a single event
    Get {
        id: String,
    },
    /// List events of the calendar
    List {
        /// Earliest end time (e.g. "2025-03-01", "today", "-7d")
        #[arg(long, allow_hyphen_values = true)]
        from: Option<String>,

        /// Latest start time
        #[arg(long, allow_hyphen_values = true)]
        to: Option<String>,

        /// Free text search
        #[arg(short, long)]
        query: Option<String>,

        /// Expand recurring events into instances
        #[arg(long)]
        single_events: bool,

        #[arg(long)]
        show_deleted: bool,
    },
    /// List the instances of a recurring event
    Instances {
        id: String,

        #[arg(long, allow_hyphen_values = true)]
        from: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        to: Option<String>,
    },
    /// Fetch several events in one batch
    Batch {
        #[arg(required = true)]
        ids: Vec<String>,

        /// Also fetch the instances of recurring events
        #[arg(short = 'r', long)]
        with_recurrences: bool,
    },
    /// Create a new event
    Create {
        /// Event title
        title: String,

        /// Start (Unix timestamp, "2025-03-20 15:00", "tomorrow", "+1h", ...)
        #[arg(short, long)]
        start: String,

        /// End; for all-day events the last day of the event
        #[arg(short, long)]
        end: String,

        #[arg(long)]
        all_day: bool,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        /// Recurrence rule (e.g. "FREQ=WEEKLY;BYDAY=MO")
        #[arg(long)]
        rrule: Option<String>,

        /// Last occurrence of the recurrence rule
        #[arg(long, requires = "rrule")]
        until: Option<String>,

        /// IANA zone for start/end (defaults to google.time_zone)
        #[arg(long)]
        time_zone: Option<String>,
    },
    /// Change an existing event
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        end: Option<String>,

        /// Switch the event to all-day (true) or timed (false)
        #[arg(long)]
        all_day: Option<bool>,

        #[arg(long)]
        rrule: Option<String>,
    },
    /// Delete an event
    Delete {
        id: String,
    },
    /// Format a date as RFC3339 (or YYYY-MM-DD for all-day events)
    Rfc3339 {
        #[arg(allow_hyphen_values = true)]
        input: String,

        #[arg(long)]
        all_day: bool,

        /// Treat the date as an all-day end (adds one day)
        #[arg(long)]
        end: bool,
    },
    /// Format a date for a recurrence rule (YYYYMMDDTHHMMSSZ)
    Rfc2445 {
        #[arg(allow_hyphen_values = true)]
        input: String,
    },
    /// Write a commented config file
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::Options {
        calendar: cli.calendar,
        config: cli.config,
        raw: cli.raw,
    };

    match cli.command {
        Commands::Get { id } => commands::read::get(&ctx, &id).await,
        Commands::List {
            from,
            to,
            query,
            single_events,
            show_deleted,
        } => {
            commands::read::list(
                &ctx,
                commands::read::ListArgs {
                    from,
                    to,
                    query,
                    single_events,
                    show_deleted,
                },
            )
            .await
        }
        Commands::Instances { id, from, to } => {
            commands::read::instances(&ctx, &id, from.as_deref(), to.as_deref()).await
        }
        Commands::Batch {
            ids,
            with_recurrences,
        } => commands::read::batch(&ctx, &ids, with_recurrences).await,
        Commands::Create {
            title,
            start,
            end,
            all_day,
            description,
            location,
            rrule,
            until,
            time_zone,
        } => {
            commands::write::create(
                &ctx,
                commands::write::CreateArgs {
                    title,
                    start,
                    end,
                    all_day,
                    description,
                    location,
                    rrule,
                    until,
                    time_zone,
                },
            )
            .await
        }
        Commands::Update {
            id,
            title,
            description,
            location,
            start,
            end,
            all_day,
            rrule,
        } => {
            commands::write::update(
                &ctx,
                &id,
                commands::write::UpdateArgs {
                    title,
                    description,
                    location,
                    start,
                    end,
                    all_day,
                    rrule,
                },
            )
            .await
        }
        Commands::Delete { id } => commands::write::delete(&ctx, &id).await,
        Commands::Rfc3339 {
            input,
            all_day,
            end,
        } => commands::dates::rfc3339(&ctx, &input, all_day, end),
        Commands::Rfc2445 { input } => commands::dates::rfc2445(&input),
        Commands::InitConfig => commands::init_config(&ctx),
    }
}
