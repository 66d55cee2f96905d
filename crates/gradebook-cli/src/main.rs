//! gradebook CLI — record course scores and report GPAs.

use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::{FilterArgs, OutputFormat, StoreArgs};

#[derive(Parser)]
#[command(
    name = "gradebook",
    version,
    about = "Student course scores and GPA reports"
)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a course score for a student
    Add {
        /// Student name
        #[arg(long)]
        name: String,

        /// Course label (e.g. "MTH101")
        #[arg(long)]
        course: String,

        /// Score between 0 and 100
        #[arg(long, allow_negative_numbers = true)]
        score: i64,

        /// Academic level (e.g. "100")
        #[arg(long, default_value = "")]
        level: String,

        /// Semester ("1" or "2")
        #[arg(long, default_value = "")]
        semester: String,

        /// Session (e.g. "2024/2025")
        #[arg(long, default_value = "")]
        session: String,
    },

    /// List every stored record
    Records,

    /// Show a student's courses and scores
    Scores {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Compute a student's GPA
    Gpa {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Compute the GPA of every student
    AllGpas {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Semester 1, semester 2 and session GPA for a level and session
    Session {
        /// Student name
        #[arg(long)]
        name: String,

        /// Academic level (e.g. "100")
        #[arg(long)]
        level: String,

        /// Session (e.g. "2024/2025")
        #[arg(long)]
        session: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// GPA for one semester of a session
    Semester {
        /// Student name
        #[arg(long)]
        name: String,

        /// Academic level (e.g. "100")
        #[arg(long)]
        level: String,

        /// Session (e.g. "2024/2025")
        #[arg(long)]
        session: String,

        /// Semester ("1" or "2")
        #[arg(long)]
        semester: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Create a starter gradebook.toml
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradebook=info".parse().unwrap())
                .add_directive("gradebook_core=warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Add {
            name,
            course,
            score,
            level,
            semester,
            session,
        } => commands::add::execute(
            &cli.store, &name, &course, score, &level, &semester, &session,
        ),
        Commands::Records => commands::records::execute(&cli.store),
        Commands::Scores { filter, format } => {
            commands::scores::execute(&cli.store, filter, format)
        }
        Commands::Gpa { filter, format } => commands::gpa::execute(&cli.store, filter, format),
        Commands::AllGpas { format } => commands::all_gpas::execute(&cli.store, format),
        Commands::Session {
            name,
            level,
            session,
            format,
        } => commands::session::execute(&cli.store, &name, &level, &session, format),
        Commands::Semester {
            name,
            level,
            session,
            semester,
            format,
        } => commands::session::execute_semester(
            &cli.store, &name, &level, &session, &semester, format,
        ),
        Commands::Init => commands::init::execute(cli.store.data_file.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
