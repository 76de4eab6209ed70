use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use syllabus::{db, grid, Schedule, Settings};

#[derive(Parser)]
#[command(name = "syllabus", about = "Rebuild course schedules from spreadsheet grid exports")]
struct Cli {
    /// Settings file (default: ./syllabus.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rebuilt schedule as JSON
    Build {
        input: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Sessions, topics and resources as a compact table
    Overview {
        input: PathBuf,
        /// Only this sheet
        #[arg(short, long)]
        sheet: Option<String>,
        /// Max sessions per course
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// List recovered anomalies
    Errors { input: PathBuf },
    /// Persist the schedule to SQLite
    Save {
        input: PathBuf,
        #[arg(long, default_value = db::DEFAULT_DB_PATH)]
        db: PathBuf,
    },
    /// Resource totals stored in the database
    Stats {
        #[arg(long, default_value = db::DEFAULT_DB_PATH)]
        db: PathBuf,
    },
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    tracing::debug!(?settings, "settings loaded");

    match cli.command {
        Commands::Build { input, pretty } => {
            let schedule = load_schedule(&input, &settings)?;
            let json = if pretty {
                serde_json::to_string_pretty(&schedule)?
            } else {
                serde_json::to_string(&schedule)?
            };
            println!("{}", json);
        }
        Commands::Overview {
            input,
            sheet,
            limit,
        } => {
            let schedule = load_schedule(&input, &settings)?;
            print_overview(&schedule, sheet.as_deref(), limit);
        }
        Commands::Errors { input } => {
            let schedule = load_schedule(&input, &settings)?;
            if schedule.errors.is_empty() {
                println!("No anomalies.");
            }
            for e in &schedule.errors {
                println!("{:<7} {}", e.severity.as_str(), e);
            }
        }
        Commands::Save { input, db: db_path } => {
            let schedule = load_schedule(&input, &settings)?;
            let conn = db::connect(&db_path)?;
            db::init_schema(&conn)?;
            let c = db::save_schedule(&conn, &schedule)?;
            println!(
                "Saved {} courses, {} sessions, {} topics, {} resources, {} errors to {}.",
                c.courses,
                c.sessions,
                c.topics,
                c.resources,
                c.errors,
                db_path.display()
            );
        }
        Commands::Stats { db: db_path } => {
            let conn = db::connect(&db_path)?;
            db::init_schema(&conn)?;
            for (kind, n) in db::resource_kind_counts(&conn)? {
                println!("{:<22} {}", kind, n);
            }
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn load_schedule(input: &Path, settings: &Settings) -> anyhow::Result<Schedule> {
    let workbook = grid::load_workbook(input)
        .with_context(|| format!("loading workbook {}", input.display()))?;
    Ok(syllabus::build_schedule_with(&workbook, settings))
}

fn print_overview(schedule: &Schedule, sheet: Option<&str>, limit: usize) {
    let courses = schedule
        .courses
        .iter()
        .filter(|c| sheet.map_or(true, |s| c.title == s));

    for course in courses {
        println!("\n== {} ({} sessions)", course.title, course.sessions.len());
        println!(
            "{:>6} | {:<12} | {:<3} | {:<48} | {}",
            "#", "Date", "Day", "Topic", "Resources"
        );
        println!("{}", "-".repeat(96));

        for s in course.sessions.iter().take(limit) {
            let day = s
                .parsed_date()
                .map(|d| d.format("%a").to_string())
                .unwrap_or_default();
            for (i, t) in s.topics.iter().enumerate() {
                let (index, date, day) = if i == 0 {
                    (s.index.as_str(), s.date.as_deref().unwrap_or("-"), day.as_str())
                } else {
                    ("", "", "")
                };
                let resources = t
                    .resources
                    .iter()
                    .map(|r| {
                        let mark = if r.url.is_some() { "" } else { "?" };
                        format!("{}{}", r.kind.as_str().to_lowercase(), mark)
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "{:>6} | {:<12} | {:<3} | {:<48} | {}",
                    truncate(index, 6),
                    date,
                    day,
                    truncate(&t.title, 48),
                    resources
                );
            }
        }
    }

    if !schedule.errors.is_empty() {
        println!(
            "\n{} anomalies recorded (see `syllabus errors`).",
            schedule.errors.len()
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
