use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use soma_core::config::{routine_log_path, state_path};
use soma_core::export::export_routines_csv;
use soma_core::routine_log::read_routines;
use soma_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "soma")]
#[command(about = "Pain-aware workout routine generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override user ID
    #[arg(long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report or inspect your physical state
    State {
        #[command(subcommand)]
        command: StateCommands,
    },

    /// Generate a routine
    Generate {
        /// Routine length in minutes (5-120)
        #[arg(long)]
        duration: Option<u32>,

        /// Goal (strength, mobility, cardio, flexibility, balance, endurance); repeatable
        #[arg(long = "goal")]
        goals: Vec<String>,

        /// Ignore the stored physical state
        #[arg(long)]
        no_state: bool,

        /// Dry run - show the routine without logging it
        #[arg(long)]
        dry_run: bool,

        /// Print the routine as JSON
        #[arg(long)]
        json: bool,
    },

    /// List previously generated routines
    History {
        /// Number of most recent routines to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Export the routine log to CSV
    Export {
        /// Output path (defaults to <data-dir>/routines.csv)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the exercise catalog
    Catalog {
        /// Only validate the catalog
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Subcommand)]
enum StateCommands {
    /// Record a new physical state snapshot
    Set {
        /// Body part in pain; repeatable
        #[arg(long = "pain")]
        pain_points: Vec<String>,

        /// Energy level 1-5
        #[arg(long)]
        energy: u8,

        /// Available equipment; repeatable
        #[arg(long = "equipment")]
        equipment: Vec<String>,

        #[arg(long, default_value = "home")]
        location: String,

        #[arg(long, default_value = "active")]
        mode: String,

        #[arg(long, default_value = "manual")]
        source: String,

        /// Confidence 0.0-1.0 for inferred reports
        #[arg(long)]
        confidence: Option<f32>,
    },

    /// Show the most recent snapshot
    Show,

    /// Show past snapshots, newest first
    History {
        #[arg(long)]
        limit: Option<usize>,

        /// RFC 3339 lower bound
        #[arg(long)]
        from: Option<String>,

        /// RFC 3339 upper bound
        #[arg(long)]
        to: Option<String>,
    },
}

fn main() -> Result<()> {
    soma_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let user_id = cli.user.unwrap_or_else(|| config.user.id.clone());

    match cli.command {
        Commands::State { command } => cmd_state(&data_dir, &user_id, command),
        Commands::Generate {
            duration,
            goals,
            no_state,
            dry_run,
            json,
        } => cmd_generate(
            &data_dir,
            &user_id,
            &config,
            duration,
            goals,
            !no_state,
            dry_run,
            json,
        ),
        Commands::History { limit } => cmd_history(&data_dir, limit),
        Commands::Export { output } => cmd_export(&data_dir, output),
        Commands::Catalog { validate } => cmd_catalog(&config, validate),
    }
}

fn parse_all<T: std::str::FromStr<Err = Error>>(tokens: &[String]) -> Result<Vec<T>> {
    tokens.iter().map(|t| t.parse()).collect()
}

fn parse_time(value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|v| {
            DateTime::parse_from_rfc3339(&v)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| Error::Validation(format!("Invalid timestamp '{}': {}", v, e)))
        })
        .transpose()
}

fn cmd_state(data_dir: &std::path::Path, user_id: &str, command: StateCommands) -> Result<()> {
    let mut store = JsonlStateStore::new(state_path(data_dir));

    match command {
        StateCommands::Set {
            pain_points,
            energy,
            equipment,
            location,
            mode,
            source,
            confidence,
        } => {
            let update = StateUpdate {
                pain_points: parse_all(&pain_points)?,
                energy_level: energy,
                equipment: parse_all(&equipment)?,
                location: location.parse()?,
                activity_mode: mode.parse()?,
                source_event: source.parse()?,
                confidence,
            };
            let state = update.into_state(user_id, Utc::now())?;
            store.save(&state)?;

            println!("✓ State recorded for {}", user_id);
            display_state(&state);
        }

        StateCommands::Show => match store.latest(user_id)? {
            Some(state) => display_state(&state),
            None => println!("No physical state recorded for {}.", user_id),
        },

        StateCommands::History { limit, from, to } => {
            let query = HistoryQuery {
                user_id: user_id.to_string(),
                from: parse_time(from)?,
                to: parse_time(to)?,
                limit,
            };
            let states = store.history(&query)?;
            if states.is_empty() {
                println!("No physical state recorded for {}.", user_id);
            }
            for state in &states {
                display_state(state);
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_generate(
    data_dir: &std::path::Path,
    user_id: &str,
    config: &Config,
    duration: Option<u32>,
    goals: Vec<String>,
    use_current_state: bool,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let duration = duration.unwrap_or(config.routine.default_duration);
    let request = if goals.is_empty() {
        let request = RoutineRequest {
            user_id: user_id.to_string(),
            duration,
            goals: config.routine.default_goals.clone(),
            use_current_state,
        };
        request.validate()?;
        request
    } else {
        RoutineRequest::parse(user_id, duration, &goals, use_current_state)?
    };

    let states = JsonlStateStore::new(state_path(data_dir));
    let catalog = config.catalog.source();

    let routine = generate_for_request(&request, &states, &catalog)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&routine)?);
    } else {
        display_routine(&routine);
    }

    if dry_run {
        if !json {
            println!("\n[Dry run - not logging routine]");
        }
        return Ok(());
    }

    let mut sink = JsonlRoutineSink::new(routine_log_path(data_dir));
    sink.append(&routine)?;
    tracing::info!("Logged routine {}", routine.routine_id);

    Ok(())
}

fn cmd_history(data_dir: &std::path::Path, limit: usize) -> Result<()> {
    let routines = read_routines(&routine_log_path(data_dir))?;

    if routines.is_empty() {
        println!("No routines generated yet.");
        return Ok(());
    }

    for routine in routines.iter().rev().take(limit) {
        println!(
            "{}  {}  {} exercises  ~{} min",
            routine.generated_at.format("%Y-%m-%d %H:%M"),
            routine.routine_id,
            routine.exercises.len(),
            routine.estimated_duration
        );
    }

    Ok(())
}

fn cmd_export(data_dir: &std::path::Path, output: Option<PathBuf>) -> Result<()> {
    let csv_path = output.unwrap_or_else(|| data_dir.join("routines.csv"));
    let count = export_routines_csv(&routine_log_path(data_dir), &csv_path)?;

    println!("✓ Exported {} routines", count);
    println!("  CSV: {}", csv_path.display());
    Ok(())
}

fn cmd_catalog(config: &Config, validate_only: bool) -> Result<()> {
    let catalog = Catalog {
        exercises: config.catalog.source().exercises()?,
    };

    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    if validate_only {
        println!("✓ Catalog valid ({} exercises)", catalog.exercises.len());
        return Ok(());
    }

    for exercise in &catalog.exercises {
        let equipment = if exercise.equipment_required.is_empty() {
            "bodyweight".to_string()
        } else {
            exercise.equipment_required.join(", ")
        };
        println!(
            "{}  {:<26} {:<12} {:<13} {}",
            exercise.exercise_id, exercise.name, exercise.category, exercise.difficulty, equipment
        );
    }

    Ok(())
}

fn display_state(state: &PhysicalState) {
    let pain = if state.pain_points.is_empty() {
        "none".to_string()
    } else {
        join(&state.pain_points)
    };
    let equipment = if state.equipment.is_empty() {
        "none".to_string()
    } else {
        join(&state.equipment)
    };

    println!();
    println!("  {}", state.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Pain:      {}", pain);
    println!("  Energy:    {}/5", state.energy_level);
    println!("  Equipment: {}", equipment);
    println!("  Location:  {} ({})", state.location, state.activity_mode);
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_routine(routine: &GeneratedRoutine) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  ROUTINE {}", routine.routine_id);
    println!("╰─────────────────────────────────────────╯");
    println!();

    if routine.is_empty() {
        println!("  No exercises match your current constraints.");
    }

    for (i, exercise) in routine.exercises.iter().enumerate() {
        println!(
            "  {}. {}  {} x {}  (rest {}s)",
            i + 1,
            exercise.name,
            exercise.sets,
            exercise.reps,
            exercise.rest_seconds
        );
        for modification in &exercise.modifications {
            println!("     → {}", modification);
        }
        for note in &exercise.safety_notes {
            println!("     ℹ {}", note);
        }
    }

    println!();
    println!("  Duration: ~{} min", routine.estimated_duration);
    if !routine.target_muscles.is_empty() {
        println!("  Targets:  {}", routine.target_muscles.join(", "));
    }
    if let Some(ref reason) = routine.avoided_reason {
        println!("  {}", reason);
        println!("  Avoiding: {}", routine.avoided_movements.join(", "));
    }
}
