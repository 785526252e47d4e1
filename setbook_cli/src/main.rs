use clap::{Parser, Subcommand};
use setbook_core::*;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "setbook")]
#[command(about = "Workout log: record sessions, sets and reps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Signed-in user id (overrides [user] default_id)
    #[arg(long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a workout document and append it to the store
    Log {
        /// JSON workout document (reads stdin when omitted or "-")
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Validate a workout document and print the explicit record
    Validate {
        /// JSON workout document (reads stdin when omitted or "-")
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// List the user's workouts, newest first
    History {
        /// Only show workouts from the last N days
        #[arg(long)]
        days: Option<i64>,
    },

    /// Show one workout with its exercises and sets
    Show {
        /// Workout id
        id: String,
    },

    /// List catalog exercises
    Exercises {
        /// Include inactive exercises
        #[arg(long)]
        all: bool,
    },

    /// Export workouts to CSV, one row per set
    Export {
        /// Output CSV path
        #[arg(long)]
        out: PathBuf,

        /// Export every user's workouts instead of only the current user's
        #[arg(long)]
        all_users: bool,
    },
}

fn main() -> ExitCode {
    setbook_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let store_path = Config::store_path(&data_dir);
    let user = cli.user.clone().or_else(|| config.user.default_id.clone());
    tracing::debug!("Using workout store {:?}", store_path);

    match cli.command {
        Commands::Log { file } => cmd_log(&store_path, file.as_deref(), user, &config),
        Commands::Validate { file } => cmd_validate(file.as_deref(), user),
        Commands::History { days } => {
            cmd_history(&store_path, &require_user(user)?, days, &config)
        }
        Commands::Show { id } => cmd_show(&store_path, &require_user(user)?, &id, &config),
        Commands::Exercises { all } => cmd_exercises(all, &config),
        Commands::Export { out, all_users } => {
            let user = if all_users { None } else { Some(require_user(user)?) };
            cmd_export(&store_path, user.as_deref(), &out)
        }
    }
}

fn require_user(user: Option<String>) -> Result<String> {
    user.ok_or_else(|| {
        Error::Config("no user id: pass --user or set [user] default_id in the config".into())
    })
}

/// Read a workout document, filling `userId` from the signed-in user when
/// the document carries none.
fn read_document(file: Option<&Path>, user: Option<String>) -> Result<WorkoutDocument> {
    let contents = match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut document: WorkoutDocument = serde_json::from_str(&contents)?;
    if document.user_id.is_none() {
        document.user_id = user;
    }
    Ok(document)
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    let catalog = match &config.data.catalog_path {
        Some(path) => Catalog::load_from(path)?,
        None => get_default_catalog().clone(),
    };

    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Catalog("Invalid catalog".into()));
    }
    Ok(catalog)
}

fn cmd_log(
    store_path: &Path,
    file: Option<&Path>,
    user: Option<String>,
    config: &Config,
) -> Result<()> {
    let document = read_document(file, user)?;
    let workout = validate_workout(&document)?;

    // Everything that can fail is resolved before the store is touched
    let style = config.date_style()?;
    let catalog = load_catalog(config)?;

    // Unknown references are stored as-is; only warn about them
    for reference in dangling_refs(&catalog, &workout) {
        eprintln!("warning: exercise '{}' is not in the catalog", reference);
    }

    let mut store = JsonlStore::new(store_path);
    let stored = store.append(workout)?;
    tracing::info!("Logged workout for user {}", stored.user_id());

    let summary = summarize(&stored, &style);
    println!("✓ Workout logged: {}", stored.id().unwrap_or_default());
    println!("  {}", summary.title);
    println!("  {}", summary.subtitle);
    Ok(())
}

fn cmd_validate(file: Option<&Path>, user: Option<String>) -> Result<()> {
    let document = read_document(file, user)?;
    let workout = validate_workout(&document)?;
    println!("{}", serde_json::to_string_pretty(&workout)?);
    Ok(())
}

fn cmd_history(store_path: &Path, user: &str, days: Option<i64>, config: &Config) -> Result<()> {
    let workouts = load_user_workouts(store_path, user, days)?;
    if workouts.is_empty() {
        println!("No workouts recorded.");
        return Ok(());
    }

    let style = config.date_style()?;
    for workout in &workouts {
        let summary = summarize(workout, &style);
        println!(
            "{}  {}  ({})",
            workout.id().unwrap_or("-"),
            summary.title,
            summary.subtitle
        );
    }
    Ok(())
}

fn cmd_show(store_path: &Path, user: &str, id: &str, config: &Config) -> Result<()> {
    let workouts = load_user_workouts(store_path, user, None)?;
    let workout = find_workout(&workouts, id)
        .ok_or_else(|| Error::Store(format!("workout '{}' not found", id)))?;

    let catalog = load_catalog(config)?;
    let summary = summarize(workout, &config.date_style()?);

    println!("{}", summary.title);
    println!("{}", summary.subtitle);

    for (i, entry) in workout.exercises().iter().enumerate() {
        let name = match resolve(&catalog, entry.exercise_ref()) {
            Resolution::Found(exercise) => exercise.name().to_string(),
            Resolution::Dangling(reference) => format!("Unknown exercise ({})", reference),
        };
        println!();
        println!("{}. {}", i + 1, name);
        if entry.sets().is_empty() {
            println!("   (no sets)");
        }
        for (j, set) in entry.sets().iter().enumerate() {
            println!("   Set {}: {}", j + 1, set.label());
        }
    }
    Ok(())
}

fn cmd_exercises(all: bool, config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    let exercises = if all { catalog.all() } else { catalog.active() };

    for exercise in exercises {
        let preview = preview_exercise(exercise);
        let mut line = format!("{:<20} {}", exercise.id().unwrap_or("-"), preview.title);
        if let Some(subtitle) = preview.subtitle {
            line.push_str(&format!(" [{}]", subtitle));
        }
        if !exercise.is_active() {
            line.push_str(" (inactive)");
        }
        println!("{}", line);
    }
    Ok(())
}

fn cmd_export(store_path: &Path, user: Option<&str>, out: &Path) -> Result<()> {
    let workouts = match user {
        Some(user) => load_user_workouts(store_path, user, None)?,
        None => read_workouts(store_path)?,
    };

    let count = export_csv(&workouts, out)?;
    println!("✓ Exported {} sets from {} workouts", count, workouts.len());
    println!("  CSV: {}", out.display());
    Ok(())
}
