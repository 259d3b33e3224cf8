// License Keeper
// Command-line front end: manage license records and fire expiry reminders

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use license_keeper::models::record::{Record, RecordId};
use license_keeper::models::settings::Settings;
use license_keeper::models::status::StatusSummary;
use license_keeper::services::database::Database;
use license_keeper::services::notification::NotificationService;
use license_keeper::services::record::RecordService;
use license_keeper::services::reminder::{
    ReminderDispatcher, ReminderPlanner, ReminderStore, SqliteReminderStore,
};
use license_keeper::services::settings::{default_config_path, SettingsService};
use license_keeper::services::tracker::{LicenseTracker, RecordView};
use license_keeper::utils::date::{Clock, SystemClock};

#[derive(Debug, Parser)]
#[command(name = "license-keeper", version)]
#[command(about = "Track license expiry dates and get reminded before they lapse")]
struct Cli {
    /// SQLite database file (overrides the config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a license and schedule its reminders
    Add(AddArgs),
    /// Change fields of an existing license
    Edit(EditArgs),
    /// Delete a license and its pending reminders
    Remove { id: i64 },
    /// Show one license with its status
    Show {
        id: i64,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List licenses, optionally filtered by name or type
    List(ListArgs),
    /// Count licenses per status
    Stats {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Re-plan reminders for every license
    Reschedule,
    /// Show reminders waiting to fire
    Pending {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Fire every reminder that is due now, once
    Dispatch,
    /// Keep firing reminders as they come due, until interrupted (Ctrl-C).
    ///
    /// Every license is rescheduled on start-up so a changed `reminder_time`
    /// takes effect; restart the watcher after editing the config.
    Watch,
    /// Print the effective config, or write it to the config file
    Config {
        /// Save the effective settings to the config file
        #[arg(long, default_value_t = false)]
        write: bool,
    },
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long = "type")]
    license_type: String,
    /// Expiry date as YYYY-MM-DD
    #[arg(long)]
    expiry: String,
    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Debug, Args)]
struct EditArgs {
    id: i64,
    #[arg(long)]
    name: Option<String>,
    #[arg(long = "type")]
    license_type: Option<String>,
    #[arg(long)]
    expiry: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Case-insensitive match on name or type
    #[arg(long, default_value = "")]
    query: String,
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let settings_service = SettingsService::new(&config_path);
    let settings = settings_service.load()?;

    if let Command::Config { write } = cli.command {
        return config(&settings_service, &settings, write);
    }

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| SettingsService::database_path(&settings));

    let db = open_database(&db_path)?;
    let clock = SystemClock;

    match cli.command {
        Command::Add(args) => add(&db, &settings, &clock, args),
        Command::Edit(args) => edit(&db, &settings, &clock, args),
        Command::Remove { id } => {
            tracker(&db, &settings, &clock)?.delete(RecordId(id))?;
            println!("Removed license {}", RecordId(id));
            Ok(())
        }
        Command::Show { id, json } => {
            let view = tracker(&db, &settings, &clock)?.view(RecordId(id))?;
            if json {
                print_json(&view)
            } else {
                print_views(std::slice::from_ref(&view));
                if !view.record.description.is_empty() {
                    println!("\n{}", view.record.description);
                }
                Ok(())
            }
        }
        Command::List(args) => {
            let dashboard = tracker(&db, &settings, &clock)?.dashboard(&args.query)?;
            if args.json {
                print_json(&dashboard)
            } else {
                print_views(&dashboard.records);
                Ok(())
            }
        }
        Command::Stats { json } => {
            let summary = tracker(&db, &settings, &clock)?.summary()?;
            if json {
                print_json(&summary)
            } else {
                print_summary(&summary);
                Ok(())
            }
        }
        Command::Reschedule => {
            let report = tracker(&db, &settings, &clock)?.reschedule_all()?;
            println!(
                "Scheduled {} reminder(s) for {} license(s)",
                report.reminders_scheduled, report.records
            );
            if report.skipped_invalid > 0 {
                println!(
                    "{} license(s) skipped because of an invalid expiry date",
                    report.skipped_invalid
                );
            }
            Ok(())
        }
        Command::Pending { json } => {
            let pending = SqliteReminderStore::new(db.connection()).pending()?;
            if json {
                return print_json(&pending);
            }
            if pending.is_empty() {
                println!("No reminders pending");
            }
            for reminder in &pending {
                println!(
                    "{}  {:<6} {}",
                    reminder.fire_at.format("%Y-%m-%d %H:%M"),
                    reminder.key.record_id,
                    reminder.payload.message()
                );
            }
            Ok(())
        }
        Command::Dispatch => {
            let dispatcher = ReminderDispatcher::new(notifier(&settings));
            let mut store = SqliteReminderStore::new(db.connection());
            let fired = dispatcher.tick(&mut store, clock.now())?;
            println!("Fired {} reminder(s)", fired.len());
            Ok(())
        }
        Command::Watch => {
            let mut tracker = tracker(&db, &settings, &clock)?;
            let report = tracker.reschedule_all()?;
            log::info!(
                "Watching {} license(s); reminders fire at {}",
                report.records,
                tracker.planner().reminder_time().format("%H:%M")
            );

            let dispatcher = ReminderDispatcher::new(notifier(&settings));
            let interval = Duration::from_secs(settings.poll_interval_seconds);
            dispatcher.run(tracker.store_mut(), &clock, interval, || true);
            Ok(())
        }
        Command::Config { write } => config(&settings_service, &settings, write),
    }
}

fn config(service: &SettingsService, settings: &Settings, write: bool) -> Result<()> {
    if write {
        service.save(settings)?;
        println!("Wrote config to {}", service.path().display());
    } else {
        println!("# {}", service.path().display());
        print!("{}", toml::to_string_pretty(settings)?);
    }
    Ok(())
}

type CliTracker<'a> =
    LicenseTracker<'a, RecordService<'a>, SqliteReminderStore<'a>, SystemClock>;

fn tracker<'a>(
    db: &'a Database,
    settings: &Settings,
    clock: &'a SystemClock,
) -> Result<CliTracker<'a>> {
    let reminder_time = settings.reminder_time().map_err(|e| anyhow!(e))?;
    Ok(LicenseTracker::new(
        RecordService::new(db.connection()),
        SqliteReminderStore::new(db.connection()),
        ReminderPlanner::new(reminder_time),
        clock,
    ))
}

fn notifier(settings: &Settings) -> NotificationService {
    let mut service = NotificationService::new();
    service.set_enabled(settings.notifications_enabled);
    service
}

fn open_database(path: &Path) -> Result<Database> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {}", parent.display()))?;
        }
    }

    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow!("Database path is not valid UTF-8: {}", path.display()))?;
    let db = Database::new(path_str)?;
    db.initialize_schema()?;

    log::info!("Using database at {}", path.display());
    Ok(db)
}

fn add(db: &Database, settings: &Settings, clock: &SystemClock, args: AddArgs) -> Result<()> {
    let record =
        Record::new(args.name, args.license_type, args.expiry)?.with_description(args.description);
    let (stored, plan) = tracker(db, settings, clock)?.create(record)?;

    let id = stored.require_id()?;
    println!("Added license {} ({})", id, stored.name);
    println!("{} reminder(s) scheduled", plan.len());
    Ok(())
}

fn edit(db: &Database, settings: &Settings, clock: &SystemClock, args: EditArgs) -> Result<()> {
    let mut tracker = tracker(db, settings, clock)?;
    let mut record = tracker.get(RecordId(args.id))?;

    if let Some(name) = args.name {
        record.name = name;
    }
    if let Some(license_type) = args.license_type {
        record.license_type = license_type;
    }
    if let Some(expiry) = args.expiry {
        record.expiry_date = expiry;
    }
    if let Some(description) = args.description {
        record.description = description;
    }

    let plan = tracker.update(&record)?;
    println!("Updated license {}", RecordId(args.id));
    println!("{} reminder(s) scheduled", plan.len());
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_views(views: &[RecordView]) {
    if views.is_empty() {
        println!("No licenses found");
        return;
    }

    println!(
        "{:<6} {:<24} {:<16} {:<12} {:<14} {}",
        "ID", "NAME", "TYPE", "EXPIRES", "STATUS", "LEFT"
    );
    for view in views {
        let status = match view.status.report() {
            Some(report) => report.tier().label(),
            None => "Invalid date",
        };
        let id = view
            .record
            .id
            .map(|id| id.to_string())
            .unwrap_or_default();
        println!(
            "{:<6} {:<24} {:<16} {:<12} {:<14} {}",
            id,
            view.record.name,
            view.record.license_type,
            view.record.expiry_date,
            status,
            view.status.countdown_label()
        );
    }
}

fn print_summary(summary: &StatusSummary) {
    println!("Total:          {}", summary.total);
    println!("Active:         {}", summary.active);
    println!("Expiring soon:  {}", summary.expiring_soon);
    println!("Expired:        {}", summary.expired);
    if summary.invalid > 0 {
        println!("Invalid date:   {}", summary.invalid);
    }
}
