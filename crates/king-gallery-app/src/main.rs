#![warn(missing_docs)]
//! # king-gallery binary
//!
//! Command-line front end for the countdown and gallery.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use king_gallery_app::{
    AppConfig, AppError, ENV_SESSION_FILE, GalleryController, app_version, build_controller,
};
use king_gallery_core::UploadFile;
use king_gallery_countdown::Countdown;
use king_gallery_ui::{GalleryBody, UploadAffordance};
use time::OffsetDateTime;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "king-gallery", version = king_gallery_app::APP_VERSION, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List gallery images.
    List,
    /// Upload image files.
    Upload {
        /// Files to upload; non-image files are skipped.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Unlock upload access first if this session is still locked.
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete one image by id and store key.
    Delete {
        /// Record id.
        id: String,
        /// Store key.
        name: String,
        /// Skip the confirmation question.
        #[arg(long)]
        yes: bool,
    },
    /// Unlock upload access for this session.
    Unlock {
        /// Upload password.
        password: String,
    },
    /// Show time left until the big day.
    Countdown {
        /// Keep printing once per second until the countdown ends.
        #[arg(long)]
        watch: bool,
    },
    /// Print the version.
    Version,
}

/// CLI entry point.
fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args.command) {
        Ok(code) => code,
        Err(error) => {
            error!(stage = "cli", action = "run", %error, "command failed");
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode, AppError> {
    match command {
        Command::Version => {
            println!("king-gallery {}", app_version());
            Ok(ExitCode::SUCCESS)
        }
        Command::Countdown { watch } => run_countdown(watch),
        Command::List => {
            let mut controller = build_controller(&AppConfig::from_env());
            let refreshed = controller.refresh();
            print_gallery(&controller);
            Ok(exit_for(refreshed.is_ok()))
        }
        Command::Unlock { password } => {
            let config = AppConfig::from_env();
            let mut controller = build_controller(&config);
            controller.submit_password(&password)?;
            if config.session_file.is_some() {
                println!("Upload access granted for this session.");
            } else {
                println!(
                    "Password accepted. Set {ENV_SESSION_FILE} to keep upload access across commands."
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Upload { files, password } => {
            let mut controller = build_controller(&AppConfig::from_env());
            if !controller.request_upload_access() {
                match password {
                    Some(password) => controller.submit_password(&password)?,
                    None => {
                        let affordance = UploadAffordance::project(controller.state(), false);
                        eprintln!("{}: {}", affordance.label, affordance.hint);
                        return Ok(ExitCode::from(2));
                    }
                }
            }
            run_upload(&mut controller, &files)
        }
        Command::Delete { id, name, yes } => {
            let mut controller = build_controller(&AppConfig::from_env());
            controller.request_delete(id, name.clone());
            if !yes && !confirm(&name)? {
                controller.cancel_delete();
                println!("Delete cancelled.");
                return Ok(ExitCode::SUCCESS);
            }
            controller.confirm_delete()?;
            println!("Deleted {name}.");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_upload(controller: &mut GalleryController, paths: &[PathBuf]) -> Result<ExitCode, AppError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = std::fs::read(path)
            .map_err(|error| AppError::Io(format!("{}: {error}", path.display())))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(UploadFile::with_guessed_type(name, bytes)?);
    }

    let report = controller.upload(&files);
    for record in &report.uploaded {
        println!("uploaded {}\t{}", record.name, record.url);
    }
    if report.skipped_non_image > 0 {
        println!("skipped {} non-image file(s)", report.skipped_non_image);
    }
    if report.failed > 0 {
        println!("{} file(s) failed to upload", report.failed);
    }
    if let Some(reason) = &report.aborted {
        eprintln!("{reason}");
    }

    Ok(exit_for(report.aborted.is_none() && report.failed == 0))
}

fn run_countdown(watch: bool) -> Result<ExitCode, AppError> {
    let now = local_now();
    let countdown = Countdown::starting_at(now)?;
    println!("Countdown until you get your new best friend");

    loop {
        let now = local_now();
        println!("{}", countdown.remaining(now));
        if !watch || countdown.is_finished(now) {
            return Ok(ExitCode::SUCCESS);
        }
        thread::sleep(Duration::from_secs(1));
    }
}

fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn print_gallery(controller: &GalleryController) {
    let state = controller.state();
    match state.body() {
        GalleryBody::Loading => println!("Loading..."),
        GalleryBody::Empty => println!("No photos of King yet!"),
        GalleryBody::Error(message) => eprintln!("Connection Issue: {message}"),
        GalleryBody::Grid(count) => {
            for record in state.images() {
                println!("{}\t{}\t{}", record.id, record.name, record.url);
            }
            println!("{count} photo(s)");
        }
    }
}

fn confirm(name: &str) -> Result<bool, AppError> {
    print!("Delete {name}? This action cannot be undone [y/N] ");
    std::io::stdout()
        .flush()
        .map_err(|error| AppError::Io(error.to_string()))?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|error| AppError::Io(error.to_string()))?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn exit_for(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
