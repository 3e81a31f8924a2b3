#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use docedit::app::config::{self, AppConfig, Backend};
use docedit::app::store::{DocumentStore, HttpDocumentStore, MemoryStore};
use tracing_subscriber::prelude::*;

fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let log_dir = config::log_dir().context("No data directory for log files")?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("docedit.log");

    let file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open {}", log_path.display()))?;
    restrict_permissions(&log_path, &file);

    // RUST_LOG wins over the configured filter
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => {
            tracing_subscriber::EnvFilter::builder().parse_lossy(directives)
        }
        _ => tracing_subscriber::EnvFilter::builder().parse_lossy(&config.log_filter),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false),
    );
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    // eframe and egui log through the `log` crate
    tracing_log::LogTracer::init().context("Failed to initialize log-to-tracing bridge")?;

    tracing::info!("Logging initialized to: {:?}", log_path);
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, file: &std::fs::File) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(metadata) = file.metadata() {
        let mut perms = metadata.permissions();
        perms.set_mode(0o600);
        if let Err(e) = std::fs::set_permissions(path, perms) {
            eprintln!("[SECURITY] Failed to set log file permissions: {}", e);
        }
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _file: &std::fs::File) {}

fn setup_panic_handler() {
    // Installed before logging so early crashes are recorded too
    std::panic::set_hook(Box::new(|panic_info| {
        let crash_msg = format!(
            "docedit crashed!\n\
             Panic occurred at: {}\n\
             Details: {}\n\
             Backtrace:\n{:?}\n",
            panic_info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_else(|| "unknown location".to_string()),
            panic_info
                .payload()
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| panic_info.payload().downcast_ref::<String>().map(|s| s.as_str()))
                .unwrap_or("unknown panic"),
            std::backtrace::Backtrace::force_capture()
        );

        tracing::error!("{}", crash_msg);
        eprintln!("\n{}", crash_msg);

        if let Some(log_dir) = config::log_dir() {
            let _ = std::fs::create_dir_all(&log_dir);
            let crash_log_path = log_dir.join("crash.log");
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .append(true)
                .create(true)
                .open(&crash_log_path)
            {
                use std::io::Write;
                let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                let _ = writeln!(file, "\n=== CRASH at {} ===\n{}", timestamp, crash_msg);
                eprintln!("Crash log written to: {:?}", crash_log_path);
            }
        }
    }));
}

fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.backend {
        Backend::Http => Arc::new(
            HttpDocumentStore::new(&config.store_url, config.request_timeout())
                .context("Failed to create the document store client")?,
        ),
        Backend::Memory => {
            tracing::warn!("Using the in-memory document store, nothing is kept after exit");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

fn main() -> anyhow::Result<()> {
    setup_panic_handler();

    let config = AppConfig::load();
    if let Err(e) = init_logging(&config) {
        eprintln!("File logging disabled: {:#}", e);
    }

    docedit::trace_info!(
        "docedit starting ({}@{}), backend {:?}, store {}",
        env!("GIT_BRANCH"),
        env!("GIT_COMMIT"),
        config.backend,
        config.store_url
    );

    let store = match build_store(&config) {
        Ok(store) => store,
        Err(e) => {
            docedit::trace_error!("{:#}", e);
            return Err(e);
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("docedit")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "docedit",
        native_options,
        Box::new(move |cc| Ok(Box::new(docedit::DocEditApp::new(cc, config, store)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {}", e))?;

    Ok(())
}
