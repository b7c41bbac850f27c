use clap::Parser;
mod commands;
mod notify;
use commands::cli;
use recharge_core::api::{load_default, AppConfig, CliError, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(()) => 0,
        Err(e) => {
            if !e.already_reported() {
                eprintln!("{e}");
            }
            e.exit_code()
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<(), CliError> {
    let args = cli::Args::parse();
    let cfg = load_config(args.config.as_deref())?;
    init_tracing(&cfg.logging).map_err(CliError::Command)?;
    tracing::debug!(
        target: "recharge.cli",
        document = %cfg.store.document,
        bucket = %cfg.storage.bucket,
        "configuration loaded"
    );

    dispatch(args.command, &cfg).await
}

fn load_config(path: Option<&str>) -> Result<AppConfig, CliError> {
    let loaded = match path {
        Some(p) => recharge_core::config::load_from_path(std::path::Path::new(p))
            .map_err(|e| anyhow::anyhow!("{p}: {e}")),
        None => load_default(),
    };
    loaded.map_err(|e| CliError::Config(e.to_string()))
}

async fn dispatch(cmd: cli::Commands, cfg: &AppConfig) -> Result<(), CliError> {
    match cmd {
        cli::Commands::List(a) => commands::recharge::handle_list(a, cfg).await,
        cli::Commands::Add(a) => commands::recharge::handle_add(a, cfg).await,
        cli::Commands::Update(a) => commands::recharge::handle_update(a, cfg).await,
        cli::Commands::Remove(a) => commands::recharge::handle_remove(a, cfg).await,
        cli::Commands::Upload(a) => commands::upload::handle_upload(a, cfg).await,
        cli::Commands::DeleteObject(a) => commands::upload::handle_delete_object(a, cfg).await,
        cli::Commands::FileInfo(a) => commands::upload::handle_file_info(a).await,
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("recharge-admin"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let appender = tracing_appender::rolling::daily(dir, "recharge-admin.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
