//! Push CLI - send notifications through the configured providers.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr as _;
use push_core::{DeviceToken, Notification};
use push_service::{Dispatcher, PushSettings};

#[derive(Parser)]
#[command(name = "push")]
#[command(about = "Send push notifications through APNs and GCM", long_about = None)]
struct Cli {
    /// Provider settings file.
    #[arg(long, env = "PUSH_SETTINGS", default_value = "push.toml")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open every configured provider and report which platforms are ready
    Check,

    /// Send a notification
    Send {
        /// Platform name (apns, gcm, ios, android)
        #[arg(long)]
        platform: String,

        /// Device token; repeat for a batch
        #[arg(long = "token", required = true)]
        tokens: Vec<String>,

        /// JSON file with the notification
        #[arg(long, conflicts_with = "alert")]
        notification: Option<PathBuf>,

        /// Alert text, for a notification with nothing else in it
        #[arg(long)]
        alert: Option<String>,

        /// Give up waiting after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let settings = PushSettings::load(&cli.settings)
        .wrap_err_with(|| format!("failed to load {}", cli.settings.display()))?;
    let dispatcher =
        Dispatcher::from_settings(&settings).wrap_err("failed to set up push providers")?;

    match cli.command {
        Commands::Check => {
            for platform in dispatcher.platforms() {
                println!("{platform}: ready");
            }
        }
        Commands::Send {
            platform,
            tokens,
            notification,
            alert,
            timeout_secs,
        } => {
            let notification = match (notification, alert) {
                (Some(path), _) => read_notification(&path)?,
                (None, Some(alert)) => Notification::new().with_alert(alert),
                (None, None) => color_eyre::eyre::bail!("pass --notification or --alert"),
            };

            let push = dispatcher.push(&platform, &notification, DeviceToken::from(tokens));
            let result = match timeout_secs {
                Some(secs) => tokio::time::timeout(Duration::from_secs(secs), push)
                    .await
                    .wrap_err("push timed out")?,
                None => push.await,
            }
            .wrap_err("push failed")?;

            println!("{}", serde_json::to_string_pretty(&result)?);

            if !result.is_success() {
                tracing::warn!(failed = result.failed.len(), "some devices were not reached");
            }
        }
    }

    Ok(())
}

fn read_notification(path: &std::path::Path) -> color_eyre::eyre::Result<Notification> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;

    serde_json::from_str(&content).wrap_err("failed to parse notification JSON")
}
