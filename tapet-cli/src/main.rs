use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use tapet_core::backend::monitor;
use tapet_core::config::Config;
use tapet_core::http::ReqwestClient;
use tapet_core::interval::{format_interval, parse_interval, INTERVAL_PRESETS};
use tapet_core::ipc::{self, IpcRequest, IpcResponse};
use tapet_core::models::{SourceConfig, SourceKind};
use tapet_core::paths::TapetPaths;
use tapet_core::sources;

#[derive(Parser)]
#[command(name = "tapet", about = "Periodically refresh the desktop wallpaper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show daemon status
    Status,
    /// Refresh the wallpaper now
    Refresh,
    /// Set the refresh interval, or list presets when omitted
    Interval {
        /// Duration such as 30s, 15m, 1h or plain seconds
        duration: Option<String>,
    },
    /// Choose where images come from
    Source {
        #[command(subcommand)]
        source: SourceCommand,
    },
    /// Start the daemon at login
    Login { state: Toggle },
    /// Notify when the wallpaper changes
    Notify { state: Toggle },
    /// Resolve the configured source and print the image URL without applying it
    Resolve,
    /// Reload config
    Reload,
    /// Stop the daemon
    Quit,
}

#[derive(Subcommand)]
enum SourceCommand {
    /// Random image from picsum.photos
    Picsum,
    /// A fixed image URL
    Static { url: String },
    /// A JSON API and the dot-separated path to the image URL (e.g. data.url)
    Json { url: String, path: String },
    /// Switch back to previously saved settings: static_url or json_api
    Saved { kind: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => {
            let resp = send(IpcRequest::Status).await?;
            print_response(resp);
        }
        Commands::Refresh => {
            let resp = send(IpcRequest::Refresh).await?;
            print_response(resp);
        }
        Commands::Interval { duration: None } => {
            for (label, seconds) in INTERVAL_PRESETS {
                println!("{label:<12} {seconds}s");
            }
        }
        Commands::Interval {
            duration: Some(duration),
        } => {
            let seconds = parse_interval(&duration)
                .ok_or_else(|| anyhow::anyhow!("invalid interval: {duration}"))?;
            let resp = send(IpcRequest::SetInterval { seconds }).await?;
            print_response(resp);
            println!("interval: {}", format_interval(seconds));
        }
        Commands::Source { source } => {
            let request = match source {
                SourceCommand::Picsum => IpcRequest::SetSource {
                    source: SourceConfig::Picsum,
                },
                SourceCommand::Static { url } => IpcRequest::SetSource {
                    source: SourceConfig::StaticUrl { url },
                },
                SourceCommand::Json { url, path } => IpcRequest::SetSource {
                    source: SourceConfig::JsonApi { url, path },
                },
                SourceCommand::Saved { kind } => {
                    let kind: SourceKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
                    IpcRequest::UseSavedSource { kind }
                }
            };
            let resp = send(request).await?;
            print_response(resp);
        }
        Commands::Login { state } => {
            let resp = send(IpcRequest::SetRunAtLogin {
                enabled: state.enabled(),
            })
            .await?;
            print_response(resp);
        }
        Commands::Notify { state } => {
            let resp = send(IpcRequest::SetNotifyOnChange {
                enabled: state.enabled(),
            })
            .await?;
            print_response(resp);
        }
        Commands::Resolve => {
            let paths = TapetPaths::new()?;
            let config = Config::load_or_default(&paths);
            let screen = monitor::screen_size(&config.general.resolution).await;
            let url = sources::resolve(&config.source.active(), screen, &ReqwestClient::new()).await?;
            println!("{url}");
        }
        Commands::Reload => {
            let resp = send(IpcRequest::Reload).await?;
            print_response(resp);
        }
        Commands::Quit => {
            let resp = send(IpcRequest::Quit).await?;
            print_response(resp);
        }
    }

    Ok(())
}

async fn send(request: IpcRequest) -> Result<IpcResponse> {
    ipc::send_request(&request)
        .await
        .map_err(|e| anyhow::anyhow!("daemon not running. start with: tapet-daemon\n  ({e})"))
}

fn print_response(resp: IpcResponse) {
    match resp {
        IpcResponse::Ok { data: Some(data) } => {
            println!(
                "{}",
                serde_json::to_string_pretty(&data).unwrap_or_default()
            );
        }
        IpcResponse::Ok { data: None } => {
            println!("ok");
        }
        IpcResponse::Error { message } => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    }
}
