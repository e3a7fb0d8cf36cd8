//! UWS CLI
//!
//! Command-line interface for IVOA Universal Worker Service job lists.

mod commands;
mod config;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uws_client::ServerConfig;

#[derive(Parser)]
#[command(name = "uws")]
#[command(about = "IVOA Universal Worker Service client", long_about = None)]
struct Cli {
    /// Job list URL
    #[arg(long, env = "UWS_URL")]
    url: String,

    /// Basic auth user
    #[arg(long, env = "UWS_USER")]
    user: Option<String>,

    /// Basic auth password
    #[arg(long, env = "UWS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "UWS_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Print JSON instead of formatted output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> Config {
        let mut server =
            ServerConfig::new(self.url.clone()).with_timeout(Duration::from_secs(self.timeout));
        server.user = self.user.clone();
        server.password = self.password.clone();

        Config {
            server,
            json: self.json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so that --json output can be piped
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uws=warn,uws_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options_build_config() {
        let cli = Cli::try_parse_from([
            "uws",
            "--url",
            "https://example.com/tap/async",
            "--user",
            "admin",
            "--password",
            "secret",
            "--timeout",
            "5",
            "list",
            "--json",
        ])
        .unwrap();

        let config = cli.config();
        assert!(config.json);
        assert_eq!(config.server.url, "https://example.com/tap/async");
        assert_eq!(config.server.credentials(), Some(("admin", "secret")));
        assert_eq!(config.server.timeout, Duration::from_secs(5));
    }
}
