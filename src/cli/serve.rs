//! Serve command handler
//!
//! Starts the HTTP server in foreground mode. Stops on Ctrl-C.

use crate::config::Config;
use crate::error::Result;
use crate::server;
use clap::Args;
use tracing::info;

/// Serve command arguments
#[derive(Args, Default)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Nominatim base URL for text search
    #[arg(long)]
    pub nominatim_url: Option<String>,

    /// Overpass interpreter URL for nearby search
    #[arg(long)]
    pub overpass_url: Option<String>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded config
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = self.nominatim_url {
            config.search.nominatim_url = url;
        }
        if let Some(url) = self.overpass_url {
            config.search.overpass_url = url;
        }
    }
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = Config::load()?;
    args.apply(&mut config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.server_addr(),
        nominatim = %config.search.nominatim_url,
        overpass = %config.search.overpass_url,
        "starting place-picker server"
    );

    server::run(config).await
}
