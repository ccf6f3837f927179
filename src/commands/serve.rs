use std::{error::Error, path::PathBuf, sync::Arc};
use clap::Args;
use stubserver::{
    config::{loader::{load_registry, path_from_cwd}, settings::Settings},
    http::server,
};
use tracing::{error, info, warn};

/// Serve the endpoints directory over HTTP.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Directory of endpoint JSON files [env: JSON_FOLDER_PATH]
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Port to listen on [env: PORT]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Interface to bind [env: HOST]
    #[arg(long)]
    pub host: Option<String>,

    /// Answer CORS preflights and add permissive CORS headers [env: STUB_CORS]
    #[arg(long)]
    pub cors: bool,
}

impl ServeArgs {
    fn apply(self, mut settings: Settings) -> Settings {
        if let Some(dir) = self.dir {
            settings.endpoints_dir = dir;
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(host) = self.host {
            settings.host = host;
        }
        settings.cors |= self.cors;
        settings
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

pub async fn run(args: ServeArgs) -> Result<(), Box<dyn Error>> {
    let settings = args.apply(Settings::from_env());
    let dir = path_from_cwd(&settings.endpoints_dir);
    info!(dir = %dir.display(), "loading endpoints");

    let registry = load_registry(&dir)?;
    info!("Loaded {} mock endpoints", registry.len());
    for (path, def) in registry.iter() {
        info!(
            endpoint = path,
            method = %def.method,
            status = ?def.responses.first().map(|r| r.status),
            responses = def.responses.len(),
            "registered endpoint"
        );
        if def.responses.is_empty() {
            warn!(endpoint = path, "endpoint has no responses and will answer 500");
        }
    }

    let addr = settings.address();
    info!(%addr, cors = settings.cors, "starting HTTP server");

    server::run(&addr, Arc::new(registry), settings.cors, shutdown_signal()).await?;

    Ok(())
}
