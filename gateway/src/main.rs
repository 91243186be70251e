use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

use common_net::telemetry;
use gateway::{BoxError, GatewayConfig, GatewaySettings};

#[derive(Debug, Parser)]
#[command(author, version, about = "Proxy between booking clients and the external booking API")]
struct GatewayCli {
    /// JSON settings file; falls back to GATEWAY_CONFIG_PATH, then the environment.
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,

    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
}

impl GatewayCli {
    fn resolve_config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            return Some(path.clone());
        }
        std::env::var("GATEWAY_CONFIG_PATH").ok().map(PathBuf::from)
    }

    fn apply_overrides(&self, settings: &mut GatewaySettings) {
        if let Some(addr) = self.bind {
            settings.bind_addr = addr;
        }
        if let Some(url) = &self.base_url {
            settings.base_url = url.clone();
        }
    }
}

fn build_config(cli: &GatewayCli) -> Result<GatewayConfig, BoxError> {
    let mut settings = if let Some(path) = cli.resolve_config_path() {
        GatewaySettings::from_file(&path)?
    } else {
        GatewaySettings::from_env()?
    };

    cli.apply_overrides(&mut settings);

    Ok(settings.into_config())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("gateway");

    let cli = GatewayCli::parse();
    let config = build_config(&cli).map_err(|err| anyhow::anyhow!(err))?;

    gateway::run_with_ctrl_c(config)
        .await
        .map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}
