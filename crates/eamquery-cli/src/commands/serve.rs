//! `eamquery serve` - start the HTTP gateway.

use eamquery_core::GatewayConfig;
use eamquery_gateway::GatewayServer;

pub async fn run_serve(
    mut config: GatewayConfig,
    host: Option<String>,
    port: Option<u16>,
    upstream_url: Option<String>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(url) = upstream_url {
        config.upstream.url = url;
        config.upstream.url_env = None;
    }
    config.validate()?;

    let server = GatewayServer::new(config);
    println!("EAM query gateway listening on http://{}", server.listen_address());
    server.run().await?;
    Ok(())
}
