use clap::{Parser, Subcommand};
use eamquery_core::GatewayConfig;
use eamquery_transcode::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "eamquery", version, about = "EAM query gateway")]
struct Cli {
    /// Path to the configuration file. Defaults to ./eamquery.yaml when present.
    #[arg(long, short, global = true, env = "EAMQUERY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP gateway.
    Serve {
        /// Override the configured listen host.
        #[arg(long)]
        host: Option<String>,

        /// Override the configured listen port.
        #[arg(long)]
        port: Option<u16>,

        /// Override the upstream endpoint URL.
        #[arg(long)]
        upstream_url: Option<String>,
    },

    /// Print the SOAP envelope that would be sent for a query.
    Envelope {
        #[arg(long)]
        username: String,

        #[arg(long, env = "EAMQUERY_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        tenant: String,

        /// Wrap the query in a sample row limit.
        #[arg(long, default_value_t = false)]
        sample: bool,

        /// SQL statement.
        query: String,
    },

    /// Transcode a saved upstream XML response to stdout.
    Transcode {
        /// XML file to read, or `-` for stdin.
        file: PathBuf,

        /// Output format: html, csv or xlsx.
        #[arg(long, short, default_value = "html")]
        format: OutputFormat,
    },

    /// Print the effective configuration as YAML.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;
    init_tracing(&config);

    match cli.cmd {
        Command::Serve {
            host,
            port,
            upstream_url,
        } => commands::serve::run_serve(config, host, port, upstream_url).await?,

        Command::Envelope {
            username,
            password,
            tenant,
            sample,
            query,
        } => commands::envelope::run_envelope(&config, username, password, tenant, sample, query)?,

        Command::Transcode { file, format } => {
            commands::transcode::run_transcode(&file, format).await?
        }

        Command::Config => print!("{}", config.to_yaml()?),
    }

    Ok(())
}

fn init_tracing(config: &GatewayConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
