//! `eamquery envelope` - print the SOAP request for a query.

use eamquery_core::{EnvelopeBuilder, GatewayConfig, QueryRequest};

pub fn run_envelope(
    config: &GatewayConfig,
    username: String,
    password: String,
    tenant: String,
    sample: bool,
    query: String,
) -> anyhow::Result<()> {
    let request = QueryRequest::new(username, password, tenant, sample, query)?;
    println!("{}", render(config, &request));
    Ok(())
}

fn render(config: &GatewayConfig, request: &QueryRequest) -> String {
    EnvelopeBuilder::new()
        .organization(config.upstream.organization.clone())
        .session_scenario(config.upstream.session_scenario.clone())
        .sample_rows(config.output.sample_rows)
        .build(request)
}
