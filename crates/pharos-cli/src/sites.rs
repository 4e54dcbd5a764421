//! Site-listing command handler.

use pharos_core::AppConfig;
use pharos_stats::StatsClient;

/// Print the sites the configured token can see, one per line.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the query API call
/// fails.
pub(crate) async fn run_sites(config: &AppConfig) -> anyhow::Result<()> {
    let client = StatsClient::new(
        &config.api_url,
        config.auth_token.clone(),
        config.request_timeout_secs,
        &config.user_agent,
    )?;

    let sites = client.list_sites().await?;
    if sites.is_empty() {
        println!("no sites registered; add one in the dashboard first");
        return Ok(());
    }

    println!("{:<26}DOMAIN", "ID");
    for site in &sites {
        println!("{:<26}{}", site.id, site.domain);
    }

    Ok(())
}
