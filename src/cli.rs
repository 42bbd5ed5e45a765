use clap::{Parser, Subcommand};
use serde_json::Value;
use yaya_dashboard::config::ConfigInfo;
use yaya_dashboard::yaya::{YayaClient, YayaError};

#[derive(Parser)]
#[command(name = "yaya-dashboard")]
#[command(about = "YaYa Wallet Transaction Dashboard - signed proxy and transaction table", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Validate configuration and print it with credentials redacted
    Config,

    /// Issue one signed listing call and one search call against the wallet API
    Check {
        /// Search text used for the search call
        #[arg(long, default_value = "test")]
        query: String,
    },
}

pub fn handle_config_validate(info: &ConfigInfo) -> anyhow::Result<()> {
    println!("Configuration (profile: {}):", info.profile.as_str());
    for (key, value) in info.config.summary() {
        println!("  {}: {}", key, value);
    }
    if !info.overrides.is_empty() {
        println!("  overridden: {}", info.overrides.join(", "));
    }

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");
    Ok(())
}

/// Returns an error when either call fails so the exit status reflects it.
pub async fn handle_check(info: &ConfigInfo, query: &str) -> anyhow::Result<()> {
    let client = YayaClient::new(&info.config.upstream);
    println!("Base URL: {}", client.base_url());

    println!("\n[1/2] Fetching transactions (page 1)...");
    let listing = client.find_by_user(1).await;
    match &listing {
        Ok(page) => {
            println!("✓ Transactions fetched");
            println!("  items on page: {}", page.data.len());
            println!("  total: {}", page.total);
            println!("  last page: {}", page.last_page.unwrap_or(1));
            print_sample_fields(&page.data);
        }
        Err(e) => print_failure("Failed to fetch transactions", e),
    }

    println!("\n[2/2] Searching transactions for {:?}...", query);
    let search = client.search(query).await;
    match &search {
        Ok(results) => {
            println!("✓ Search completed");
            println!("  results: {}", results.data.len());
            print_sample_fields(&results.data);
        }
        Err(e) => print_failure("Failed to search transactions", e),
    }

    match (listing, search) {
        (Ok(_), Ok(_)) => {
            println!("\n✓ Upstream API reachable and accepting signed requests");
            Ok(())
        }
        _ => anyhow::bail!("upstream check failed"),
    }
}

fn print_sample_fields(items: &[Value]) {
    if let Some(Value::Object(first)) = items.first() {
        let keys: Vec<&str> = first.keys().map(String::as_str).collect();
        println!("  sample fields: {}", keys.join(", "));
    }
}

fn print_failure(context: &str, error: &YayaError) {
    tracing::error!(error = %error, "{}", context);
    println!("✗ {}", context);
    println!("  error: {}", error);
    println!("  details: {}", error.details());
}
