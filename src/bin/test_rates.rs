// src/bin/test_rates.rs
use log::{info, error};
use env_logger;

use mortgage_calc::config::Config;
use mortgage_calc::services::amortization::compute_cost_breakdown;
use mortgage_calc::services::display::format_currency;
use mortgage_calc::services::rates::RatesClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::from_env()?;
    let client = RatesClient::new(config.rates_api_url, config.rates_api_key);

    info!("Testing live mortgage rate fetching...");

    match client.fetch_upstream().await {
        Ok(Some(quote)) => info!("SUCCESS: upstream rates {:?}", quote),
        Ok(None) => error!("Upstream returned no records"),
        Err(e) => error!("ERROR: Failed to fetch rates: {}", e),
    }

    let quote = client.fetch_current_rates().await;
    println!("30y fixed: {:?}", quote.frm_30);
    println!("15y fixed: {:?}", quote.frm_15);

    if let Some(rate) = quote.frm_30.as_deref().and_then(|r| r.parse::<f64>().ok()) {
        if let Some(b) = compute_cost_breakdown(350_000.0, rate, 30.0) {
            println!("350,000 over 30y at {}%:", rate);
            println!("  monthly:  {}", format_currency(b.monthly_payment));
            println!("  interest: {}", format_currency(b.total_interest));
            println!("  total:    {}", format_currency(b.total_cost));
        }
    }

    Ok(())
}
