use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "forecast-cli")]
#[command(about = "Command-line client for the forecast API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List forecast zones
    Zones {
        /// Only show zones in this state (e.g. WA)
        #[arg(short, long)]
        state: Option<String>,
    },
    /// Show the forecast for one zone
    Forecast {
        /// Zone identifier, e.g. WAZ315
        zone_id: String,
    },
    /// Show request and cache counters
    Diagnostics,
    /// Check service readiness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Zones { state } => {
            let res = client.get(format!("{}/zones", base)).send().await?;
            let Some(mut json) = read_json(res).await? else {
                return Ok(());
            };
            if let (Some(state), Value::Array(zones)) = (state, &mut json) {
                zones.retain(|z| z["state"].as_str().is_some_and(|s| s.eq_ignore_ascii_case(&state)));
            }
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Commands::Forecast { zone_id } => {
            let res = client
                .get(format!("{}/forecast/{}", base, urlencoding::encode(&zone_id)))
                .send()
                .await?;
            if let Some(json) = read_json(res).await? {
                print_forecast(&json);
            }
        }
        Commands::Diagnostics => {
            let res = client.get(format!("{}/diagnostics", base)).send().await?;
            if let Some(json) = read_json(res).await? {
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            if let Some(json) = read_json(res).await? {
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }
    }

    Ok(())
}

async fn read_json(res: reqwest::Response) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: forecast API returned status {}", status);
        if let Ok(text) = res.text().await {
            if !text.is_empty() {
                eprintln!("Response: {}", text);
            }
        }
        return Ok(None);
    }
    Ok(Some(res.json().await?))
}

fn print_forecast(json: &Value) {
    let Some(periods) = json.as_array() else {
        println!("{}", json);
        return;
    };
    if periods.is_empty() {
        println!("No forecast periods.");
        return;
    }
    for period in periods {
        let name = period["name"].as_str().unwrap_or("?");
        let text = period["detailedForecast"].as_str().unwrap_or("");
        println!("{}: {}", name, text);
    }
}
