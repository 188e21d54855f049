use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "dealer-cli")]
#[command(about = "Query CLI for the dealership review service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List car models with their makes
    Cars,
    /// List dealerships, optionally for one state
    Dealers {
        #[arg(short, long)]
        state: Option<String>,
    },
    /// Show a single dealership
    Dealer { id: u64 },
    /// Show a dealership's reviews with sentiment
    Reviews { id: u64 },
    /// Check service health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let path = match cli.command {
        Commands::Cars => "/djangoapp/get_cars".to_string(),
        Commands::Dealers { state: Some(state) } => format!(
            "/djangoapp/get_dealers/{}",
            urlencoding::encode(&state)
        ),
        Commands::Dealers { state: None } => "/djangoapp/get_dealers".to_string(),
        Commands::Dealer { id } => format!("/djangoapp/dealer/{id}"),
        Commands::Reviews { id } => format!("/djangoapp/reviews/dealer/{id}"),
        Commands::Health => "/health".to_string(),
    };

    let res = client.get(format!("{base}{path}")).send().await?;
    print_response(res).await?;

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
