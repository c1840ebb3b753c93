use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "maintenance-cli")]
#[command(about = "Toggle maintenance mode on a running maintenance-gate", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current maintenance state and allow-list
    Status,
    /// Turn maintenance on with the given message
    Enable { message: String },
    /// Turn maintenance off (on key_value backends this flushes the store)
    Disable,
    /// Replace the allow-list
    Allow {
        #[arg(required = true)]
        ips: Vec<String>,
    },
    /// Remove the allow-list
    ClearAllowedIps,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!("{}/admin/maintenance", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::Status => client.get(&base).send().await?,
        Commands::Enable { message } => {
            client
                .put(format!("{base}/message"))
                .body(message)
                .send()
                .await?
        }
        Commands::Disable => client.delete(&base).send().await?,
        Commands::Allow { ips } => {
            client
                .put(format!("{base}/allowed-ips"))
                .json(&ips)
                .send()
                .await?
        }
        Commands::ClearAllowedIps => client.delete(format!("{base}/allowed-ips")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    if status == reqwest::StatusCode::NO_CONTENT {
        println!("ok");
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
