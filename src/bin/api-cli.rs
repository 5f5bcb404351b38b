use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "api-cli")]
#[command(about = "Client for the API server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Uppercase a string
    Uppercase { s: String },
    /// Count the bytes of a string
    Count { s: String },
    /// Compute the n-th Fibonacci number
    Fib { n: u64 },
    /// Echo the request headers as the server saw them
    Headers,
    /// Look up the server's public IP address
    Ip,
    /// Dump the server's Prometheus metrics
    Metrics,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Uppercase { s } => {
            client
                .post(format!("{base}/string/uppercase"))
                .json(&json!({ "s": s }))
                .send()
                .await?
        }
        Commands::Count { s } => {
            client
                .post(format!("{base}/string/count"))
                .json(&json!({ "s": s }))
                .send()
                .await?
        }
        Commands::Fib { n } => client.get(format!("{base}/fib/{n}")).send().await?,
        Commands::Headers => client.get(format!("{base}/headers")).send().await?,
        Commands::Ip => client.get(format!("{base}/ip")).send().await?,
        Commands::Metrics => client.get(format!("{base}/metrics")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: server returned status {status}");
        eprintln!("Response: {text}");
        return Ok(());
    }

    // Pretty-print JSON bodies; plain text goes out as received.
    match serde_json::from_str::<Value>(&text) {
        Ok(json) if json.is_object() => println!("{}", serde_json::to_string_pretty(&json)?),
        _ if text.ends_with('\n') => print!("{text}"),
        _ => println!("{text}"),
    }
    Ok(())
}
