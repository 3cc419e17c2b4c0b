use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, AUTHORIZATION};
use serde_json::Value;

use form_relay::submission::service::timestamp;
use form_relay::submission::validation::validate;
use form_relay::submission::{SubmissionInput, UpstreamPayload};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Operator CLI for the form relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay liveness
    Health,
    /// Show configuration presence flags (requires debug.expose_config)
    Config,
    /// Submit the form through the relay
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Send a test submission straight to the upstream API
    ProbeUpstream {
        #[arg(long, env = "UPSTREAM_API_URL")]
        upstream_url: Option<String>,
        #[arg(long, env = "UPSTREAM_API_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Config => {
            let res = client.get(format!("{}/debug/config", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Submit { name, email } => {
            let res = client
                .post(format!("{}/api/submit-form", base))
                .json(&serde_json::json!({ "fullName": name, "email": email }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::ProbeUpstream { upstream_url, token } => {
            probe_upstream(upstream_url, token).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}

/// Exercise the upstream with the same payload shape the relay sends.
async fn probe_upstream(
    upstream_url: Option<String>,
    token: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Upstream URL: {}", upstream_url.as_deref().unwrap_or("NOT SET"));
    println!(
        "Token (first 20 chars): {}",
        token
            .as_deref()
            .map(|t| format!("{}...", t.chars().take(20).collect::<String>()))
            .unwrap_or_else(|| "NOT SET".to_string())
    );

    let (Some(url), Some(token)) = (upstream_url, token) else {
        return Err("UPSTREAM_API_URL and UPSTREAM_API_TOKEN must both be set".into());
    };

    let form = validate(&SubmissionInput::new("Test User", "test@example.com"))?;
    let payload = UpstreamPayload::new(form, timestamp()).with_source("integration-test");
    println!("Payload: {}", serde_json::to_string_pretty(&payload)?);

    let res = reqwest::Client::builder()
        .user_agent("IntegrationTest/1.0")
        .build()?
        .post(&url)
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await?;

    let status = res.status();
    println!("Status: {}", status);
    print_headers(res.headers());

    let body = res.text().await?;
    println!("Body: {}", body);

    if status.is_success() {
        println!("Upstream accepted the test submission.");
        match serde_json::from_str::<Value>(&body) {
            Ok(json) => println!("Parsed response: {}", json),
            Err(_) => println!("Response is not JSON."),
        }
        Ok(())
    } else {
        Err(format!("upstream rejected the test submission with {}; check the URL and token", status).into())
    }
}

fn print_headers(headers: &HeaderMap) {
    for (name, value) in headers {
        if name == AUTHORIZATION {
            continue;
        }
        println!("  {}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
}
