//! Fetch keys from one or more JWKS endpoints and verify a token
//!
//! Run with
//!
//! ```not_rust
//! cargo run --example verify_token -- https://issuer.example/.well-known/jwks.json <token>
//! ```

use std::process::ExitCode;
use std::time::Duration;

use authorizer::{ClaimsValidation, KeyFetcher, TokenVerifier};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authorizer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let Some(token) = args.pop() else {
        eprintln!("usage: verify_token <jwks-url>... <token>");
        return ExitCode::from(2);
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build HTTP client");

    let keys = match KeyFetcher::new(client)
        .deadline(Duration::from_secs(15))
        .fetch(&args)
        .await
    {
        Ok(keys) => keys,
        Err(e) => {
            eprintln!("failed to fetch keys: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(endpoints = args.len(), keys = keys.len(), "keys fetched");

    let verifier = TokenVerifier::new()
        .validate(ClaimsValidation::default().clock_skew(30))
        .build();

    match verifier.verify(&token, &keys) {
        Ok(claims) => {
            println!("token valid");
            for (name, value) in claims.as_object().iter() {
                println!("  {name}: {}", miniserde::json::to_string(value));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("token rejected: {e}");
            ExitCode::FAILURE
        }
    }
}
