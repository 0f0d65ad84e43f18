use dotenv::dotenv;
use std::time::Duration;
use textgen_client::{ApiKey, GenerationParameters, RemoteCompletionClient, RetryPolicy};
use textgen_client::provider::together;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let model = args
        .next()
        .unwrap_or_else(|| "mistralai/Mixtral-8x7B-v0.1".to_string());
    let prompt = args
        .next()
        .unwrap_or_else(|| "Explain how a hash map works.".to_string());

    // Be patient with rate limits: 1s, 2s, 4s, 8s between five attempts.
    let config = together::config_from_env(&model, ApiKey::Default)?
        .with_retry_policy(
            RetryPolicy::default()
                .with_max_attempts(5)
                .with_initial_delay(Duration::from_secs(1)),
        )
        .with_attempt_timeout(Duration::from_secs(30));
    let client = RemoteCompletionClient::new(config)?;

    let result = client
        .complete(&prompt, &GenerationParameters::new().max_tokens(128))
        .await?;

    for (i, choice) in result.choices.iter().enumerate() {
        println!("[{i}] {}", choice.text);
    }
    Ok(())
}
