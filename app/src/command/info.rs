use cardscan_config::Config;
use cardscan_core::RecordSink;
use tracing::info;

/// Strategy for displaying configuration information.
///
/// Outputs the config location, masked credentials, vision settings, and
/// the result of an Airtable connection test.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== cardscan Configuration ===\n");

        let path = Config::config_path()?;
        println!("Config File:");
        println!(
            "  {} ({})",
            path.display(),
            if path.exists() { "found" } else { "not found, using defaults" }
        );
        println!();

        println!("Vision:");
        println!("  OpenAI Key: {}", mask_secret(&config.providers.openai.api_key));
        if let Some(ref base_url) = config.providers.openai.base_url {
            println!("  Base URL: {base_url}");
        }
        println!("  Model: {}", config.vision.model);
        println!("  Max Tokens: {}", config.vision.max_tokens);
        println!("  Detail: {}", config.vision.detail);
        println!(
            "  Retry: delays={:?}s, final_retries={}, final_delay={}s",
            config.retry.base_delays_secs, config.retry.final_retries, config.retry.final_delay_secs
        );
        println!();

        println!("Airtable:");
        println!("  API Key: {}", mask_secret(&config.airtable.api_key));
        println!("  Base ID: {}", mask_secret(&config.airtable.base_id));
        println!("  Table: {}", config.airtable.table_name);

        match super::build_sink(&config) {
            Ok(sink) => {
                info!("Testing Airtable connection");
                if sink.test_connection().await {
                    println!("  Status: Connected");
                } else {
                    println!("  Status: Connection failed");
                }
            }
            Err(e) => {
                println!("  Status: Not configured");
                println!("  Error: {e}");
            }
        }

        Ok(())
    }
}

fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.is_empty() {
        "(not set)".to_string()
    } else if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_secrets() {
        assert_eq!(mask_secret(""), "(not set)");
        assert_eq!(mask_secret("short"), "***");
        assert_eq!(mask_secret("sk-abcdefghijkl"), "sk-a...ijkl");
    }
}
