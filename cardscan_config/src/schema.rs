use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_DIR_NAME: &str = "cardscan";
const CONFIG_FILE_NAME: &str = "config.json";
const PLACEHOLDER_PREFIX: &str = "your-";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub airtable: AirtableConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VisionConfig {
    #[serde(default = "VisionConfig::default_model")]
    pub model: String,
    #[serde(default = "VisionConfig::default_max_tokens")]
    pub max_tokens: u32,
    /// Image detail hint passed with the `image_url` part.
    #[serde(default = "VisionConfig::default_detail")]
    pub detail: String,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
            max_tokens: Self::default_max_tokens(),
            detail: Self::default_detail(),
        }
    }
}

impl VisionConfig {
    fn default_model() -> String {
        "gpt-4o-mini".to_string()
    }

    const fn default_max_tokens() -> u32 {
        1000
    }

    fn default_detail() -> String {
        "high".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: OpenAiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AirtableConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_id: String,
    #[serde(default = "AirtableConfig::default_table_name")]
    pub table_name: String,
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_id: String::new(),
            table_name: Self::default_table_name(),
        }
    }
}

impl AirtableConfig {
    fn default_table_name() -> String {
        "CRM".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RetryConfig {
    #[serde(default = "RetryConfig::default_base_delays")]
    pub base_delays_secs: Vec<u64>,
    #[serde(default = "RetryConfig::default_final_retries")]
    pub final_retries: usize,
    #[serde(default = "RetryConfig::default_final_delay")]
    pub final_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delays_secs: Self::default_base_delays(),
            final_retries: Self::default_final_retries(),
            final_delay_secs: Self::default_final_delay(),
        }
    }
}

impl RetryConfig {
    fn default_base_delays() -> Vec<u64> {
        vec![2, 4]
    }

    const fn default_final_retries() -> usize {
        1
    }

    const fn default_final_delay() -> u64 {
        10
    }
}

/// A credential counts as configured when it is non-empty and not the
/// template placeholder.
fn is_configured(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !value.starts_with(PLACEHOLDER_PREFIX)
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR_NAME))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load `~/cardscan/config.json` and apply environment overrides.
    ///
    /// A missing file is not an error: defaults plus environment variables
    /// are enough to run.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!(
                "No config file at {}, using defaults and environment",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {e}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override credentials from `OPENAI_API_KEY`, `AIRTABLE_API_KEY`,
    /// `AIRTABLE_BASE_ID` and `AIRTABLE_TABLE_NAME`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.providers.openai.api_key = key;
        }
        if let Some(key) = non_empty("AIRTABLE_API_KEY") {
            self.airtable.api_key = key;
        }
        if let Some(base_id) = non_empty("AIRTABLE_BASE_ID") {
            self.airtable.base_id = base_id;
        }
        if let Some(table) = non_empty("AIRTABLE_TABLE_NAME") {
            self.airtable.table_name = table;
        }
    }

    pub fn openai_api_key(&self) -> anyhow::Result<&str> {
        let key = &self.providers.openai.api_key;
        if !is_configured(key) {
            anyhow::bail!("OpenAI API key not configured");
        }
        Ok(key)
    }

    /// Returns `(api_key, base_id, table_name)`.
    pub fn airtable_credentials(&self) -> anyhow::Result<(&str, &str, &str)> {
        let airtable = &self.airtable;
        if !is_configured(&airtable.api_key) {
            anyhow::bail!("Airtable API key is not configured");
        }
        if !is_configured(&airtable.base_id) {
            anyhow::bail!("Airtable Base ID is not configured");
        }
        Ok((&airtable.api_key, &airtable.base_id, &airtable.table_name))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Add your OpenAI API key (or export OPENAI_API_KEY)");
        println!("   2. Add your Airtable API key and base id (or export AIRTABLE_API_KEY / AIRTABLE_BASE_ID)");
        println!("   3. Run 'cardscan scan <image>' to read a card");
        println!();
        println!("🔧 Configuration options:");
        println!("   - vision.model: vision model to use (gpt-4o-mini, gpt-4o, etc.)");
        println!("   - airtable.table_name: destination table (default CRM)");
        println!("   - retry: backoff delays for model requests");
        println!();
        Ok(())
    }
}

const CONFIG_TEMPLATE: &str = r#"{
  "vision": {
    "model": "gpt-4o-mini",
    "max_tokens": 1000,
    "detail": "high"
  },
  "providers": {
    "openai": {
      "api_key": "your-openai-api-key-here"
    }
  },
  "airtable": {
    "api_key": "your-airtable-api-key-here",
    "base_id": "your-airtable-base-id-here",
    "table_name": "CRM"
  },
  "retry": {
    "base_delays_secs": [2, 4],
    "final_retries": 1,
    "final_delay_secs": 10
  }
}"#;
