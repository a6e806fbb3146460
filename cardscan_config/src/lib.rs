mod schema;

pub use schema::{
    AirtableConfig, Config, OpenAiConfig, ProvidersConfig, RetryConfig, VisionConfig,
};
