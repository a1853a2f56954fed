pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str, load_config_from_yaml_str};
pub use schema::{
    EngineConfig, ExcerptConfig, TopicRule, CONFIG_VERSION, MAX_EXCERPT_LIMIT,
    MAX_EXCERPT_TEXT_CHARS,
};
