pub const TOP_LEVEL_DOMAIN: &str = "com";
pub const AUTHOR: &str = "uptake";
pub const APP_NAME: &str = "uptasticsearch";

pub const CONFIG_FILE_NAME: &str = "config.toml";
