pub mod constants;

pub use etcetera::AppStrategy;
use etcetera::{AppStrategyArgs, choose_app_strategy};

use std::env;
use std::path::PathBuf;

/// Environment variable that overrides the configuration directory
pub const CONFIG_DIR_ENV: &str = "UPTASTICSEARCH_CONFIG_DIR";

pub fn create_strategy() -> std::result::Result<impl AppStrategy, etcetera::HomeDirError> {
    choose_app_strategy(AppStrategyArgs {
        top_level_domain: constants::TOP_LEVEL_DOMAIN.to_string(),
        author: constants::AUTHOR.to_string(),
        app_name: constants::APP_NAME.to_string(),
    })
}

pub fn resolve_dir<S, F>(env_key: &str, strategy: &S, strategy_fn: F) -> PathBuf
where
    S: AppStrategy,
    F: FnOnce(&S) -> Option<PathBuf>,
{
    env::var_os(env_key)
        .map(PathBuf::from)
        .or_else(|| strategy_fn(strategy))
        .unwrap_or_else(|| env::temp_dir().join(constants::APP_NAME))
}

/// Where `config.toml` lives: `$UPTASTICSEARCH_CONFIG_DIR`, else the
/// platform config directory
pub fn config_file_path() -> std::result::Result<PathBuf, etcetera::HomeDirError> {
    let strategy = create_strategy()?;
    let dir = resolve_dir(CONFIG_DIR_ENV, &strategy, |s| Some(s.config_dir()));
    Ok(dir.join(constants::CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dir_prefers_strategy_without_env() {
        let strategy = create_strategy().unwrap();
        let dir = resolve_dir("UPTASTICSEARCH_TEST_UNSET_VARIABLE", &strategy, |_| {
            Some(PathBuf::from("/from/strategy"))
        });
        assert_eq!(dir, PathBuf::from("/from/strategy"));
    }

    #[test]
    fn test_resolve_dir_falls_back_to_temp() {
        let strategy = create_strategy().unwrap();
        let dir = resolve_dir("UPTASTICSEARCH_TEST_UNSET_VARIABLE", &strategy, |_| None);
        assert_eq!(dir, env::temp_dir().join(constants::APP_NAME));
    }

    #[test]
    fn test_config_file_name() {
        let path = config_file_path().unwrap();
        assert!(path.ends_with(constants::CONFIG_FILE_NAME));
    }
}
