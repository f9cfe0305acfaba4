use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data_dir: PathBuf,
    pub backend_url: Option<String>,
    pub trivia_api_url: String,
    pub history_api_url: String,
    pub facts_api_url: String,
    pub numbers_api_url: String,
    pub puzzle_difficulty: String,
    pub session_seconds: u32,
    pub max_hints: u32,
    pub http_timeout_seconds: u64,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        let data_dir = settings
            .get_string("storage.data_dir")
            .or_else(|_| env::var("DATA_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        // The backend is optional: without it scores and rewards stay local.
        let backend_url = settings
            .get_string("backend.url")
            .or_else(|_| env::var("BACKEND_URL"))
            .ok()
            .map(|raw| raw.trim_end_matches('/').to_string())
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| match Url::parse(&raw) {
                Ok(_) => Some(raw),
                Err(e) => {
                    eprintln!("WARNING: Ignoring unparseable BACKEND_URL {:?}: {}", raw, e);
                    None
                }
            });

        let trivia_api_url = settings
            .get_string("content.trivia_url")
            .or_else(|_| env::var("TRIVIA_API_URL"))
            .unwrap_or_else(|_| "https://opentdb.com/api.php".to_string());

        let history_api_url = settings
            .get_string("content.history_url")
            .or_else(|_| env::var("HISTORY_API_URL"))
            .unwrap_or_else(|_| "https://history.muffinlabs.com".to_string());

        let facts_api_url = settings
            .get_string("content.facts_url")
            .or_else(|_| env::var("FACTS_API_URL"))
            .unwrap_or_else(|_| "https://uselessfacts.jsph.pl/api/v2/facts/random".to_string());

        let numbers_api_url = settings
            .get_string("content.numbers_url")
            .or_else(|_| env::var("NUMBERS_API_URL"))
            .unwrap_or_else(|_| "http://numbersapi.com".to_string());

        let puzzle_difficulty = settings
            .get_string("content.puzzle_difficulty")
            .or_else(|_| env::var("PUZZLE_DIFFICULTY"))
            .unwrap_or_else(|_| "medium".to_string());

        let session_seconds = settings
            .get_string("session.duration_seconds")
            .or_else(|_| env::var("SESSION_SECONDS"))
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(30);

        let max_hints = settings
            .get_string("session.max_hints")
            .or_else(|_| env::var("HINTS_MAX"))
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(2);

        let http_timeout_seconds = settings
            .get_string("http.timeout_seconds")
            .or_else(|_| env::var("HTTP_TIMEOUT_SECONDS"))
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(5);

        Ok(Config {
            data_dir,
            backend_url,
            trivia_api_url,
            history_api_url,
            facts_api_url,
            numbers_api_url,
            puzzle_difficulty,
            session_seconds,
            max_hints,
            http_timeout_seconds,
        })
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("dailybite"))
        .unwrap_or_else(|| PathBuf::from(".dailybite"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn session_seconds_env_override() {
        std::env::set_var("SESSION_SECONDS", "45");
        let config = Config::load().unwrap();
        assert_eq!(config.session_seconds, 45);
        std::env::remove_var("SESSION_SECONDS");
    }

    #[test]
    #[serial]
    fn invalid_session_seconds_falls_back_to_default() {
        std::env::set_var("SESSION_SECONDS", "zero");
        let config = Config::load().unwrap();
        assert_eq!(config.session_seconds, 30);
        std::env::remove_var("SESSION_SECONDS");
    }

    #[test]
    #[serial]
    fn backend_url_trailing_slash_is_trimmed() {
        std::env::set_var("BACKEND_URL", "https://api.example.com/");
        let config = Config::load().unwrap();
        assert_eq!(config.backend_url.as_deref(), Some("https://api.example.com"));
        std::env::remove_var("BACKEND_URL");
    }

    #[test]
    #[serial]
    fn unparseable_backend_url_is_ignored() {
        std::env::set_var("BACKEND_URL", "not a url");
        let config = Config::load().unwrap();
        assert_eq!(config.backend_url, None);
        std::env::remove_var("BACKEND_URL");
    }

    #[test]
    #[serial]
    fn defaults_without_env() {
        for key in [
            "BACKEND_URL",
            "SESSION_SECONDS",
            "HINTS_MAX",
            "HTTP_TIMEOUT_SECONDS",
        ] {
            std::env::remove_var(key);
        }
        let config = Config::load().unwrap();
        assert_eq!(config.session_seconds, 30);
        assert_eq!(config.max_hints, 2);
        assert_eq!(config.http_timeout_seconds, 5);
        assert_eq!(config.backend_url, None);
    }
}
