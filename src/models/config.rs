use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub youtube_api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub youtube_api_base_url: String,
    #[serde(default = "default_region_code")]
    pub region_code: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_cache_sweep_threshold")]
    pub cache_sweep_threshold: usize,
    #[serde(default = "default_popular_channel_ids")]
    pub popular_channel_ids: Vec<String>,
}

impl Config {
    /// Reads `config.json` (if present) and lets environment variables override it.
    pub fn load() -> Result<Config, figment::Error> {
        Config::from_figment(Figment::new().merge(Json::file(CONFIG_FILE)))
    }

    fn from_figment(figment: Figment) -> Result<Config, figment::Error> {
        let mut config: Config = figment
            .merge(Env::raw().only(&[
                "YOUTUBE_API_KEY",
                "YOUTUBE_API_BASE_URL",
                "REGION_CODE",
                "LOG_LEVEL",
                "CACHE_SWEEP_THRESHOLD",
            ]))
            .extract()?;

        // an empty variable means "not configured"
        if config
            .youtube_api_key
            .as_deref()
            .map_or(false, |key| key.trim().is_empty())
        {
            config.youtube_api_key = None;
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            youtube_api_key: None,
            youtube_api_base_url: default_base_url(),
            region_code: default_region_code(),
            log_level: default_log_level(),
            cache_sweep_threshold: default_cache_sweep_threshold(),
            popular_channel_ids: default_popular_channel_ids(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_region_code() -> String {
    "US".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cache_sweep_threshold() -> usize {
    256
}

fn default_popular_channel_ids() -> Vec<String> {
    [
        "UCX6OQ3DkcsbYNE6H8uQQuVA", // MrBeast
        "UCq-Fj5jknLsUf-MWSy4_brA", // T-Series
        "UC-lHJZR3Gqxm24_Vd_AJ5Yw", // PewDiePie
        "UCFFbwnve3yF62-tVXkTyHqg", // Markiplier
        "UCfM3zsQsOnfWNUppiycmBuw", // Dude Perfect
        "UCY30JRSgfhYXA6i6xX1erWg", // Ninja
        "UCBR8-60-B28hp2BmDPdntcQ", // YouTube Spotlight
        "UCpEhnqL0y41EpW2TvWAHD7Q", // SET India
        "UCbCmjCuTUZos6Inko4u57UQ", // Cocomelon
        "UCJ5v_MCY6GNUBTO8-D3XoAg", // WWE
    ]
    .iter()
    .map(|id| id.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_any_source() {
        Jail::expect_with(|jail| {
            jail.set_env("YOUTUBE_API_KEY", "");

            let config = Config::from_figment(Figment::new())?;
            assert_eq!(config.youtube_api_key, None);
            assert_eq!(config.popular_channel_ids, Config::default().popular_channel_ids);
            assert_eq!(config.popular_channel_ids.len(), 10);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_json_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.json",
                r#"{ "youtube_api_key": "from-file", "region_code": "DE" }"#,
            )?;
            jail.set_env("YOUTUBE_API_KEY", "from-env");

            let config = Config::from_figment(Figment::new().merge(Json::file("config.json")))?;
            assert_eq!(config.youtube_api_key.as_deref(), Some("from-env"));
            assert_eq!(config.region_code, "DE");
            Ok(())
        });
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        Jail::expect_with(|jail| {
            jail.set_env("YOUTUBE_API_KEY", "  ");

            let config = Config::from_figment(Figment::new())?;
            assert_eq!(config.youtube_api_key, None);
            Ok(())
        });
    }
}
