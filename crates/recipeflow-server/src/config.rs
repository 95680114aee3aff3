use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Server configuration, built once at startup and passed down by reference.
///
/// The upstream API key is deliberately env-only and never read from the
/// config file. An absent key is not rejected here; the upstream call fails
/// at the point of use instead.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    openai: OpenAISection,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAISection {
    #[serde(default = "default_model")]
    model: String,
    #[serde(default = "default_base_url")]
    base_url: String,
}

impl Default for OpenAISection {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn api_key_from_env() -> String {
    env::var("OPENAI_API_KEY").unwrap_or_default()
}

impl ServerConfig {
    pub fn load() -> anyhow::Result<Self> {
        if let Some(file_config) = load_from_file()? {
            return Ok(Self {
                host: file_config.server.host,
                port: file_config.server.port,
                openai_api_key: api_key_from_env(),
                openai_model: file_config.openai.model,
                openai_base_url: file_config.openai.base_url,
            });
        }

        Ok(Self::from_env())
    }

    fn from_env() -> Self {
        let host = env::var("RECIPEFLOW_SERVER_HOST").unwrap_or_else(|_| default_host());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or_else(default_port);
        let openai_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| default_model());
        let openai_base_url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| default_base_url());

        Self {
            host,
            port,
            openai_api_key: api_key_from_env(),
            openai_model,
            openai_base_url,
        }
    }
}

fn load_from_file() -> anyhow::Result<Option<FileConfig>> {
    let config_path = env::var("RECIPEFLOW_SERVER_CONFIG").ok();
    let path = if let Some(path) = config_path {
        Some(path)
    } else if Path::new("server.toml").exists() {
        Some("server.toml".to_string())
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(None);
    };

    let contents = fs::read_to_string(&path)
        .map_err(|err| anyhow::anyhow!("Failed to read config {}: {}", path, err))?;
    let parsed: FileConfig = toml::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("Failed to parse config {}: {}", path, err))?;
    Ok(Some(parsed))
}
