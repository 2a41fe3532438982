use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const SUPPORT_DIR: &str = ".support";

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
IMPORTANT: Be extremely concise in all your answers. Keep it to 280 characters.
You are a great customer support agent for a headphones company that is tasked to help customers. Answer the question as faithfully as you can.
You only reply to questions after 6:00AM PDT.
You need to find out what the time is. If a question is asked before 6:00AM PDT, you must reply saying: \"Sorry, Can't answer right now, please try again later.\"
Retrieve knowledge from any source you have and provide the best answer you can.
Your main source of knowledge is this file which you can access by using a web scraper, but only scrape it once: https://gist.githubusercontent.com/orliesaurus/be34b6b36e79c154c7a3cb625c448ac3/raw/0bbda12501d866eb405263485d099ae4e1b2db76/faqs_headphones.txt
Only respond with the details of the answer, like a real customer support agent would do.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub utc_offset_hours: i32,
    pub system_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            utc_offset_hours: -7,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

pub fn get_support_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(SUPPORT_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_support_dir().join("config.toml")
}

pub fn ensure_support_dir() -> Result<PathBuf> {
    let support_dir = get_support_dir();

    if !support_dir.exists() {
        std::fs::create_dir_all(&support_dir).map_err(|e| {
            AgentError::Config(format!(
                "failed to create config directory at {}: {}",
                support_dir.display(),
                e
            ))
        })?;
    }

    Ok(support_dir)
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        if config_exists() {
            load_config()
        } else {
            Ok(Config::default())
        }
    }
}

pub fn load_config() -> Result<Config> {
    read_config(&get_config_path())
}

fn read_config(config_path: &std::path::Path) -> Result<Config> {
    let content = std::fs::read_to_string(config_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AgentError::Config(
                "config file not found. Run 'support onboard' to set up your configuration."
                    .to_string(),
            )
        } else {
            AgentError::Config(format!(
                "failed to read config from {}: {}",
                config_path.display(),
                e
            ))
        }
    })?;

    toml::from_str(&content).map_err(|e| {
        AgentError::Config(format!(
            "failed to parse config from {}: {}",
            config_path.display(),
            e
        ))
    })
}

pub fn save_config(config: &Config) -> Result<()> {
    ensure_support_dir()?;
    write_config(&get_config_path(), config)
}

fn write_config(config_path: &std::path::Path, config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| AgentError::Config(format!("failed to serialize config to TOML: {}", e)))?;

    std::fs::write(config_path, content).map_err(|e| {
        AgentError::Config(format!(
            "failed to write config to {}: {}",
            config_path.display(),
            e
        ))
    })?;

    Ok(())
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}
