use crate::config::Config;
use crate::error::{AgentError, Result};
use crate::providers::AnthropicProvider;
use crate::traits::Provider;

const API_KEY_ENV_VARS: &[&str] = &["ANTHROPIC_API_KEY", "ANTHROPIC_KEY"];

pub fn create_provider(config: &Config) -> Result<Box<dyn Provider>> {
    let api_key = resolve_api_key_with_fallback(API_KEY_ENV_VARS, &config.api_key)?;

    let mut provider = AnthropicProvider::new(api_key)
        .with_model(config.model.clone())
        .with_max_tokens(config.max_tokens);
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url.clone());
    }

    Ok(Box::new(provider))
}

fn resolve_api_key_with_fallback(env_vars: &[&str], config_key: &str) -> Result<String> {
    for var_name in env_vars {
        if let Ok(key) = std::env::var(var_name)
            && !key.is_empty()
        {
            return Ok(key);
        }
    }
    if !config_key.is_empty() {
        Ok(config_key.to_string())
    } else {
        Err(AgentError::Config(format!(
            "no Anthropic API key found. Set {} or run 'support onboard'.",
            env_vars.join(" or ")
        )))
    }
}
