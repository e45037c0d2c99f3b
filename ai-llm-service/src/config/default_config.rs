//! Default completion configs loaded from environment variables.
//!
//! Two roles are provided:
//!
//! - **Answer**   → the streamed, user-facing medical answer
//! - **Followup** → the short non-streaming call that suggests follow-up questions
//!
//! # Environment variables
//!
//! - `LLM_KIND`            = provider kind (`pplx` or `openai`), default `pplx`
//! - `PPLX_API_KEY`        = bearer credential (mandatory)
//! - `PPLX_URL`            = API base URL, default `https://api.perplexity.ai`
//! - `PPLX_MODEL`          = model id, default `sonar`
//! - `LLM_MAX_TOKENS`      = answer max tokens, default 1000
//! - `LLM_TEMPERATURE`     = answer temperature, default 0.1
//! - `LLM_TIMEOUT_SECS`    = optional overall HTTP timeout
//! - `FOLLOWUP_MAX_TOKENS` = follow-up max tokens, default 200

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        ConfigError, Result, env_opt_f32, env_opt_u32, env_opt_u64, env_or, must_env,
    },
};

pub const DEFAULT_ENDPOINT: &str = "https://api.perplexity.ai";
pub const DEFAULT_MODEL: &str = "sonar";

const DEFAULT_ANSWER_MAX_TOKENS: u32 = 1000;
const DEFAULT_ANSWER_TEMPERATURE: f32 = 0.1;
const DEFAULT_FOLLOWUP_MAX_TOKENS: u32 = 200;
const FOLLOWUP_TEMPERATURE: f32 = 0.3;

/// Reads the settings shared by both roles.
fn base_from_env() -> Result<LlmModelConfig> {
    let kind = env_or("LLM_KIND", "pplx");
    let provider = LlmProvider::from_kind(&kind).ok_or(ConfigError::InvalidFormat {
        var: "LLM_KIND",
        reason: "expected `pplx` or `openai`",
    })?;

    let cfg = LlmModelConfig {
        provider,
        model: env_or("PPLX_MODEL", DEFAULT_MODEL),
        endpoint: env_or("PPLX_URL", DEFAULT_ENDPOINT),
        api_key: Some(must_env("PPLX_API_KEY")?),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: env_opt_u64("LLM_TIMEOUT_SECS")?,
    };
    Ok(cfg)
}

/// Constructs the config for the streamed **answer** call.
///
/// # Defaults
/// - `max_tokens = 1000`
/// - `temperature = 0.1`
///
/// # Errors
/// - [`ConfigError::MissingVar`] if `PPLX_API_KEY` is unset
/// - [`ConfigError::InvalidNumber`] / [`ConfigError::OutOfRange`] on bad numbers
pub fn config_answer() -> Result<LlmModelConfig> {
    let mut cfg = base_from_env()?;
    cfg.max_tokens = Some(env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_ANSWER_MAX_TOKENS));
    cfg.temperature = Some(env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(DEFAULT_ANSWER_TEMPERATURE));
    cfg.validate()?;
    Ok(cfg)
}

/// Constructs the config for the **follow-up** suggestion call.
///
/// Same endpoint, key and model as the answer profile; smaller budget.
pub fn config_followup() -> Result<LlmModelConfig> {
    let mut cfg = base_from_env()?;
    cfg.max_tokens =
        Some(env_opt_u32("FOLLOWUP_MAX_TOKENS")?.unwrap_or(DEFAULT_FOLLOWUP_MAX_TOKENS));
    cfg.temperature = Some(FOLLOWUP_TEMPERATURE);
    cfg.validate()?;
    Ok(cfg)
}
