//! Provider configuration, persisted to `llm-config.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use healthlog_core::Result;

use crate::types::{LLMConfigResponse, LLMConfigUpdate, LLMProvider, ProviderSelection};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";

pub const OPENAI_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o", "gpt-4.1-mini"];
pub const ANTHROPIC_MODELS: &[&str] = &["claude-3-5-haiku-20241022", "claude-sonnet-4-20250514"];
pub const GROQ_MODELS: &[&str] = &["llama-3.3-70b-versatile", "llama-3.1-8b-instant"];
pub const GEMINI_MODELS: &[&str] = &["gemini-2.5-flash-lite", "gemini-2.5-flash"];

/// Auto mode tries providers in this order.
const AUTO_ORDER: [LLMProvider; 4] = [
    LLMProvider::Gemini,
    LLMProvider::Anthropic,
    LLMProvider::Groq,
    LLMProvider::OpenAI,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// `auto` or a provider name.
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}
fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            gemini_api_key: None,
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            groq_model: default_groq_model(),
            gemini_model: default_gemini_model(),
            config_path: PathBuf::new(),
        }
    }
}

impl LLMConfig {
    /// Read the file if it exists, then fill missing keys from the environment.
    pub fn load(config_path: &Path) -> Self {
        let mut config = Self::load_file(config_path);
        config.fill_from_env();
        config
    }

    /// Read the file only. A missing or corrupt file gives the defaults.
    pub fn load_file(config_path: &Path) -> Self {
        let mut config: LLMConfig = match std::fs::read_to_string(config_path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable {}: {}", config_path.display(), e);
                LLMConfig::default()
            }),
            Err(_) => LLMConfig::default(),
        };
        config.config_path = config_path.to_path_buf();
        config
    }

    fn fill_from_env(&mut self) {
        let slots = [
            (&mut self.openai_api_key, "OPENAI_API_KEY"),
            (&mut self.anthropic_api_key, "ANTHROPIC_API_KEY"),
            (&mut self.groq_api_key, "GROQ_API_KEY"),
            (&mut self.gemini_api_key, "GEMINI_API_KEY"),
        ];
        for (slot, var) in slots {
            if slot.is_none() {
                *slot = std::env::var(var).ok().filter(|k| !k.trim().is_empty());
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved LLM config to {}", self.config_path.display());
        Ok(())
    }

    /// Merge an update. An empty key string clears that key.
    pub fn apply_update(&mut self, update: &LLMConfigUpdate) {
        fn set_key(slot: &mut Option<String>, value: &Option<String>) {
            if let Some(v) = value {
                let v = v.trim();
                *slot = (!v.is_empty()).then(|| v.to_string());
            }
        }
        fn set_model(slot: &mut String, value: &Option<String>) {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                *slot = v.to_string();
            }
        }

        if let Some(p) = &update.preferred_provider {
            self.preferred_provider = p.trim().to_lowercase();
        }
        set_key(&mut self.openai_api_key, &update.openai_api_key);
        set_key(&mut self.anthropic_api_key, &update.anthropic_api_key);
        set_key(&mut self.groq_api_key, &update.groq_api_key);
        set_key(&mut self.gemini_api_key, &update.gemini_api_key);
        set_model(&mut self.openai_model, &update.openai_model);
        set_model(&mut self.anthropic_model, &update.anthropic_model);
        set_model(&mut self.groq_model, &update.groq_model);
        set_model(&mut self.gemini_model, &update.gemini_model);
    }

    fn slot(&self, provider: LLMProvider) -> (Option<&String>, &String) {
        match provider {
            LLMProvider::OpenAI => (self.openai_api_key.as_ref(), &self.openai_model),
            LLMProvider::Anthropic => (self.anthropic_api_key.as_ref(), &self.anthropic_model),
            LLMProvider::Groq => (self.groq_api_key.as_ref(), &self.groq_model),
            LLMProvider::Gemini => (self.gemini_api_key.as_ref(), &self.gemini_model),
        }
    }

    fn select(&self, provider: LLMProvider) -> Option<ProviderSelection> {
        let (key, model) = self.slot(provider);
        key.map(|k| ProviderSelection {
            provider,
            model: model.clone(),
            api_key: k.clone(),
        })
    }

    /// Provider to call: the explicit preference if it has a key, otherwise
    /// the first configured provider in auto order.
    pub fn resolve_provider(&self) -> Option<ProviderSelection> {
        if self.preferred_provider != "auto" {
            return self
                .preferred_provider
                .parse::<LLMProvider>()
                .ok()
                .and_then(|p| self.select(p));
        }
        AUTO_ORDER.iter().find_map(|p| self.select(*p))
    }

    pub fn to_response(&self) -> LLMConfigResponse {
        let resolved = self.resolve_provider();
        LLMConfigResponse {
            preferred_provider: self.preferred_provider.clone(),
            openai_api_key: self.openai_api_key.as_deref().map(mask_key),
            anthropic_api_key: self.anthropic_api_key.as_deref().map(mask_key),
            groq_api_key: self.groq_api_key.as_deref().map(mask_key),
            gemini_api_key: self.gemini_api_key.as_deref().map(mask_key),
            openai_model: self.openai_model.clone(),
            anthropic_model: self.anthropic_model.clone(),
            groq_model: self.groq_model.clone(),
            gemini_model: self.gemini_model.clone(),
            available_models: resolved
                .as_ref()
                .map(|s| available_models(s.provider))
                .unwrap_or_default(),
            active_provider: resolved.map(|s| s.provider.to_string()),
        }
    }
}

pub fn available_models(provider: LLMProvider) -> Vec<String> {
    let models = match provider {
        LLMProvider::OpenAI => OPENAI_MODELS,
        LLMProvider::Anthropic => ANTHROPIC_MODELS,
        LLMProvider::Groq => GROQ_MODELS,
        LLMProvider::Gemini => GEMINI_MODELS,
    };
    models.iter().map(|s| s.to_string()).collect()
}

/// `sk-abc…wxyz`. Short keys are fully hidden.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 10 {
        return "****".into();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
