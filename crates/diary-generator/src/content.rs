//! Diary text generation with static fallback.

use std::sync::Arc;

use chrono::NaiveDate;
use diary_config::GeneratorConfig;
use rand::seq::IndexedRandom;
use tracing::{debug, info, warn};

use crate::client::{CompletionRequest, OpenAiClient, TextCompletion};
use crate::season::Season;
use crate::templates::{template_for, truncate_chars};
use crate::weather::{weather_info, Weather};

const SYSTEM_PROMPT: &str = "농업인 영농일지 작성. 200자 이내.";

/// Limit for seasonal basic-management content.
const BASIC_MAX_CHARS: usize = 100;

/// Generated basic content shorter than this is discarded.
const BASIC_MIN_CHARS: usize = 20;

/// Generation parameters taken from the `[generator]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    pub enabled: bool,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub max_chars: usize,
}

impl From<&GeneratorConfig> for GeneratorSettings {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            enabled: config.enabled,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_chars: config.max_chars,
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::from(&GeneratorConfig::default())
    }
}

/// Produces memo text. Never fails; the static templates back every path.
pub struct ContentGenerator {
    settings: GeneratorSettings,
    completion: Option<Arc<dyn TextCompletion>>,
}

impl ContentGenerator {
    /// Static templates only.
    pub fn new(settings: GeneratorSettings) -> Self {
        Self {
            settings,
            completion: None,
        }
    }

    pub fn with_completion(settings: GeneratorSettings, completion: Arc<dyn TextCompletion>) -> Self {
        Self {
            settings,
            completion: Some(completion),
        }
    }

    /// Build from configuration. The external client exists only when a
    /// credential is configured.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let settings = GeneratorSettings::from(config);
        match config.credential() {
            Some(key) => {
                let client = OpenAiClient::with_url(key.to_string(), config.api_url.clone())
                    .with_timeout(config.request_timeout());
                Self::with_completion(settings, Arc::new(client))
            }
            None => {
                if config.enabled {
                    info!("No text-generation key configured, using static templates");
                }
                Self::new(settings)
            }
        }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Whether external generation will be attempted by default.
    pub fn external_enabled(&self) -> bool {
        self.settings.enabled && self.completion.is_some()
    }

    /// Memo text for `task` on `crop`.
    ///
    /// With `use_external` and a configured client the text is generated
    /// remotely; any failure falls back to the static template.
    pub async fn generate(
        &self,
        task: &str,
        crop: &str,
        use_external: bool,
        date: Option<NaiveDate>,
    ) -> String {
        if use_external {
            if let Some(completion) = &self.completion {
                let request = self.task_request(task, crop, date);
                match completion.complete(request).await {
                    Ok(text) => {
                        debug!("Generated content for {} ({} chars)", task, text.chars().count());
                        return truncate_chars(&text, self.settings.max_chars);
                    }
                    Err(e) => warn!("Text generation failed ({}), using template for {}", e, task),
                }
            }
        }

        truncate_chars(&template_for(task, crop), self.settings.max_chars)
    }

    /// Seasonal basic-management content for a week without a scheduled
    /// task, at most 100 characters.
    pub async fn generate_basic(&self, date: NaiveDate, weather: Option<&Weather>) -> String {
        let season = Season::of(date);
        let weather_info = weather_info(weather);

        if self.settings.enabled {
            if let Some(completion) = &self.completion {
                let request = self.request(season.prompt(date, &weather_info));
                match completion.complete(request).await {
                    Ok(text) if text.chars().count() > BASIC_MIN_CHARS => {
                        return truncate_chars(&text, BASIC_MAX_CHARS);
                    }
                    Ok(text) => debug!("Generated basic content too short: {:?}", text),
                    Err(e) => warn!("Basic content generation failed: {}", e),
                }
            }
        }

        let templates = season.templates(date, &weather_info);
        let content = templates
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| format!("{} 논 관리 작업을 진행했습니다.", date));
        truncate_chars(&content, BASIC_MAX_CHARS)
    }

    fn task_request(&self, task: &str, crop: &str, date: Option<NaiveDate>) -> CompletionRequest {
        let prompt = match date {
            Some(date) => format!(
                "{} {} {} 영농인에 대입하여 작성. 작업 영농일지 200자 이내로 작성. 날짜를 정확히 사용하세요.",
                date, crop, task
            ),
            None => format!("{} {} 영농인에 대입하여 작성. 작업 영농일지 200자 이내로 작성", crop, task),
        };
        self.request(prompt)
    }

    fn request(&self, prompt: String) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            system: Some(SYSTEM_PROMPT.to_string()),
            prompt,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}

#[cfg(test)]
#[path = "content_tests.rs"]
mod tests;
