use super::*;
use crate::error::GeneratorError;
use async_trait::async_trait;
use std::sync::Mutex;

struct FailingCompletion;

#[async_trait]
impl TextCompletion for FailingCompletion {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, GeneratorError> {
        Err(GeneratorError::Timeout)
    }
}

/// Returns a fixed reply and records every prompt.
struct FixedCompletion {
    reply: String,
    prompts: Mutex<Vec<CompletionRequest>>,
}

impl FixedCompletion {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<CompletionRequest> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextCompletion for FixedCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GeneratorError> {
        self.prompts.lock().unwrap().push(request);
        Ok(self.reply.clone())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const TASKS: &[&str] = &[
    "파종작업",
    "수확작업",
    "병해충 피해",
    "논갈이(쟁기)작업",
    "알 수 없는 작업",
    "",
];

#[tokio::test]
async fn test_static_text_is_bounded_and_non_empty() {
    let generator = ContentGenerator::new(GeneratorSettings::default());
    for task in TASKS {
        let text = generator.generate(task, "벼", false, None).await;
        assert!(!text.is_empty());
        assert!(text.chars().count() <= 200);
    }
}

#[tokio::test]
async fn test_static_respects_configured_limit() {
    let settings = GeneratorSettings {
        max_chars: 20,
        ..GeneratorSettings::default()
    };
    let generator = ContentGenerator::new(settings);
    let text = generator.generate("수확작업", "벼", false, None).await;
    assert_eq!(text.chars().count(), 20);
    assert!(text.ends_with("..."));
}

#[tokio::test]
async fn test_failing_service_matches_static_output() {
    let failing = ContentGenerator::with_completion(GeneratorSettings::default(), Arc::new(FailingCompletion));
    let plain = ContentGenerator::new(GeneratorSettings::default());

    for task in TASKS {
        for crop in ["벼", "콩"] {
            let fallback = failing.generate(task, crop, true, Some(date(2021, 3, 15))).await;
            let expected = plain.generate(task, crop, false, None).await;
            assert_eq!(fallback, expected);
        }
    }
}

#[tokio::test]
async fn test_external_text_is_truncated() {
    let completion = FixedCompletion::new(&"가".repeat(300));
    let generator = ContentGenerator::with_completion(GeneratorSettings::default(), completion);
    let text = generator.generate("수확작업", "벼", true, None).await;
    assert_eq!(text.chars().count(), 200);
    assert!(text.ends_with("..."));
}

#[tokio::test]
async fn test_external_prompt_carries_date() {
    let completion = FixedCompletion::new("2021-03-15 벼 파종작업을 진행했습니다.");
    let generator = ContentGenerator::with_completion(GeneratorSettings::default(), completion.clone());

    let text = generator.generate("파종작업", "벼", true, Some(date(2021, 3, 15))).await;
    assert_eq!(text, "2021-03-15 벼 파종작업을 진행했습니다.");

    let prompts = completion.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(
        prompts[0].prompt,
        "2021-03-15 벼 파종작업 영농인에 대입하여 작성. 작업 영농일지 200자 이내로 작성. 날짜를 정확히 사용하세요."
    );
    assert_eq!(prompts[0].system.as_deref(), Some(SYSTEM_PROMPT));
    assert_eq!(prompts[0].model, "gpt-4o-mini");
    assert_eq!(prompts[0].max_tokens, 50);
}

#[tokio::test]
async fn test_use_external_false_skips_service() {
    let completion = FixedCompletion::new("원격 내용");
    let generator = ContentGenerator::with_completion(GeneratorSettings::default(), completion.clone());
    let text = generator.generate("파종작업", "벼", false, None).await;
    assert_eq!(text, template_for("파종작업", "벼"));
    assert!(completion.prompts().is_empty());
}

#[test]
fn test_from_config_without_key_is_static() {
    let config = GeneratorConfig {
        api_key: Some("   ".to_string()),
        ..GeneratorConfig::default()
    };
    let generator = ContentGenerator::from_config(&config);
    assert!(!generator.external_enabled());

    let config = GeneratorConfig {
        api_key: Some("sk-test".to_string()),
        ..GeneratorConfig::default()
    };
    assert!(ContentGenerator::from_config(&config).external_enabled());
}

#[tokio::test]
async fn test_basic_content_is_seasonal_and_short() {
    let generator = ContentGenerator::new(GeneratorSettings::default());
    let day = date(2021, 7, 12);
    let text = generator.generate_basic(day, None).await;

    assert!(text.starts_with("2021-07-12 여름철 논 관리."));
    assert!(text.chars().count() <= 100);
    let candidates: Vec<_> = Season::Summer
        .templates(day, "")
        .iter()
        .map(|t| truncate_chars(t, 100))
        .collect();
    assert!(candidates.contains(&text));
}

#[tokio::test]
async fn test_basic_content_includes_weather() {
    let generator = ContentGenerator::new(GeneratorSettings::default());
    let weather = Weather {
        condition: "흐림".to_string(),
        low: "1".to_string(),
        high: "7".to_string(),
        rainfall: None,
        humidity: None,
    };
    let text = generator.generate_basic(date(2021, 12, 6), Some(&weather)).await;
    assert!(text.contains("날씨는 흐림이고 기온은 1°C~7°C입니다."));
}

#[tokio::test]
async fn test_basic_short_reply_is_rejected() {
    let completion = FixedCompletion::new("논 관리");
    let generator = ContentGenerator::with_completion(GeneratorSettings::default(), completion.clone());
    let text = generator.generate_basic(date(2021, 4, 5), None).await;

    assert!(text.starts_with("2021-04-05 봄철 논 관리."));
    let prompts = completion.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].prompt.contains("다양한 봄철 논 관리 활동을 100자 이내로 작성해주세요."));
}

#[tokio::test]
async fn test_basic_long_reply_is_accepted() {
    let reply = "2021-04-05 봄철 논 관리로 논둑을 정비하고 배수로를 점검했습니다.";
    let generator = ContentGenerator::with_completion(GeneratorSettings::default(), FixedCompletion::new(reply));
    assert_eq!(generator.generate_basic(date(2021, 4, 5), None).await, reply);
}
