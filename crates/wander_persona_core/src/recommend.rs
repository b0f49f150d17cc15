//! crates/wander_persona_core/src/recommend.rs
//!
//! The recommendation orchestrator: one text-generation call under the
//! destination schema, output normalization, then an independently
//! fault-tolerant image-generation call. Text failure fails the whole
//! request; image failure degrades to the fixed placeholder.

use crate::domain::{
    DestinationDetails, Recommendation, RecommendationKind, RecommendationRequest,
    RecommendationResult,
};
use crate::ports::{
    DestinationGenerationService, ImageGenerationService, PortError, PortResult,
};
use crate::prompt::DestinationPromptInput;
use crate::settings::SettingsCache;
use std::sync::Arc;
use tracing::warn;

/// Served when image generation yields nothing usable.
pub const FALLBACK_IMAGE_URL: &str = "/default-image.png";

/// Substituted when the model leaves a venue description empty.
pub const EMPTY_DESCRIPTION: &str = "설명 없음";

/// Substituted when the model returns no budget text.
pub const EMPTY_BUDGET: &str = "정보 없음";

/// Coordinates the two-stage generation pipeline over the configured ports.
pub struct RecommendationEngine {
    settings: Arc<SettingsCache>,
    text: Arc<dyn DestinationGenerationService>,
    image: Arc<dyn ImageGenerationService>,
}

impl RecommendationEngine {
    pub fn new(
        settings: Arc<SettingsCache>,
        text: Arc<dyn DestinationGenerationService>,
        image: Arc<dyn ImageGenerationService>,
    ) -> Self {
        Self { settings, text, image }
    }

    /// Produces one immutable recommendation for the request.
    ///
    /// The text call runs exactly once, with no retry; any failure there (or
    /// unavailable settings) aborts the request. The subsequent image call is
    /// allowed to fail silently. Nothing here persists anything — saving the
    /// result is the caller's separate step.
    pub async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> PortResult<RecommendationResult> {
        let settings = self.settings.get().await?;
        if settings.text_model.trim().is_empty() {
            return Err(PortError::Configuration(
                "no text model configured".to_string(),
            ));
        }

        let input = DestinationPromptInput {
            physical: request.biorhythm.physical,
            emotional: request.biorhythm.emotional,
            intellectual: request.biorhythm.intellectual,
            perceptual: request.biorhythm.perceptual,
            quiz_answers: request.quiz_answers.clone(),
            popularity: String::new(),
            location: request.location_label.clone(),
        };

        let mut details = self.text.generate_destination(&settings, &input).await?;
        normalize_details(&mut details);
        validate_recommendations(&details.recommendations)?;

        let image_url = match self.image.generate_image(&settings, &details.image_prompt).await {
            Ok(Some(media)) if !media.url.is_empty() => media.url,
            Ok(_) => {
                warn!(destination = %details.destination_name, "image generation returned no media, using placeholder");
                FALLBACK_IMAGE_URL.to_string()
            }
            Err(error) => {
                warn!(destination = %details.destination_name, %error, "image generation failed, using placeholder");
                FALLBACK_IMAGE_URL.to_string()
            }
        };

        Ok(RecommendationResult {
            persona_title: details.persona_title,
            destination_name: details.destination_name,
            image_url,
            analysis: details.analysis,
            recommendations: details.recommendations,
            budget: details.budget,
            transport: details.transport,
            tip: details.tip,
            popularity: details.popularity,
        })
    }
}

/// Post-processing normalization applied before validation: blank venue
/// descriptions get the fixed placeholder, preference scores are clamped to
/// [0, 1], and an absent budget becomes the fixed "no information" string.
fn normalize_details(details: &mut DestinationDetails) {
    for recommendation in &mut details.recommendations {
        if recommendation.description.trim().is_empty() {
            recommendation.description = EMPTY_DESCRIPTION.to_string();
        }
        if let Some(score) = recommendation.preference_score {
            recommendation.preference_score = Some(score.clamp(0.0, 1.0));
        }
    }
    if details.budget.trim().is_empty() {
        details.budget = EMPTY_BUDGET.to_string();
    }
}

/// Enforces the exactly-3/one-per-kind invariant. A violation is treated like
/// any other malformed model output and aborts the request.
fn validate_recommendations(recommendations: &[Recommendation]) -> PortResult<()> {
    if recommendations.len() != 3 {
        return Err(PortError::SchemaViolation(format!(
            "expected 3 recommendations, got {}",
            recommendations.len()
        )));
    }
    for kind in [
        RecommendationKind::Lodging,
        RecommendationKind::Food,
        RecommendationKind::Attraction,
    ] {
        let count = recommendations.iter().filter(|r| r.kind == kind).count();
        if count != 1 {
            return Err(PortError::SchemaViolation(format!(
                "expected exactly one {kind:?} recommendation, got {count}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biorhythm;
    use crate::domain::{AdminSettings, GeneratedMedia};
    use crate::ports::AdminSettingsSource;
    use crate::settings::SystemClock;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    struct StaticSource;

    #[async_trait]
    impl AdminSettingsSource for StaticSource {
        async fn fetch(&self) -> PortResult<AdminSettings> {
            Ok(AdminSettings {
                text_model: "googleai/gemini-2.0-flash".into(),
                text_model_api_key: "key".into(),
                image_model: "googleai/gemini-2.0-flash-preview-image-generation".into(),
                image_model_api_key: String::new(),
                title: String::new(),
                image_url: String::new(),
            })
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl AdminSettingsSource for BrokenSource {
        async fn fetch(&self) -> PortResult<AdminSettings> {
            Err(PortError::Configuration("settings unavailable".into()))
        }
    }

    struct StubText {
        response: Mutex<Option<PortResult<DestinationDetails>>>,
    }

    impl StubText {
        fn returning(details: DestinationDetails) -> Arc<Self> {
            Arc::new(Self { response: Mutex::new(Some(Ok(details))) })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(Some(Err(PortError::Unexpected("model call failed".into())))),
            })
        }
    }

    #[async_trait]
    impl DestinationGenerationService for StubText {
        async fn generate_destination(
            &self,
            _settings: &AdminSettings,
            _input: &DestinationPromptInput,
        ) -> PortResult<DestinationDetails> {
            self.response
                .lock()
                .unwrap()
                .take()
                .expect("text port called more than once")
        }
    }

    struct StubImage {
        response: PortResult<Option<GeneratedMedia>>,
        called: AtomicBool,
    }

    impl StubImage {
        fn returning_url(url: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(Some(GeneratedMedia { url: url.to_string() })),
                called: AtomicBool::new(false),
            })
        }

        fn empty() -> Arc<Self> {
            Arc::new(Self { response: Ok(None), called: AtomicBool::new(false) })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: Err(PortError::Unexpected("image call failed".into())),
                called: AtomicBool::new(false),
            })
        }

        fn was_called(&self) -> bool {
            self.called.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageGenerationService for StubImage {
        async fn generate_image(
            &self,
            _settings: &AdminSettings,
            _prompt: &str,
        ) -> PortResult<Option<GeneratedMedia>> {
            self.called.store(true, Ordering::SeqCst);
            match &self.response {
                Ok(Some(media)) => Ok(Some(GeneratedMedia { url: media.url.clone() })),
                Ok(None) => Ok(None),
                Err(PortError::Unexpected(message)) => {
                    Err(PortError::Unexpected(message.clone()))
                }
                Err(_) => Err(PortError::Unexpected("unreachable".into())),
            }
        }
    }

    fn engine(
        text: Arc<dyn DestinationGenerationService>,
        image: Arc<dyn ImageGenerationService>,
    ) -> RecommendationEngine {
        let cache = Arc::new(SettingsCache::new(Arc::new(StaticSource), Arc::new(SystemClock)));
        RecommendationEngine::new(cache, text, image)
    }

    fn venue(kind: RecommendationKind, name: &str, description: &str) -> Recommendation {
        Recommendation {
            kind,
            name: name.to_string(),
            description: description.to_string(),
            address: "전라남도 담양군 담양읍 1".to_string(),
            preference_score: Some(0.9),
        }
    }

    fn details() -> DestinationDetails {
        DestinationDetails {
            persona_title: "감성 힐링가".into(),
            destination_name: "전라남도 담양".into(),
            analysis: "대나무 숲과 호수가 어우러진 고장입니다.".into(),
            recommendations: vec![
                venue(RecommendationKind::Lodging, "담양 한옥스테이", "고즈넉한 한옥 숙소"),
                venue(RecommendationKind::Food, "담양국수거리", "대통밥과 국수"),
                venue(RecommendationKind::Attraction, "죽녹원", "대나무숲 산책로"),
            ],
            budget: "숙박: 120,000원\n총 1박 기준: 180,000원".into(),
            transport: "비행: 해당 없음\n시내: 시외버스".into(),
            tip: "아침 일찍 방문하세요.".into(),
            image_prompt: "A cinematic photo of the Juknokwon bamboo forest".into(),
            popularity: "Tripadvisor 4.6/5".into(),
        }
    }

    fn request() -> RecommendationRequest {
        let birth = NaiveDate::from_ymd_opt(1992, 7, 21).unwrap();
        let target = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        RecommendationRequest {
            birth_date: birth,
            quiz_answers: vec!["완전한 휴식과 스트레스 해소".into()],
            biorhythm: biorhythm::compute(birth, target),
            location_label: "전라남도 - 순천시".into(),
        }
    }

    #[tokio::test]
    async fn image_failure_still_yields_a_complete_result() {
        let image = StubImage::failing();
        let engine = engine(StubText::returning(details()), image.clone());

        let result = engine.recommend(&request()).await.unwrap();

        assert!(image.was_called());
        assert_eq!(result.image_url, FALLBACK_IMAGE_URL);
        assert_eq!(result.destination_name, "전라남도 담양");
        assert_eq!(result.recommendations.len(), 3);
    }

    #[tokio::test]
    async fn missing_media_url_falls_back_to_the_placeholder() {
        let engine = engine(StubText::returning(details()), StubImage::empty());

        let result = engine.recommend(&request()).await.unwrap();

        assert_eq!(result.image_url, FALLBACK_IMAGE_URL);
    }

    #[tokio::test]
    async fn successful_image_url_is_passed_through() {
        let engine = engine(
            StubText::returning(details()),
            StubImage::returning_url("data:image/png;base64,QUJD"),
        );

        let result = engine.recommend(&request()).await.unwrap();

        assert_eq!(result.image_url, "data:image/png;base64,QUJD");
    }

    #[tokio::test]
    async fn text_failure_aborts_without_touching_the_image_stage() {
        let image = StubImage::returning_url("https://example.com/image.png");
        let engine = engine(StubText::failing(), image.clone());

        let error = engine.recommend(&request()).await.unwrap_err();

        assert!(matches!(error, PortError::Unexpected(_)));
        assert!(!image.was_called());
    }

    #[tokio::test]
    async fn unavailable_settings_are_fatal() {
        let cache = Arc::new(SettingsCache::new(Arc::new(BrokenSource), Arc::new(SystemClock)));
        let engine = RecommendationEngine::new(
            cache,
            StubText::returning(details()),
            StubImage::empty(),
        );

        let error = engine.recommend(&request()).await.unwrap_err();

        assert!(matches!(error, PortError::Configuration(_)));
    }

    #[tokio::test]
    async fn blank_descriptions_get_the_fixed_placeholder() {
        let mut input = details();
        input.recommendations[1].description = "  ".into();
        let engine = engine(StubText::returning(input), StubImage::empty());

        let result = engine.recommend(&request()).await.unwrap();

        assert_eq!(result.recommendations[1].description, EMPTY_DESCRIPTION);
    }

    #[tokio::test]
    async fn missing_budget_defaults_to_no_information() {
        let mut input = details();
        input.budget = String::new();
        let engine = engine(StubText::returning(input), StubImage::empty());

        let result = engine.recommend(&request()).await.unwrap();

        assert_eq!(result.budget, EMPTY_BUDGET);
    }

    #[tokio::test]
    async fn out_of_range_preference_scores_are_clamped() {
        let mut input = details();
        input.recommendations[0].preference_score = Some(1.7);
        let engine = engine(StubText::returning(input), StubImage::empty());

        let result = engine.recommend(&request()).await.unwrap();

        assert_eq!(result.recommendations[0].preference_score, Some(1.0));
    }

    #[tokio::test]
    async fn wrong_recommendation_count_is_a_schema_violation() {
        let mut input = details();
        input.recommendations.pop();
        let engine = engine(StubText::returning(input), StubImage::empty());

        let error = engine.recommend(&request()).await.unwrap_err();

        assert!(matches!(error, PortError::SchemaViolation(_)));
    }

    #[tokio::test]
    async fn duplicate_kinds_are_a_schema_violation() {
        let mut input = details();
        input.recommendations[2] =
            venue(RecommendationKind::Food, "두 번째 맛집", "중복 카테고리");
        let engine = engine(StubText::returning(input), StubImage::empty());

        let error = engine.recommend(&request()).await.unwrap_err();

        assert!(matches!(error, PortError::SchemaViolation(_)));
    }
}
