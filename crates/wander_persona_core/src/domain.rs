//! crates/wander_persona_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or HTTP framework; the serde
//! attributes pin the wire shape shared with the generative model and the
//! stored `ai_result` payload.

use crate::biorhythm::BiorhythmReading;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything the orchestrator needs to produce one recommendation.
/// Constructed once per quiz session; immutable thereafter.
#[derive(Debug, Clone)]
pub struct RecommendationRequest {
    pub birth_date: NaiveDate,
    /// Free-text answer labels in question order, exactly as the user chose them.
    pub quiz_answers: Vec<String>,
    pub biorhythm: BiorhythmReading,
    /// Human-readable departure location ("전라남도 - 순천시" style); may be empty.
    pub location_label: String,
}

/// The category tag of a single venue recommendation.
///
/// Wire labels are the Korean strings the model is instructed to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationKind {
    #[serde(rename = "숙소")]
    Lodging,
    #[serde(rename = "맛집")]
    Food,
    #[serde(rename = "명소")]
    Attraction,
}

/// One recommended venue inside the destination (lodging, food, or attraction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
    #[serde(rename = "preferenceScore", skip_serializing_if = "Option::is_none")]
    pub preference_score: Option<f64>,
}

/// The structured output of the text-generation stage, before the image stage
/// runs. `image_prompt` only exists here; it is consumed by stage two and
/// never surfaces in the final result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationDetails {
    pub persona_title: String,
    pub destination_name: String,
    pub analysis: String,
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub budget: String,
    pub transport: String,
    pub tip: String,
    pub image_prompt: String,
    pub popularity: String,
}

/// A generated media object exposing a usable URL (remote or data URI).
#[derive(Debug, Clone)]
pub struct GeneratedMedia {
    pub url: String,
}

/// The assembled, immutable recommendation handed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub persona_title: String,
    pub destination_name: String,
    pub image_url: String,
    pub analysis: String,
    pub recommendations: Vec<Recommendation>,
    pub budget: String,
    pub transport: String,
    pub tip: String,
    pub popularity: String,
}

impl RecommendationResult {
    /// The newline-delimited budget categories plus the final "총 1박 기준"
    /// total, in original order. Presentation renders one line per entry.
    pub fn budget_lines(&self) -> Vec<&str> {
        split_text_lines(&self.budget)
    }

    /// The 비행/시내 transport line pair.
    pub fn transport_lines(&self) -> Vec<&str> {
        split_text_lines(&self.transport)
    }

    /// Individual travel tips, one per line.
    pub fn tip_lines(&self) -> Vec<&str> {
        split_text_lines(&self.tip)
    }
}

/// Splits a multi-line model field into trimmed, non-empty lines in order.
pub fn split_text_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// The identity used for like-toggle deduplication: an authenticated user id
/// when a bearer token verified, otherwise the caller's IP address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorKey {
    User(String),
    Ip(String),
}

/// One per-day like marker stored alongside a session.
///
/// The untagged representation matches the stored JSON:
/// `{"user_id": "...", "date": "2026-08-06"}` or `{"ip": "...", "date": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LikeMark {
    User { user_id: String, date: NaiveDate },
    Ip { ip: String, date: NaiveDate },
}

impl LikeMark {
    pub fn new(actor: &ActorKey, date: NaiveDate) -> Self {
        match actor {
            ActorKey::User(user_id) => LikeMark::User {
                user_id: user_id.clone(),
                date,
            },
            ActorKey::Ip(ip) => LikeMark::Ip {
                ip: ip.clone(),
                date,
            },
        }
    }

    pub fn matches(&self, actor: &ActorKey, on: NaiveDate) -> bool {
        match (self, actor) {
            (LikeMark::User { user_id, date }, ActorKey::User(id)) => {
                user_id == id && *date == on
            }
            (LikeMark::Ip { ip, date }, ActorKey::Ip(addr)) => ip == addr && *date == on,
            _ => false,
        }
    }
}

/// A persisted recommendation session: the request, the result, and the
/// like bookkeeping. Only `likes`/`liked_by` (like toggle) and `image_url`
/// (post-upload rewrite) ever change after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: Uuid,
    pub email: String,
    pub birth_date: NaiveDate,
    pub quiz_answers: Vec<String>,
    /// The full `RecommendationResult` as JSON, exactly as returned to the user.
    pub ai_result: serde_json::Value,
    /// The destination name extracted from `ai_result`; "unknown" when absent.
    pub recommended_destination: String,
    pub image_url: Option<String>,
    pub ip: Option<String>,
    pub location: Option<String>,
    pub likes: i64,
    #[serde(rename = "liked_ips")]
    pub liked_by: Vec<LikeMark>,
    pub created_at: DateTime<Utc>,
}

/// AI configuration plus branding, sourced from process configuration and
/// cached for five minutes (see `settings::SettingsCache`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSettings {
    pub text_model: String,
    #[serde(rename = "text_model_apikey")]
    pub text_model_api_key: String,
    pub image_model: String,
    #[serde(rename = "image_model_apikey")]
    pub image_model_api_key: String,
    pub title: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// The admin-configured branding record; the newest row wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branding {
    pub title: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_line_contract_preserves_order_and_count() {
        let result = RecommendationResult {
            persona_title: "감성 힐링가".into(),
            destination_name: "전라남도 담양".into(),
            image_url: "/default-image.png".into(),
            analysis: String::new(),
            recommendations: Vec::new(),
            budget: "숙박: 120,000원\n식비: 45,000원\n액티비티: 30,000원\n교통비: 25,000원\n기타: 10,000원\n총 1박 기준: 230,000원"
                .into(),
            transport: "비행: 해당 없음\n시내: 시외버스 이용".into(),
            tip: "죽녹원은 아침 일찍 방문하세요.\n메타세쿼이아길은 자전거 대여가 편리합니다.\n주말에는 주차장이 혼잡합니다.".into(),
            popularity: String::new(),
        };

        let lines = result.budget_lines();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("숙박"));
        assert!(lines[5].starts_with("총 1박 기준"));
        assert_eq!(result.transport_lines().len(), 2);
        assert_eq!(result.tip_lines().len(), 3);
    }

    #[test]
    fn like_mark_matches_only_same_actor_and_day() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let other_day = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let actor = ActorKey::Ip("203.0.113.9".into());
        let mark = LikeMark::new(&actor, day);

        assert!(mark.matches(&actor, day));
        assert!(!mark.matches(&actor, other_day));
        assert!(!mark.matches(&ActorKey::Ip("198.51.100.1".into()), day));
        assert!(!mark.matches(&ActorKey::User("203.0.113.9".into()), day));
    }

    #[test]
    fn recommendation_kind_uses_korean_wire_labels() {
        let json = serde_json::to_string(&RecommendationKind::Lodging).unwrap();
        assert_eq!(json, "\"숙소\"");
        let parsed: RecommendationKind = serde_json::from_str("\"맛집\"").unwrap();
        assert_eq!(parsed, RecommendationKind::Food);
    }
}
