//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use wander_persona_core::domain::{ActorKey, Branding, LikeMark, StoredSession};
use wander_persona_core::leaderboard::{
    self, LeaderboardRow, LikeStatus, LikeToggleOutcome,
};
use wander_persona_core::ports::{DatabaseService, LikeLookup, PortError, PortResult};

/// Sentinel identity stored on like-created placeholder sessions.
const ANONYMOUS_EMAIL: &str = "anonymous@wanderpersona.com";
const ANONYMOUS_BIRTH_DATE: (i32, u32, u32) = (1990, 1, 1);

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn anonymous_birth_date() -> NaiveDate {
    let (y, m, d) = ANONYMOUS_BIRTH_DATE;
    NaiveDate::from_ymd_opt(y, m, d).expect("static date")
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct SessionRecord {
    id: Uuid,
    email: String,
    birth_date: NaiveDate,
    quiz_answers: serde_json::Value,
    ai_result: serde_json::Value,
    recommended_destination: String,
    image_url: Option<String>,
    ip: Option<String>,
    location: Option<String>,
    likes: i64,
    liked_ips: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl SessionRecord {
    fn to_domain(self) -> StoredSession {
        StoredSession {
            id: self.id,
            email: self.email,
            birth_date: self.birth_date,
            quiz_answers: serde_json::from_value(self.quiz_answers).unwrap_or_default(),
            ai_result: self.ai_result,
            recommended_destination: self.recommended_destination,
            image_url: self.image_url,
            ip: self.ip,
            location: self.location,
            likes: self.likes,
            liked_by: serde_json::from_value(self.liked_ips).unwrap_or_default(),
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct LikeRecord {
    id: Uuid,
    likes: i64,
    liked_ips: serde_json::Value,
}

#[derive(FromRow)]
struct LeaderboardRecord {
    id: Uuid,
    recommended_destination: String,
    likes: i64,
    birth_date: NaiveDate,
    email: String,
}

impl LeaderboardRecord {
    fn to_domain(self) -> LeaderboardRow {
        LeaderboardRow {
            id: self.id,
            destination: self.recommended_destination,
            likes: self.likes,
            birth_date: self.birth_date,
            email: self.email,
        }
    }
}

#[derive(FromRow)]
struct BrandingRecord {
    title: String,
    image_url: String,
    created_at: DateTime<Utc>,
}

impl BrandingRecord {
    fn to_domain(self) -> Branding {
        Branding {
            title: self.title,
            image_url: self.image_url,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn insert_session(&self, session: StoredSession) -> PortResult<()> {
        let quiz_answers =
            serde_json::to_value(&session.quiz_answers).unwrap_or_else(|_| serde_json::json!([]));
        let liked_by =
            serde_json::to_value(&session.liked_by).unwrap_or_else(|_| serde_json::json!([]));

        sqlx::query(
            "INSERT INTO result_sessions \
             (id, email, birth_date, quiz_answers, ai_result, recommended_destination, \
              image_url, ip, location, likes, liked_ips, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(session.id)
        .bind(&session.email)
        .bind(session.birth_date)
        .bind(quiz_answers)
        .bind(&session.ai_result)
        .bind(&session.recommended_destination)
        .bind(&session.image_url)
        .bind(&session.ip)
        .bind(&session.location)
        .bind(session.likes)
        .bind(liked_by)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn get_session_by_id(&self, session_id: Uuid) -> PortResult<StoredSession> {
        let record = sqlx::query_as::<_, SessionRecord>(
            "SELECT id, email, birth_date, quiz_answers, ai_result, recommended_destination, \
             image_url, ip, location, likes, liked_ips, created_at \
             FROM result_sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Session {} not found", session_id))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn update_session_image_by_email(
        &self,
        email: &str,
        image_url: &str,
    ) -> PortResult<()> {
        sqlx::query("UPDATE result_sessions SET image_url = $1 WHERE email = $2")
            .bind(image_url)
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn toggle_like(
        &self,
        destination: &str,
        lookup: &LikeLookup,
        actor: &ActorKey,
        day: NaiveDate,
    ) -> PortResult<LikeToggleOutcome> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        // The row lock serializes concurrent toggles for the same session, so
        // the read-modify-write below cannot lose updates.
        let existing = match (&lookup.user_id, &lookup.email, lookup.birth_date) {
            (Some(user_id), _, _) => {
                let session_id = Uuid::parse_str(user_id).ok();
                sqlx::query_as::<_, LikeRecord>(
                    "SELECT id, likes, liked_ips FROM result_sessions \
                     WHERE recommended_destination = $1 AND id = $2 \
                     LIMIT 1 FOR UPDATE",
                )
                .bind(destination)
                .bind(session_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(unexpected)?
            }
            (None, Some(email), Some(birth_date)) => sqlx::query_as::<_, LikeRecord>(
                "SELECT id, likes, liked_ips FROM result_sessions \
                 WHERE recommended_destination = $1 AND email = $2 AND birth_date = $3 \
                 LIMIT 1 FOR UPDATE",
            )
            .bind(destination)
            .bind(email)
            .bind(birth_date)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?,
            _ => sqlx::query_as::<_, LikeRecord>(
                "SELECT id, likes, liked_ips FROM result_sessions \
                 WHERE recommended_destination = $1 \
                 LIMIT 1 FOR UPDATE",
            )
            .bind(destination)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?,
        };

        let outcome = match existing {
            Some(record) => {
                let mut marks: Vec<LikeMark> =
                    serde_json::from_value(record.liked_ips).unwrap_or_default();
                let outcome =
                    leaderboard::apply_like_toggle(&mut marks, record.likes, actor, day);
                let marks_json =
                    serde_json::to_value(&marks).unwrap_or_else(|_| serde_json::json!([]));

                sqlx::query("UPDATE result_sessions SET likes = $1, liked_ips = $2 WHERE id = $3")
                    .bind(outcome.likes)
                    .bind(marks_json)
                    .bind(record.id)
                    .execute(&mut *tx)
                    .await
                    .map_err(unexpected)?;
                outcome
            }
            None => {
                // First like on a destination nobody stored yet: create an
                // anonymous placeholder session carrying the count.
                let mark = LikeMark::new(actor, day);
                let marks_json =
                    serde_json::to_value(vec![&mark]).unwrap_or_else(|_| serde_json::json!([]));
                let ip = match actor {
                    ActorKey::Ip(ip) => Some(ip.clone()),
                    ActorKey::User(_) => None,
                };

                sqlx::query(
                    "INSERT INTO result_sessions \
                     (id, email, birth_date, quiz_answers, ai_result, recommended_destination, \
                      ip, likes, liked_ips, created_at) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
                )
                .bind(Uuid::new_v4())
                .bind(ANONYMOUS_EMAIL)
                .bind(anonymous_birth_date())
                .bind(serde_json::json!([]))
                .bind(serde_json::json!({ "destination": destination }))
                .bind(destination)
                .bind(ip)
                .bind(1_i64)
                .bind(marks_json)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await
                .map_err(unexpected)?;

                LikeToggleOutcome { liked: true, likes: 1 }
            }
        };

        tx.commit().await.map_err(unexpected)?;
        Ok(outcome)
    }

    async fn like_status(
        &self,
        destination: &str,
        actor: &ActorKey,
        day: NaiveDate,
    ) -> PortResult<LikeStatus> {
        let record = sqlx::query_as::<_, LikeRecord>(
            "SELECT id, likes, liked_ips FROM result_sessions \
             WHERE recommended_destination = $1 LIMIT 1",
        )
        .bind(destination)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(match record {
            Some(record) => {
                let marks: Vec<LikeMark> =
                    serde_json::from_value(record.liked_ips).unwrap_or_default();
                LikeStatus {
                    already_liked: leaderboard::is_liked_on(&marks, actor, day),
                    likes: record.likes,
                }
            }
            None => LikeStatus { already_liked: false, likes: 0 },
        })
    }

    async fn list_sessions_by_likes(&self) -> PortResult<Vec<LeaderboardRow>> {
        let records = sqlx::query_as::<_, LeaderboardRecord>(
            "SELECT id, recommended_destination, likes, birth_date, email \
             FROM result_sessions ORDER BY likes DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn latest_branding(&self) -> PortResult<Option<Branding>> {
        let record = sqlx::query_as::<_, BrandingRecord>(
            "SELECT title, image_url, created_at FROM travel_destination \
             ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(record.map(|r| r.to_domain()))
    }

    async fn insert_branding(&self, branding: Branding) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO travel_destination (id, title, image_url, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(&branding.title)
        .bind(&branding.image_url)
        .bind(branding.created_at)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }
}
