//! crates/wander_persona_core/src/leaderboard.rs
//!
//! Pure rules behind the "other travelers" list and the per-day like toggle.
//! The database adapter fetches rows and applies these functions; nothing in
//! this module performs I/O.

use crate::domain::{ActorKey, LikeMark};
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// Maximum entries returned by the recommend list.
pub const MAX_RECOMMEND_LIST: usize = 15;

/// Destination value stored when a session never produced one.
pub const PLACEHOLDER_DESTINATION: &str = "unknown";

/// How many leading entries are immune to the caller's self-exclusion.
const SELF_EXCLUSION_TOP: usize = 3;

/// One session projected to what the leaderboard needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub id: Uuid,
    #[serde(rename = "recommended_destination")]
    pub destination: String,
    pub likes: i64,
    pub birth_date: NaiveDate,
    pub email: String,
}

/// The caller's own identifiers, used to keep their prior sessions out of
/// their "other travelers" list.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    pub id: Option<Uuid>,
    pub birth_date: Option<NaiveDate>,
    pub email: Option<String>,
}

/// Ranks sessions into the recommend list.
///
/// Placeholder destinations are dropped, duplicate destinations collapse to
/// their highest-like row, the caller's own session id is removed, and the
/// caller's email+birth-date rows are excluded — unless that key already sits
/// in the current top three, in which case it stays. A user's own wildly
/// popular result should still show in their own list.
pub fn rank_top_recommendations(
    mut rows: Vec<LeaderboardRow>,
    filter: &ExclusionFilter,
) -> Vec<LeaderboardRow> {
    rows.sort_by(|a, b| b.likes.cmp(&a.likes));

    let mut list: Vec<LeaderboardRow> = Vec::with_capacity(rows.len());
    for row in rows {
        if row.destination.is_empty() || row.destination == PLACEHOLDER_DESTINATION {
            continue;
        }
        // Input is like-sorted, so the first occurrence of a destination is
        // its highest-like row.
        if list.iter().any(|kept| kept.destination == row.destination) {
            continue;
        }
        list.push(row);
    }

    if let Some(exclude_id) = filter.id {
        list.retain(|row| row.id != exclude_id);
    }

    if let (Some(birth_date), Some(email)) = (filter.birth_date, filter.email.as_deref()) {
        let top_keys: Vec<(NaiveDate, String)> = list
            .iter()
            .take(SELF_EXCLUSION_TOP)
            .map(|row| (row.birth_date, row.email.clone()))
            .collect();
        list.retain(|row| {
            if row.birth_date == birth_date && row.email == email {
                top_keys.contains(&(row.birth_date, row.email.clone()))
            } else {
                true
            }
        });
    }

    list.truncate(MAX_RECOMMEND_LIST);
    list
}

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeToggleOutcome {
    pub liked: bool,
    pub likes: i64,
}

/// Current like state for a destination as seen by one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatus {
    #[serde(rename = "alreadyLiked")]
    pub already_liked: bool,
    pub likes: i64,
}

/// Whether `actor` already holds a like mark for the given day.
pub fn is_liked_on(marks: &[LikeMark], actor: &ActorKey, day: NaiveDate) -> bool {
    marks.iter().any(|mark| mark.matches(actor, day))
}

/// The per-day toggle rule: a mark present for (actor, day) flips to unlike
/// (count floored at zero), otherwise a like is recorded. The caller persists
/// the mutated marks and count atomically.
pub fn apply_like_toggle(
    marks: &mut Vec<LikeMark>,
    likes: i64,
    actor: &ActorKey,
    day: NaiveDate,
) -> LikeToggleOutcome {
    if is_liked_on(marks, actor, day) {
        marks.retain(|mark| !mark.matches(actor, day));
        LikeToggleOutcome {
            liked: false,
            likes: (likes - 1).max(0),
        }
    } else {
        marks.push(LikeMark::new(actor, day));
        LikeToggleOutcome {
            liked: true,
            likes: likes + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    fn row(id: u128, destination: &str, likes: i64, email: &str) -> LeaderboardRow {
        LeaderboardRow {
            id: Uuid::from_u128(id),
            destination: destination.to_string(),
            likes,
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            email: email.to_string(),
        }
    }

    #[test]
    fn duplicate_destinations_keep_the_highest_like_row() {
        let rows = vec![
            row(1, "전라남도 담양", 5, "a@example.com"),
            row(2, "전라남도 담양", 9, "b@example.com"),
            row(3, "경상북도 경주", 3, "c@example.com"),
        ];

        let ranked = rank_top_recommendations(rows, &ExclusionFilter::default());

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].destination, "전라남도 담양");
        assert_eq!(ranked[0].likes, 9);
        assert_eq!(ranked[1].destination, "경상북도 경주");
    }

    #[test]
    fn placeholder_and_empty_destinations_are_dropped() {
        let rows = vec![
            row(1, "unknown", 50, "a@example.com"),
            row(2, "", 40, "b@example.com"),
            row(3, "제주도 서귀포", 1, "c@example.com"),
        ];

        let ranked = rank_top_recommendations(rows, &ExclusionFilter::default());

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].destination, "제주도 서귀포");
    }

    #[test]
    fn own_session_in_the_top_three_survives_exclusion() {
        let mine = "me@example.com";
        let rows = vec![
            row(1, "강원도 속초", 30, "a@example.com"),
            row(2, "전라남도 담양", 20, mine),
            row(3, "경상북도 경주", 10, "c@example.com"),
            row(4, "제주도 서귀포", 5, "d@example.com"),
        ];
        let filter = ExclusionFilter {
            id: None,
            birth_date: Some(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()),
            email: Some(mine.to_string()),
        };

        let ranked = rank_top_recommendations(rows, &filter);

        assert!(ranked.iter().any(|r| r.email == mine), "top-3 entry was dropped");
    }

    #[test]
    fn own_session_outside_the_top_three_is_excluded() {
        let mine = "me@example.com";
        let mut rows: Vec<LeaderboardRow> = (0..9)
            .map(|i| {
                row(
                    i as u128 + 1,
                    &format!("여행지-{i}"),
                    (100 - i) as i64,
                    "other@example.com",
                )
            })
            .collect();
        rows.push(row(99, "전라남도 담양", 1, mine));
        let filter = ExclusionFilter {
            id: None,
            birth_date: Some(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()),
            email: Some(mine.to_string()),
        };

        let ranked = rank_top_recommendations(rows, &filter);

        assert!(ranked.iter().all(|r| r.email != mine));
    }

    #[test]
    fn exclude_id_removes_the_exact_session() {
        let rows = vec![
            row(1, "강원도 속초", 30, "a@example.com"),
            row(2, "전라남도 담양", 20, "b@example.com"),
        ];
        let filter = ExclusionFilter {
            id: Some(Uuid::from_u128(2)),
            ..Default::default()
        };

        let ranked = rank_top_recommendations(rows, &filter);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, Uuid::from_u128(1));
    }

    #[test]
    fn list_is_capped_at_fifteen_entries() {
        let rows: Vec<LeaderboardRow> = (0..25)
            .map(|i| row(i as u128 + 1, &format!("여행지-{i}"), i as i64, "x@example.com"))
            .collect();

        let ranked = rank_top_recommendations(rows, &ExclusionFilter::default());

        assert_eq!(ranked.len(), MAX_RECOMMEND_LIST);
    }

    #[test]
    fn toggle_flips_like_unlike_like_within_one_day() {
        let actor = ActorKey::Ip("203.0.113.9".into());
        let mut marks = Vec::new();

        let first = apply_like_toggle(&mut marks, 4, &actor, day());
        assert_eq!(first, LikeToggleOutcome { liked: true, likes: 5 });

        let second = apply_like_toggle(&mut marks, first.likes, &actor, day());
        assert_eq!(second, LikeToggleOutcome { liked: false, likes: 4 });

        let third = apply_like_toggle(&mut marks, second.likes, &actor, day());
        assert_eq!(third, LikeToggleOutcome { liked: true, likes: 5 });
    }

    #[test]
    fn unlike_never_drives_the_count_negative() {
        let actor = ActorKey::User("user-1".into());
        let mut marks = vec![LikeMark::new(&actor, day())];

        let outcome = apply_like_toggle(&mut marks, 0, &actor, day());

        assert!(!outcome.liked);
        assert_eq!(outcome.likes, 0);
    }

    #[test]
    fn different_days_count_as_fresh_likes() {
        let actor = ActorKey::Ip("203.0.113.9".into());
        let mut marks = Vec::new();
        let tomorrow = day().succ_opt().unwrap();

        apply_like_toggle(&mut marks, 0, &actor, day());
        let outcome = apply_like_toggle(&mut marks, 1, &actor, tomorrow);

        assert!(outcome.liked);
        assert_eq!(outcome.likes, 2);
        assert_eq!(marks.len(), 2);
    }
}
