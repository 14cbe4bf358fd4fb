use std::collections::{HashMap, HashSet};
use tracing::debug;
use uuid::Uuid;

use crate::config::UserScoring;
use crate::models::{RecommendationItem, TopicRef, UserProfile};

const REASON_COLD_START: &str = "Popular user with diverse interests";

/// Recommends users to follow via Jaccard similarity on shared topic sets,
/// with a popularity fallback for requesters that follow no topics.
pub struct UserRecommender {
    scoring: UserScoring,
}

impl Default for UserRecommender {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRecommender {
    pub fn new() -> Self {
        Self::with_config(UserScoring::default())
    }

    pub fn with_config(scoring: UserScoring) -> Self {
        Self { scoring }
    }

    /// Rank candidate users for one requester. The requester and anyone
    /// already followed are excluded; so are candidates without topics.
    pub fn recommend(
        &self,
        user_id: Uuid,
        user_topics: &[TopicRef],
        all_users: &[UserProfile],
        following: &[Uuid],
        limit: usize,
    ) -> Vec<RecommendationItem> {
        let following: HashSet<Uuid> = following.iter().copied().collect();

        let mut items = if !user_topics.is_empty() {
            self.rank_by_similarity(user_id, user_topics, all_users, &following)
        } else if self.scoring.cold_start_fallback {
            self.rank_by_popularity(user_id, all_users, &following)
        } else {
            Vec::new()
        };

        items.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        items.truncate(limit);

        debug!(
            candidate_count = all_users.len(),
            result_count = items.len(),
            "User recommendations scored"
        );

        items
    }

    /// Collaborative filtering on topic sets: Jaccard similarity scaled by
    /// a per-shared-topic bonus.
    fn rank_by_similarity(
        &self,
        user_id: Uuid,
        user_topics: &[TopicRef],
        all_users: &[UserProfile],
        following: &HashSet<Uuid>,
    ) -> Vec<RecommendationItem> {
        let own: HashSet<Uuid> = user_topics.iter().map(|t| t.id).collect();

        let mut items = Vec::new();
        for candidate in all_users {
            if candidate.id == user_id || following.contains(&candidate.id) {
                continue;
            }
            if candidate.topics.is_empty() {
                continue;
            }

            let theirs: HashSet<Uuid> = candidate.topics.iter().map(|t| t.id).collect();
            let shared = own.intersection(&theirs).count();
            if shared == 0 {
                continue;
            }
            let union = own.len() + theirs.len() - shared;
            let similarity = shared as f64 / union as f64;
            let score = similarity * (1.0 + shared as f64 * self.scoring.overlap_bonus);

            items.push(
                RecommendationItem::new(
                    candidate.id,
                    score,
                    format!("{shared} common interests"),
                )
                .with_metrics(HashMap::from([(
                    "common_topics".to_string(),
                    shared as f64,
                )])),
            );
        }
        items
    }

    /// Cold start: surface users with broad topic sets, capped so a huge
    /// topic list cannot dominate.
    fn rank_by_popularity(
        &self,
        user_id: Uuid,
        all_users: &[UserProfile],
        following: &HashSet<Uuid>,
    ) -> Vec<RecommendationItem> {
        let mut items = Vec::new();
        for candidate in all_users {
            if candidate.id == user_id || following.contains(&candidate.id) {
                continue;
            }
            if candidate.topics.is_empty() {
                continue;
            }

            let topic_count = candidate.topics.len() as f64;
            let score = (topic_count * self.scoring.cold_start_topic_weight)
                .min(self.scoring.cold_start_cap);

            items.push(
                RecommendationItem::new(candidate.id, score, REASON_COLD_START).with_metrics(
                    HashMap::from([("topic_count".to_string(), topic_count)]),
                ),
            );
        }
        items
    }
}
