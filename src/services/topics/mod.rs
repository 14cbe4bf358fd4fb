use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use crate::config::{ActivityWeights, TopicScoring};
use crate::models::{ActivityEvent, RecommendationItem, TopicRef};
use crate::services::signals::SignalAggregator;
use crate::utils::text_similarity;

const REASON_ACTIVITY: &str = "Based on your activity and interests";
const REASON_COLD_START: &str = "Popular topic for new users";

/// Recommends topics the user does not follow yet, blending aggregated
/// activity signals with a lexical-similarity boost against the names of
/// already-followed topics.
pub struct TopicRecommender {
    scoring: TopicScoring,
    signals: SignalAggregator,
}

impl Default for TopicRecommender {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicRecommender {
    pub fn new() -> Self {
        Self::with_config(TopicScoring::default(), ActivityWeights::default())
    }

    pub fn with_config(scoring: TopicScoring, activity: ActivityWeights) -> Self {
        Self {
            scoring,
            signals: SignalAggregator::with_weights(activity),
        }
    }

    /// Rank candidate topics for one user.
    ///
    /// Topics scoring zero are dropped from the primary result. When
    /// nothing scores (no activity, no similar names) every not-yet-followed
    /// topic is offered at a flat cold-start score instead.
    pub fn recommend(
        &self,
        user_topics: &[TopicRef],
        user_activity: &[ActivityEvent],
        all_topics: &[TopicRef],
        limit: usize,
    ) -> Vec<RecommendationItem> {
        let followed: HashSet<Uuid> = user_topics.iter().map(|t| t.id).collect();
        let activity_weights = self.signals.aggregate(user_activity);

        let mut items: Vec<RecommendationItem> = Vec::new();
        for topic in all_topics {
            if followed.contains(&topic.id) {
                continue;
            }

            let mut score = activity_weights.get(&topic.id).copied().unwrap_or(0.0);
            for followed_topic in user_topics {
                if text_similarity(&followed_topic.name, &topic.name)
                    > self.scoring.similarity_threshold
                {
                    score += self.scoring.similarity_boost;
                }
            }

            if score > 0.0 {
                items.push(RecommendationItem::new(topic.id, score, REASON_ACTIVITY));
            }
        }

        if items.is_empty() {
            items = all_topics
                .iter()
                .filter(|t| !followed.contains(&t.id))
                .map(|t| {
                    RecommendationItem::new(t.id, self.scoring.cold_start_score, REASON_COLD_START)
                })
                .collect();
        }

        // Stable sort: equal scores keep the input topic order
        items.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        items.truncate(limit);

        debug!(
            candidate_count = all_topics.len(),
            result_count = items.len(),
            "Topic recommendations scored"
        );

        items
    }
}
