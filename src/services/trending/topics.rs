use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::TrendingTopicScoring;
use crate::models::{RankStats, RecommendationItem, TopicMetrics};

const REASON_TRENDING: &str = "Trending topic";

/// Ranks topics by a log-scaled blend of engagement and velocity, boosted
/// by user growth. Input topics are pre-filtered upstream to those with at
/// least one post.
pub struct TrendingTopicsScorer {
    scoring: TrendingTopicScoring,
}

impl Default for TrendingTopicsScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrendingTopicsScorer {
    pub fn new() -> Self {
        Self::with_config(TrendingTopicScoring::default())
    }

    pub fn with_config(scoring: TrendingTopicScoring) -> Self {
        Self { scoring }
    }

    /// Score and rank a batch of topics. A malformed record is skipped and
    /// counted, never allowed to abort the batch.
    pub fn rank(
        &self,
        topics: &[TopicMetrics],
        limit: usize,
    ) -> (Vec<RecommendationItem>, RankStats) {
        let mut stats = RankStats::default();
        let mut items: Vec<RecommendationItem> = Vec::new();

        for topic in topics {
            match self.score_topic(topic) {
                Some(item) => items.push(item),
                None => stats.skipped += 1,
            }
        }

        stats.scored = items.len();
        items.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        items.truncate(limit);

        info!(
            scored = stats.scored,
            skipped = stats.skipped,
            "Trending topics ranked"
        );

        (items, stats)
    }

    fn score_topic(&self, topic: &TopicMetrics) -> Option<RecommendationItem> {
        let counters = [
            topic.user_count,
            topic.post_count,
            topic.total_likes,
            topic.total_comments,
            topic.total_views,
        ];
        if counters.iter().any(|&c| c < 0) {
            warn!(topic_id = %topic.id, "Skipping trending topic with negative counters");
            return None;
        }

        let users = topic.user_count as f64;
        let posts = topic.post_count as f64;
        let likes = topic.total_likes as f64;
        let comments = topic.total_comments as f64;
        let views = topic.total_views as f64;

        let engagement =
            likes + comments * self.scoring.comment_weight + views * self.scoring.view_weight;
        let velocity = posts * self.scoring.post_velocity_weight
            + users * self.scoring.user_velocity_weight;

        let mut score = engagement.ln_1p() * self.scoring.engagement_share
            + velocity.ln_1p() * self.scoring.velocity_share;

        if users > 0.0 {
            let growth_factor = (users / self.scoring.growth_user_scale).min(1.0);
            score *= 1.0 + growth_factor * self.scoring.growth_boost;
        }

        let metrics = HashMap::from([
            ("users".to_string(), users),
            ("posts".to_string(), posts),
            ("likes".to_string(), likes),
            ("comments".to_string(), comments),
            ("views".to_string(), views),
            ("engagement".to_string(), engagement),
        ]);

        Some(RecommendationItem::new(topic.id, score, REASON_TRENDING).with_metrics(metrics))
    }
}
