use serde::Deserialize;

use crate::error::{EngineError, Result};
use crate::models::ActivityKind;

/// Per-event-type weights for activity signal aggregation.
#[derive(Debug, Clone)]
pub struct ActivityWeights {
    pub view_post: f64,
    pub like: f64,
    pub bookmark: f64,
    pub comment: f64,
    pub follow: f64,
    /// Applied to event types the engine does not recognize.
    pub fallback: f64,
}

impl Default for ActivityWeights {
    fn default() -> Self {
        Self {
            view_post: 0.5,
            like: 1.0,
            bookmark: 1.5,
            comment: 1.2,
            follow: 2.0,
            fallback: 0.5,
        }
    }
}

impl ActivityWeights {
    pub fn weight_for(&self, kind: ActivityKind) -> f64 {
        match kind {
            ActivityKind::ViewPost => self.view_post,
            ActivityKind::Like => self.like,
            ActivityKind::Bookmark => self.bookmark,
            ActivityKind::Comment => self.comment,
            ActivityKind::Follow => self.follow,
            ActivityKind::Other => self.fallback,
        }
    }
}

/// Weights for topic recommendations.
#[derive(Debug, Clone)]
pub struct TopicScoring {
    /// Added once per followed topic whose name clears the similarity threshold.
    pub similarity_boost: f64,
    /// Minimum lexical similarity for the boost to apply.
    pub similarity_threshold: f64,
    /// Flat score for the cold-start fallback list.
    pub cold_start_score: f64,
}

impl Default for TopicScoring {
    fn default() -> Self {
        Self {
            similarity_boost: 0.4,
            similarity_threshold: 0.3,
            cold_start_score: 0.1,
        }
    }
}

/// Weights for user-follow recommendations.
#[derive(Debug, Clone)]
pub struct UserScoring {
    /// Per-shared-topic bonus on top of Jaccard similarity.
    pub overlap_bonus: f64,
    /// Per-topic score in cold-start mode.
    pub cold_start_topic_weight: f64,
    /// Cold-start score ceiling.
    pub cold_start_cap: f64,
    /// Whether topic-less requesters get the popularity fallback at all.
    pub cold_start_fallback: bool,
}

impl Default for UserScoring {
    fn default() -> Self {
        Self {
            overlap_bonus: 0.1,
            cold_start_topic_weight: 0.1,
            cold_start_cap: 1.0,
            cold_start_fallback: true,
        }
    }
}

/// Weights for the trending-topics blend.
#[derive(Debug, Clone)]
pub struct TrendingTopicScoring {
    pub comment_weight: f64,
    pub view_weight: f64,
    pub post_velocity_weight: f64,
    pub user_velocity_weight: f64,
    /// Mix of log-scaled engagement vs velocity in the final score.
    pub engagement_share: f64,
    pub velocity_share: f64,
    /// User count at which the growth boost saturates.
    pub growth_user_scale: f64,
    pub growth_boost: f64,
}

impl Default for TrendingTopicScoring {
    fn default() -> Self {
        Self {
            comment_weight: 1.5,
            view_weight: 0.1,
            post_velocity_weight: 2.0,
            user_velocity_weight: 0.5,
            engagement_share: 0.6,
            velocity_share: 0.4,
            growth_user_scale: 100.0,
            growth_boost: 0.2,
        }
    }
}

/// Weights and operational knobs for trending posts.
///
/// Engagement defaults to the plain counter sum; deployments that want the
/// weighted variant override the per-counter weights.
#[derive(Debug, Clone)]
pub struct TrendingPostScoring {
    pub like_weight: f64,
    pub comment_weight: f64,
    pub bookmark_weight: f64,
    pub view_weight: f64,
    /// Posts older than this are outside the primary scoring window.
    pub window_hours: f64,
    /// Posts below this engagement are not scored.
    pub min_engagement: f64,
    /// Horizon of the exponential age decay.
    pub decay_hours: f64,
    pub velocity_boost: f64,
    /// Ceiling on the comments-to-likes ratio.
    pub discussion_cap: f64,
    pub discussion_boost: f64,
    /// Recency window scanned by the fallback filler.
    pub fallback_window_hours: f64,
    pub fallback_like_weight: f64,
    pub fallback_comment_weight: f64,
}

impl Default for TrendingPostScoring {
    fn default() -> Self {
        Self {
            like_weight: 1.0,
            comment_weight: 1.0,
            bookmark_weight: 1.0,
            view_weight: 1.0,
            window_hours: 72.0,
            min_engagement: 1.0,
            decay_hours: 24.0,
            velocity_boost: 0.3,
            discussion_cap: 3.0,
            discussion_boost: 0.1,
            fallback_window_hours: 24.0,
            fallback_like_weight: 1.0,
            fallback_comment_weight: 1.5,
        }
    }
}

/// Weights for the personalized feed.
#[derive(Debug, Clone)]
pub struct FeedScoring {
    /// Per matching topic id.
    pub id_match_weight: f64,
    /// Per matching topic name when no ids match.
    pub name_match_weight: f64,
    pub comment_weight: f64,
    pub bookmark_weight: f64,
    pub view_weight: f64,
    /// Multiplier on log-scaled engagement.
    pub engagement_log_weight: f64,
    /// Horizon of the recency decay.
    pub decay_hours: f64,
    pub like_boost: f64,
    pub like_boost_threshold: usize,
    pub comment_boost: f64,
    pub comment_boost_threshold: usize,
    /// Engagement above this earns the "high engagement" reason.
    pub high_engagement_threshold: f64,
    /// Age below this earns the "recent" reason.
    pub recent_hours: f64,
    /// Comment weight in the topic-less fallback path.
    pub fallback_comment_weight: f64,
}

impl Default for FeedScoring {
    fn default() -> Self {
        Self {
            id_match_weight: 2.0,
            name_match_weight: 0.5,
            comment_weight: 1.5,
            bookmark_weight: 1.2,
            view_weight: 0.1,
            engagement_log_weight: 0.5,
            decay_hours: 168.0,
            like_boost: 0.1,
            like_boost_threshold: 5,
            comment_boost: 0.15,
            comment_boost_threshold: 3,
            high_engagement_threshold: 10.0,
            recent_hours: 24.0,
            fallback_comment_weight: 1.5,
        }
    }
}

/// Complete engine configuration, one table per scorer.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub activity: ActivityWeights,
    pub topics: TopicScoring,
    pub users: UserScoring,
    pub trending_topics: TrendingTopicScoring,
    pub trending_posts: TrendingPostScoring,
    pub feed: FeedScoring,
}

/// Optional environment overrides for the operational knobs.
#[derive(Debug, Deserialize)]
struct EnvOverrides {
    trending_window_hours: Option<f64>,
    trending_min_engagement: Option<f64>,
    trending_decay_hours: Option<f64>,
    trending_fallback_window_hours: Option<f64>,
    feed_decay_hours: Option<f64>,
}

impl EngineConfig {
    /// Load defaults with `RANKING_`-prefixed environment overrides.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let overrides = envy::prefixed("RANKING_").from_env::<EnvOverrides>()?;

        let mut config = Self::default();
        if let Some(v) = overrides.trending_window_hours {
            config.trending_posts.window_hours = v;
        }
        if let Some(v) = overrides.trending_min_engagement {
            config.trending_posts.min_engagement = v;
        }
        if let Some(v) = overrides.trending_decay_hours {
            config.trending_posts.decay_hours = v;
        }
        if let Some(v) = overrides.trending_fallback_window_hours {
            config.trending_posts.fallback_window_hours = v;
        }
        if let Some(v) = overrides.feed_decay_hours {
            config.feed.decay_hours = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate weight tables. All weights must be non-negative and every
    /// time horizon strictly positive.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("activity.view_post", self.activity.view_post),
            ("activity.like", self.activity.like),
            ("activity.bookmark", self.activity.bookmark),
            ("activity.comment", self.activity.comment),
            ("activity.follow", self.activity.follow),
            ("activity.fallback", self.activity.fallback),
            ("topics.similarity_boost", self.topics.similarity_boost),
            ("topics.cold_start_score", self.topics.cold_start_score),
            ("users.overlap_bonus", self.users.overlap_bonus),
            (
                "users.cold_start_topic_weight",
                self.users.cold_start_topic_weight,
            ),
            ("trending_posts.like_weight", self.trending_posts.like_weight),
            (
                "trending_posts.comment_weight",
                self.trending_posts.comment_weight,
            ),
            (
                "trending_posts.bookmark_weight",
                self.trending_posts.bookmark_weight,
            ),
            ("trending_posts.view_weight", self.trending_posts.view_weight),
            (
                "trending_posts.min_engagement",
                self.trending_posts.min_engagement,
            ),
            ("feed.id_match_weight", self.feed.id_match_weight),
            ("feed.name_match_weight", self.feed.name_match_weight),
        ];

        for (name, value) in weights {
            if value < 0.0 || !value.is_finite() {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be a non-negative finite number, got {}",
                    name, value
                )));
            }
        }

        let horizons = [
            ("trending_posts.window_hours", self.trending_posts.window_hours),
            ("trending_posts.decay_hours", self.trending_posts.decay_hours),
            (
                "trending_posts.fallback_window_hours",
                self.trending_posts.fallback_window_hours,
            ),
            ("feed.decay_hours", self.feed.decay_hours),
        ];

        for (name, value) in horizons {
            if value <= 0.0 || !value.is_finite() {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be a positive number of hours, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.topics.similarity_threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "topics.similarity_threshold must be in [0, 1], got {}",
                self.topics.similarity_threshold
            )));
        }

        Ok(())
    }
}
