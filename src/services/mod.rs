pub mod feed;
pub mod signals;
pub mod topics;
pub mod trending;
pub mod users;

pub use feed::FeedRanker;
pub use signals::SignalAggregator;
pub use topics::TopicRecommender;
pub use trending::{TrendingPostsScorer, TrendingTopicsScorer};
pub use users::UserRecommender;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::models::{
    ActivityEvent, PostMetrics, RankStats, RecommendationItem, TopicMetrics, TopicRef, UserProfile,
};

/// Facade bundling the five ranking strategies behind one operation per
/// task. Holds nothing but weight tables: every call is a pure function of
/// its arguments, so a single instance can be shared freely across threads.
pub struct RecommendationEngine {
    topics: TopicRecommender,
    users: UserRecommender,
    trending_topics: TrendingTopicsScorer,
    trending_posts: TrendingPostsScorer,
    feed: FeedRanker,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            topics: TopicRecommender::with_config(config.topics, config.activity),
            users: UserRecommender::with_config(config.users),
            trending_topics: TrendingTopicsScorer::with_config(config.trending_topics),
            trending_posts: TrendingPostsScorer::with_config(config.trending_posts),
            feed: FeedRanker::with_config(config.feed),
        }
    }

    /// Topics the user does not follow yet, ranked by activity signals and
    /// name similarity.
    pub fn recommend_topics(
        &self,
        user_topics: &[TopicRef],
        user_activity: &[ActivityEvent],
        all_topics: &[TopicRef],
        limit: usize,
    ) -> Vec<RecommendationItem> {
        self.topics
            .recommend(user_topics, user_activity, all_topics, limit)
    }

    /// Users to follow, ranked by shared-topic similarity.
    pub fn recommend_users(
        &self,
        user_id: Uuid,
        user_topics: &[TopicRef],
        all_users: &[UserProfile],
        following: &[Uuid],
        limit: usize,
    ) -> Vec<RecommendationItem> {
        self.users
            .recommend(user_id, user_topics, all_users, following, limit)
    }

    /// Trending topics by engagement and velocity.
    pub fn trending_topics(
        &self,
        topics: &[TopicMetrics],
        limit: usize,
    ) -> (Vec<RecommendationItem>, RankStats) {
        self.trending_topics.rank(topics, limit)
    }

    /// Trending posts inside the configured window, as of `now`.
    pub fn trending_posts(
        &self,
        posts: &[PostMetrics],
        now: DateTime<Utc>,
        limit: usize,
    ) -> (Vec<RecommendationItem>, RankStats) {
        self.trending_posts.rank(posts, now, limit)
    }

    /// Personalized feed for one user, as of `now`.
    pub fn personalized_feed(
        &self,
        user_topics: &[TopicRef],
        posts: &[PostMetrics],
        user_activity: &[ActivityEvent],
        now: DateTime<Utc>,
        limit: usize,
    ) -> (Vec<RecommendationItem>, RankStats) {
        self.feed.rank(user_topics, posts, user_activity, now, limit)
    }
}
