//! Engagement analytics.
//!
//! Every metric is derived from the raw engagement events inside an optional
//! date window. Cached counters on the content rows are never consulted here.

use std::collections::HashSet;

use explore_common::{AppError, AppResult, DateWindow};
use explore_db::entities::explore_content;
use explore_db::entities::explore_engagement::{self, EngagementType};
use explore_db::entities::explore_feed_session;
use explore_db::repositories::{
    ExploreContentRepository, ExploreEngagementRepository, ExploreFeedSessionRepository,
    ExploreVideoRepository,
};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::debug;

use crate::services::scoring::{EngagementCounters, ratio};

/// Number of entries in a creator's top list.
pub const TOP_VIDEOS_LIMIT: usize = 10;

/// Metrics over one content row's events.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSummary {
    pub total_views: u64,
    /// Distinct signed-in viewers among view events.
    pub unique_viewers: u64,
    /// Seconds watched across every event in the window.
    pub total_watch_time: u64,
    /// Seconds watched per view.
    pub average_watch_time: f64,
    pub completions: u64,
    pub completion_rate: f64,
    pub saves: u64,
    pub shares: u64,
    pub clicks: u64,
    pub skips: u64,
    pub engagement_rate: f64,
    pub engagement_score: f64,
}

impl EngagementSummary {
    /// Summarize a set of events belonging to one content row.
    #[must_use]
    pub fn from_events(events: &[explore_engagement::Model]) -> Self {
        let counters = EngagementCounters::tally(events);
        let total_watch_time = total_watch_time(events);

        let unique_viewers = events
            .iter()
            .filter(|e| e.engagement_type == EngagementType::View)
            .filter_map(|e| e.user_id.as_deref())
            .collect::<HashSet<_>>()
            .len() as u64;

        Self {
            total_views: counters.views,
            unique_viewers,
            total_watch_time,
            average_watch_time: ratio(total_watch_time, counters.views),
            completions: counters.completions,
            completion_rate: counters.completion_rate(),
            saves: counters.saves,
            shares: counters.shares,
            clicks: counters.clicks,
            skips: counters.skips,
            engagement_rate: counters.engagement_rate(),
            engagement_score: counters.score(),
        }
    }
}

/// Analytics of one video.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalytics {
    pub video_id: String,
    pub content_id: String,
    #[serde(flatten)]
    pub summary: EngagementSummary,
}

/// One entry of a creator's top list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopVideo {
    pub content_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub views: u64,
    pub engagement_score: f64,
}

/// Analytics across every video of one creator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorAnalytics {
    pub creator_id: String,
    pub total_videos: u64,
    pub total_views: u64,
    pub total_watch_time: u64,
    /// Unweighted mean of the per-video completion rates.
    pub average_completion_rate: f64,
    pub total_saves: u64,
    pub total_shares: u64,
    pub total_clicks: u64,
    pub engagement_rate: f64,
    /// Highest engagement score first.
    pub top_performing_videos: Vec<TopVideo>,
}

impl CreatorAnalytics {
    /// Combine per-video summaries of one creator.
    #[must_use]
    pub fn aggregate(
        creator_id: &str,
        videos: Vec<(explore_content::Model, EngagementSummary)>,
    ) -> Self {
        let mut analytics = Self {
            creator_id: creator_id.to_string(),
            total_videos: videos.len() as u64,
            ..Self::default()
        };

        let mut completion_rate_sum = 0.0;
        for (_, summary) in &videos {
            analytics.total_views += summary.total_views;
            analytics.total_watch_time += summary.total_watch_time;
            analytics.total_saves += summary.saves;
            analytics.total_shares += summary.shares;
            analytics.total_clicks += summary.clicks;
            completion_rate_sum += summary.completion_rate;
        }

        if !videos.is_empty() {
            analytics.average_completion_rate = completion_rate_sum / videos.len() as f64;
        }
        analytics.engagement_rate = ratio(
            analytics.total_saves + analytics.total_shares + analytics.total_clicks,
            analytics.total_views,
        );

        let mut ranked: Vec<TopVideo> = videos
            .into_iter()
            .map(|(content, summary)| TopVideo {
                content_id: content.id,
                title: content.title,
                thumbnail_url: content.thumbnail_url,
                views: summary.total_views,
                engagement_score: summary.engagement_score,
            })
            .collect();
        ranked.sort_by(|a, b| b.engagement_score.total_cmp(&a.engagement_score));
        ranked.truncate(TOP_VIDEOS_LIMIT);
        analytics.top_performing_videos = ranked;

        analytics
    }
}

/// Analytics of one feed session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnalytics {
    pub session_id: String,
    /// Distinct content rows viewed.
    pub videos_viewed: u64,
    pub completions: u64,
    pub saves: u64,
    pub shares: u64,
    pub clicks: u64,
    pub total_watch_time: u64,
    /// Seconds watched per distinct video viewed.
    pub average_watch_time: f64,
    /// Interactions per distinct video viewed.
    pub engagement_rate: f64,
    /// Whole seconds between session start and end; zero while open.
    pub session_duration: i64,
}

impl SessionAnalytics {
    /// Summarize a session and its events.
    #[must_use]
    pub fn from_events(
        session: &explore_feed_session::Model,
        events: &[explore_engagement::Model],
    ) -> Self {
        let counters = EngagementCounters::tally(events);
        let total_watch_time = total_watch_time(events);

        let videos_viewed = events
            .iter()
            .filter(|e| e.engagement_type == EngagementType::View)
            .map(|e| e.content_id.as_str())
            .collect::<HashSet<_>>()
            .len() as u64;

        let session_duration = session
            .session_end
            .map_or(0, |end| (end - session.session_start).num_seconds().max(0));

        Self {
            session_id: session.id.clone(),
            videos_viewed,
            completions: counters.completions,
            saves: counters.saves,
            shares: counters.shares,
            clicks: counters.clicks,
            total_watch_time,
            average_watch_time: ratio(total_watch_time, videos_viewed),
            engagement_rate: ratio(counters.interactions(), videos_viewed),
            session_duration,
        }
    }
}

fn total_watch_time(events: &[explore_engagement::Model]) -> u64 {
    events
        .iter()
        .map(|e| u64::try_from(e.watch_time).unwrap_or(0))
        .sum()
}

/// Service answering analytics queries.
#[derive(Clone)]
pub struct AnalyticsService {
    video_repo: ExploreVideoRepository,
    content_repo: ExploreContentRepository,
    engagement_repo: ExploreEngagementRepository,
    session_repo: ExploreFeedSessionRepository,
}

impl AnalyticsService {
    /// Create a new analytics service.
    #[must_use]
    pub const fn new(
        video_repo: ExploreVideoRepository,
        content_repo: ExploreContentRepository,
        engagement_repo: ExploreEngagementRepository,
        session_repo: ExploreFeedSessionRepository,
    ) -> Self {
        Self {
            video_repo,
            content_repo,
            engagement_repo,
            session_repo,
        }
    }

    /// Analytics of one video. A video without events yields zeroed metrics.
    pub async fn video_analytics(
        &self,
        video_id: &str,
        window: &DateWindow,
    ) -> AppResult<VideoAnalytics> {
        let video = self
            .video_repo
            .find_by_id(video_id)
            .await?
            .ok_or_else(|| AppError::VideoNotFound(video_id.to_string()))?;

        let events = self
            .engagement_repo
            .find_by_content(&video.content_id, window)
            .await?;

        debug!(video_id = %video_id, events = events.len(), "Computing video analytics");

        Ok(VideoAnalytics {
            video_id: video.id,
            content_id: video.content_id,
            summary: EngagementSummary::from_events(&events),
        })
    }

    /// Analytics across every content row of a creator.
    pub async fn creator_analytics(
        &self,
        creator_id: &str,
        window: &DateWindow,
    ) -> AppResult<CreatorAnalytics> {
        let contents = self.content_repo.find_by_creator(creator_id).await?;

        let summaries = try_join_all(contents.iter().map(|content| async move {
            let events = self
                .engagement_repo
                .find_by_content(&content.id, window)
                .await?;
            Ok::<_, AppError>(EngagementSummary::from_events(&events))
        }))
        .await?;

        debug!(creator_id = %creator_id, videos = contents.len(), "Computing creator analytics");

        Ok(CreatorAnalytics::aggregate(
            creator_id,
            contents.into_iter().zip(summaries).collect(),
        ))
    }

    /// Analytics of one feed session.
    pub async fn session_analytics(
        &self,
        session_id: &str,
        window: &DateWindow,
    ) -> AppResult<SessionAnalytics> {
        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?;

        let events = self
            .engagement_repo
            .find_by_session(session_id, window)
            .await?;

        Ok(SessionAnalytics::from_events(&session, &events))
    }
}
