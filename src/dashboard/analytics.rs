//! Overview page counter cards

use crate::client::ApiClient;
use crate::client::types::{CountDelta, DeltaMetric};
use crate::core::error::Result;
use async_trait::async_trait;
use futures::future::join_all;

/// Source of the analytics counters
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn count_delta(&self, metric: DeltaMetric) -> Result<CountDelta>;
}

#[async_trait]
impl AnalyticsSource for ApiClient {
    async fn count_delta(&self, metric: DeltaMetric) -> Result<CountDelta> {
        ApiClient::count_delta(self, metric).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardState {
    Loading,
    Ready(CountDelta),
    /// The counter could not be fetched; the card shows `reason`
    Unavailable { reason: String },
}

/// One counter card
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaCard {
    pub metric: DeltaMetric,
    pub state: CardState,
}

impl DeltaCard {
    pub fn loading(metric: DeltaMetric) -> Self {
        Self {
            metric,
            state: CardState::Loading,
        }
    }

    pub fn from_result(metric: DeltaMetric, result: Result<CountDelta>) -> Self {
        let state = match result {
            Ok(delta) => CardState::Ready(delta),
            Err(e) => {
                tracing::warn!(metric = metric.path(), error = %e, "Failed to load analytics card");
                CardState::Unavailable {
                    reason: e.user_message(),
                }
            }
        };
        Self { metric, state }
    }

    pub fn title(&self) -> &'static str {
        self.metric.title()
    }

    pub fn value(&self) -> Option<i64> {
        match &self.state {
            CardState::Ready(delta) => Some(delta.count),
            _ => None,
        }
    }

    /// Width of the progress bar in percent; drops show as an empty bar
    pub fn progress(&self) -> f64 {
        match &self.state {
            CardState::Ready(delta) => delta.percent_change.clamp(0.0, 100.0),
            _ => 0.0,
        }
    }

    /// Caption such as "+12.5% from yesterday"
    pub fn change_label(&self) -> Option<String> {
        let CardState::Ready(delta) = &self.state else {
            return None;
        };
        let sign = if delta.percent_change >= 0.0 { "+" } else { "" };
        Some(format!(
            "{}{}% {}",
            sign,
            delta.percent_change,
            self.metric.baseline()
        ))
    }
}

/// Fetch every counter concurrently; failures become unavailable cards
pub async fn load_cards(source: &dyn AnalyticsSource) -> Vec<DeltaCard> {
    let requests = DeltaMetric::ALL.map(|metric| async move {
        DeltaCard::from_result(metric, source.count_delta(metric).await)
    });
    join_all(requests).await
}
