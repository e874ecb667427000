//! Aggregation orchestrator: fans the metric catalog out against the
//! query executor and assembles one immutable snapshot per request.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::core::client::executor::{QueryError, QueryExecutor, SqlQuery, SqlRow};
use crate::domain::analytics::snapshot::{AnalyticsSnapshot, SnapshotCharts};
use crate::domain::analytics::{catalog, chart, payout, period::Period};

pub struct AnalyticsService {
    executor: Arc<dyn QueryExecutor>,
}

impl AnalyticsService {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    async fn fetch(&self, query: SqlQuery) -> Result<Vec<SqlRow>, QueryError> {
        Ok(self.executor.execute(&query).await?.rows)
    }

    /// Raw newest-first daily active-user rows for an arbitrary window.
    pub async fn daily_active_users(&self, days: i64) -> Result<Vec<SqlRow>, QueryError> {
        self.fetch(catalog::daily_active_users(days)).await
    }

    /// Build the full analytics snapshot for one period token.
    ///
    /// All catalog queries for the snapshot are issued concurrently and
    /// awaited as one batch: any failure fails the whole call and no
    /// partial snapshot is returned. Sibling in-flight queries are not
    /// cancelled; they are read-only and their results are dropped.
    pub async fn build_snapshot(&self, period_token: &str) -> Result<AnalyticsSnapshot, QueryError> {
        let period = Period::from_token(period_token);
        let days = period.day_count();
        let scalar_bound = period.scalar_bound();

        let (
            daily_users,
            daily_posts,
            daily_comments,
            reward_window_rows,
            reward_total_rows,
            total_posts,
            total_comments,
            users_last_24h,
            users_previous_24h,
        ) = tokio::try_join!(
            self.fetch(catalog::daily_active_users(days)),
            self.fetch(catalog::daily_posts(days)),
            self.fetch(catalog::daily_comments(days)),
            self.fetch(catalog::reward_rows(Some(days))),
            self.fetch(catalog::reward_rows(scalar_bound)),
            self.fetch(catalog::total_posts(scalar_bound)),
            self.fetch(catalog::total_comments(scalar_bound)),
            self.fetch(catalog::active_users_last_24h()),
            self.fetch(catalog::active_users_previous_24h()),
        )?;

        let daily_reward_rows = payout::daily_rewards(&reward_window_rows);

        let snapshot = AnalyticsSnapshot {
            daily_active_users_24h: scalar_i64(&users_last_24h, "active_users"),
            previous_day_users_24h: scalar_i64(&users_previous_24h, "active_users"),
            total_posts: scalar_i64(&total_posts, "total_posts"),
            total_comments: scalar_i64(&total_comments, "total_comments"),
            total_rewards: payout::total_rewards(&reward_total_rows),
            charts: SnapshotCharts {
                daily_active_users: chart::normalize(&daily_users, "active_users"),
                posts_created: chart::normalize(&daily_posts, "posts_count"),
                daily_comments: chart::normalize(&daily_comments, "comments_count"),
                daily_rewards: chart::normalize(&daily_reward_rows, "daily_rewards"),
            },
        };

        info!(
            period = period_token,
            days,
            all_time = period.is_all_time(),
            "analytics snapshot assembled"
        );

        Ok(snapshot)
    }

    /// Connectivity probe. Never raises: any failure, including an
    /// unreachable executor, is reported as `false`.
    pub async fn probe(&self) -> bool {
        match self.executor.execute(&catalog::probe()).await {
            Ok(output) => !output.rows.is_empty(),
            Err(err) => {
                warn!("connectivity probe failed: {err}");
                false
            }
        }
    }
}

fn scalar_i64(rows: &[SqlRow], field: &str) -> i64 {
    rows.first()
        .and_then(|row| row.get(field))
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use crate::core::client::executor::{QueryOutput, SqlQuery};

    type Handler = Box<dyn Fn(&SqlQuery) -> Result<QueryOutput, QueryError> + Send + Sync>;

    struct MockExecutor {
        handler: Handler,
        calls: AtomicUsize,
    }

    impl MockExecutor {
        fn new(handler: Handler) -> Self {
            Self {
                handler,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl QueryExecutor for MockExecutor {
        async fn execute(&self, query: &SqlQuery) -> Result<QueryOutput, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.handler)(query)
        }
    }

    fn output(rows: Vec<Value>) -> QueryOutput {
        let rows: Vec<SqlRow> = rows
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap_or_default())
            .collect();
        let rows_affected = rows.len() as u64;
        QueryOutput {
            rows,
            rows_affected,
        }
    }

    fn fixture_handler(query: &SqlQuery) -> Result<QueryOutput, QueryError> {
        let text = query.text.as_str();

        if text.contains("DATEADD(hour, -48") {
            return Ok(output(vec![json!({ "active_users": 4 })]));
        }
        if text.contains("DATEADD(hour, -24") {
            return Ok(output(vec![json!({ "active_users": 5 })]));
        }
        if text.contains("COUNT(DISTINCT author)") {
            return Ok(output(vec![
                json!({ "date": "2024-03-10", "active_users": 3 }),
                json!({ "date": "2024-03-09", "active_users": 2 }),
            ]));
        }
        if text.contains("posts_count") {
            return Ok(output(vec![json!({ "date": "2024-03-10", "posts_count": 6 })]));
        }
        if text.contains("comments_count") {
            return Ok(output(vec![json!({ "date": "2024-03-10", "comments_count": 9 })]));
        }
        if text.contains("total_payout_value") {
            return Ok(output(vec![json!({
                "date": "2024-03-10",
                "total_payout_value": "abc HBD",
                "curator_payout_value": "1.5 HBD"
            })]));
        }
        if text.contains("total_posts") {
            return Ok(output(vec![json!({ "total_posts": 120 })]));
        }
        if text.contains("total_comments") {
            return Ok(output(vec![json!({ "total_comments": 340 })]));
        }
        Ok(output(vec![]))
    }

    fn service_with(handler: Handler) -> (AnalyticsService, Arc<MockExecutor>) {
        let executor = Arc::new(MockExecutor::new(handler));
        (AnalyticsService::new(executor.clone()), executor)
    }

    #[tokio::test]
    async fn snapshot_assembles_headlines_and_charts() {
        let (service, executor) = service_with(Box::new(fixture_handler));

        let snapshot = service.build_snapshot("7D").await.unwrap();

        assert_eq!(snapshot.daily_active_users_24h, 5);
        assert_eq!(snapshot.previous_day_users_24h, 4);
        assert_eq!(snapshot.total_posts, 120);
        assert_eq!(snapshot.total_comments, 340);
        assert_eq!(snapshot.total_rewards, 1.5);

        // newest-first source rows come back oldest-first for rendering
        let users = &snapshot.charts.daily_active_users;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].date, "Mar 9");
        assert_eq!(users[0].value, 2.0);
        assert_eq!(users[1].date, "Mar 10");
        assert_eq!(users[1].value, 3.0);

        assert_eq!(snapshot.charts.daily_rewards[0].value, 1.5);

        // full catalog fan-out: 4 windowed series fetches (incl. both
        // reward fetches), 2 scalar totals, 2 comparison scalars, and
        // the windowed daily-users series
        assert_eq!(executor.calls.load(Ordering::SeqCst), 9);
    }

    #[tokio::test]
    async fn snapshot_is_all_or_nothing() {
        let (service, _) = service_with(Box::new(|query| {
            if query.text.contains("total_posts") {
                return Err(QueryError::Execution("timeout".into()));
            }
            fixture_handler(query)
        }));

        let result = service.build_snapshot("30D").await;
        assert!(matches!(result, Err(QueryError::Execution(_))));
    }

    #[tokio::test]
    async fn connectivity_failure_fails_the_whole_batch() {
        let (service, _) = service_with(Box::new(|_| {
            Err(QueryError::Connectivity("refused".into()))
        }));

        assert!(service.build_snapshot("All").await.is_err());
    }

    #[tokio::test]
    async fn probe_swallows_failures() {
        let (service, _) = service_with(Box::new(|_| {
            Err(QueryError::Connectivity("refused".into()))
        }));
        assert!(!service.probe().await);
    }

    #[tokio::test]
    async fn probe_requires_at_least_one_row() {
        let (service, _) = service_with(Box::new(|_| Ok(output(vec![]))));
        assert!(!service.probe().await);

        let (service, _) = service_with(Box::new(|_| {
            Ok(output(vec![json!({ "author": "alice" })]))
        }));
        assert!(service.probe().await);
    }

    #[tokio::test]
    async fn daily_active_users_returns_raw_newest_first_rows() {
        let (service, _) = service_with(Box::new(fixture_handler));

        let rows = service.daily_active_users(2).await.unwrap();
        assert_eq!(rows[0].get("date"), Some(&json!("2024-03-10")));
        assert_eq!(rows[0].get("active_users"), Some(&json!(3)));
        assert_eq!(rows[1].get("active_users"), Some(&json!(2)));
    }
}
