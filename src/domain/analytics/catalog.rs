//! Fixed catalog of aggregate queries over the HiveSQL `Comments` table.
//!
//! Every metric is scoped to in-app content via the `json_metadata` tag
//! predicate and discriminated by reply depth (0 = post, >0 = comment).
//! Day counts are bound as parameters, never interpolated into the text.

use crate::core::client::executor::{SqlParam, SqlQuery};

/// Tag identifying content created through the application.
const APP_TAG: &str = "app:liketu";

fn app_filter() -> String {
    format!("CONTAINS(json_metadata, '{APP_TAG}')")
}

/// Distinct authors per day over the trailing window, newest-first.
pub fn daily_active_users(days: i64) -> SqlQuery {
    SqlQuery::with_params(
        format!(
            "SELECT CAST(created AS DATE) AS [date], \
             COUNT(DISTINCT author) AS active_users \
             FROM Comments \
             WHERE {} AND created >= DATEADD(day, -@P1, GETDATE()) \
             GROUP BY CAST(created AS DATE) \
             ORDER BY [date] DESC",
            app_filter()
        ),
        vec![SqlParam::Int(days)],
    )
}

/// Top-level posts per day over the trailing window, newest-first.
pub fn daily_posts(days: i64) -> SqlQuery {
    SqlQuery::with_params(
        format!(
            "SELECT CAST(created AS DATE) AS [date], \
             COUNT(*) AS posts_count \
             FROM Comments \
             WHERE {} AND depth = 0 \
             AND created >= DATEADD(day, -@P1, GETDATE()) \
             GROUP BY CAST(created AS DATE) \
             ORDER BY [date] DESC",
            app_filter()
        ),
        vec![SqlParam::Int(days)],
    )
}

/// Replies per day over the trailing window, newest-first.
pub fn daily_comments(days: i64) -> SqlQuery {
    SqlQuery::with_params(
        format!(
            "SELECT CAST(created AS DATE) AS [date], \
             COUNT(*) AS comments_count \
             FROM Comments \
             WHERE {} AND depth > 0 \
             AND created >= DATEADD(day, -@P1, GETDATE()) \
             GROUP BY CAST(created AS DATE) \
             ORDER BY [date] DESC",
            app_filter()
        ),
        vec![SqlParam::Int(days)],
    )
}

/// Total top-level posts; `bound = None` scans all time.
pub fn total_posts(bound: Option<i64>) -> SqlQuery {
    scalar_count("total_posts", "depth = 0", bound)
}

/// Total replies; `bound = None` scans all time.
pub fn total_comments(bound: Option<i64>) -> SqlQuery {
    scalar_count("total_comments", "depth > 0", bound)
}

fn scalar_count(alias: &str, depth_filter: &str, bound: Option<i64>) -> SqlQuery {
    match bound {
        Some(days) => SqlQuery::with_params(
            format!(
                "SELECT COUNT(*) AS {alias} \
                 FROM Comments \
                 WHERE {} AND {depth_filter} \
                 AND created >= DATEADD(day, -@P1, GETDATE())",
                app_filter()
            ),
            vec![SqlParam::Int(days)],
        ),
        None => SqlQuery::new(format!(
            "SELECT COUNT(*) AS {alias} \
             FROM Comments \
             WHERE {} AND {depth_filter}",
            app_filter()
        )),
    }
}

/// Raw payout rows for top-level posts. Payout values arrive as
/// currency-suffixed strings and are parsed by the core, so dirty data
/// degrades to zero instead of failing the whole aggregation.
pub fn reward_rows(bound: Option<i64>) -> SqlQuery {
    match bound {
        Some(days) => SqlQuery::with_params(
            format!(
                "SELECT CAST(created AS DATE) AS [date], \
                 total_payout_value, curator_payout_value \
                 FROM Comments \
                 WHERE {} AND depth = 0 \
                 AND created >= DATEADD(day, -@P1, GETDATE()) \
                 ORDER BY created DESC",
                app_filter()
            ),
            vec![SqlParam::Int(days)],
        ),
        None => SqlQuery::new(format!(
            "SELECT CAST(created AS DATE) AS [date], \
             total_payout_value, curator_payout_value \
             FROM Comments \
             WHERE {} AND depth = 0 \
             ORDER BY created DESC",
            app_filter()
        )),
    }
}

/// Distinct authors active in the trailing 24 hours. Independent of the
/// selected period; used for the percentage-change headline.
pub fn active_users_last_24h() -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT COUNT(DISTINCT author) AS active_users \
         FROM Comments \
         WHERE {} AND created >= DATEADD(hour, -24, GETDATE())",
        app_filter()
    ))
}

/// Distinct authors active between 48 and 24 hours ago.
pub fn active_users_previous_24h() -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT COUNT(DISTINCT author) AS active_users \
         FROM Comments \
         WHERE {} AND created >= DATEADD(hour, -48, GETDATE()) \
         AND created < DATEADD(hour, -24, GETDATE())",
        app_filter()
    ))
}

/// Minimal bounded query used to assert the data source is reachable.
pub fn probe() -> SqlQuery {
    SqlQuery::new("SELECT TOP 1 author, created FROM Comments WHERE depth = 0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windowed_queries_bind_day_count_as_parameter() {
        for query in [
            daily_active_users(7),
            daily_posts(7),
            daily_comments(7),
            total_posts(Some(7)),
            total_comments(Some(7)),
            reward_rows(Some(7)),
        ] {
            assert!(query.text.contains("@P1"), "missing placeholder: {}", query.text);
            assert_eq!(query.params, vec![SqlParam::Int(7)]);
        }
    }

    #[test]
    fn unbounded_variants_carry_no_time_filter() {
        for query in [total_posts(None), total_comments(None), reward_rows(None)] {
            assert!(!query.text.contains("DATEADD"));
            assert!(query.params.is_empty());
        }
    }

    #[test]
    fn every_metric_is_app_scoped() {
        for query in [
            daily_active_users(90),
            daily_posts(90),
            daily_comments(90),
            total_posts(None),
            total_comments(None),
            reward_rows(None),
            active_users_last_24h(),
            active_users_previous_24h(),
        ] {
            assert!(query.text.contains("app:liketu"));
        }
    }

    #[test]
    fn comparison_pair_covers_adjacent_windows() {
        let last = active_users_last_24h();
        let previous = active_users_previous_24h();
        assert!(last.text.contains("DATEADD(hour, -24"));
        assert!(previous.text.contains("DATEADD(hour, -48"));
        assert!(previous.text.contains("created < DATEADD(hour, -24"));
    }
}
