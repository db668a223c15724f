#[cfg(test)]
mod tests {
    use crate::common::test_support::{insert_entry, insert_streak, setup_test_db};
    use crate::common::ApiError;
    use crate::stats::models::*;
    use crate::stats::services::StatsService;

    #[tokio::test]
    async fn test_empty_store_reports_zeroes() {
        let pool = setup_test_db().await;
        let service = StatsService::new(pool);

        let stats = service
            .stats("writer", StatsScope::User("writer".to_string()))
            .await
            .unwrap();

        assert_eq!(stats, Stats::default());
        assert_eq!(stats.longest_streak, 0);
        assert!(stats.preferred_writing_times.is_empty());
        assert_eq!(stats.preferred_hour_of_day, None);
        // No entries means no preferred day, not Sunday
        assert_eq!(stats.preferred_day_of_week, None);
    }

    #[tokio::test]
    async fn test_user_without_streaks_has_zero_longest_streak() {
        let pool = setup_test_db().await;
        insert_entry(&pool, "E1", "writer", 250, false, "2024-05-01 08:00:00.000").await;
        insert_streak(&pool, "K_1", "other", 9, "E9", "2024-05-01 08:00:00.000").await;
        let service = StatsService::new(pool);

        let stats = service
            .stats("writer", StatsScope::User("writer".to_string()))
            .await
            .unwrap();

        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.words_written, 250);
    }

    #[tokio::test]
    async fn test_user_scope_aggregates() {
        let pool = setup_test_db().await;
        // Wednesday mornings twice, Sunday evening once
        insert_entry(&pool, "E1", "writer", 300, true, "2024-05-01 08:10:00.000").await;
        insert_entry(&pool, "E2", "writer", 1200, true, "2024-05-08 08:45:00.000").await;
        insert_entry(&pool, "E3", "writer", 500, true, "2024-05-05 21:00:00.000").await;
        insert_entry(&pool, "E4", "other", 9000, true, "2024-05-05 21:00:00.000").await;
        insert_streak(&pool, "K_1", "writer", 4, "E1", "2024-05-01 08:10:00.000").await;
        insert_streak(&pool, "K_2", "writer", 11, "E2", "2024-05-08 08:45:00.000").await;
        insert_streak(&pool, "K_3", "other", 40, "E4", "2024-05-05 21:00:00.000").await;
        let service = StatsService::new(pool);

        let stats = service
            .stats("writer", StatsScope::User("writer".to_string()))
            .await
            .unwrap();

        assert_eq!(stats.words_written, 2000);
        assert_eq!(stats.longest_entry, 1200);
        assert_eq!(stats.longest_streak, 11);
        assert_eq!(stats.preferred_day_of_week, Some(3));
        assert_eq!(stats.preferred_hour_of_day, Some(8));
        assert_eq!(
            stats.preferred_writing_times,
            vec![
                PreferredWritingTime { hour: 8, count: 2 },
                PreferredWritingTime { hour: 21, count: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_global_scope_covers_everyone() {
        let pool = setup_test_db().await;
        insert_entry(&pool, "E1", "writer", 300, true, "2024-05-01 08:10:00.000").await;
        insert_entry(&pool, "E4", "other", 9000, true, "2024-05-05 21:00:00.000").await;
        insert_entry(&pool, "E5", "third", 100, false, "2024-05-05 21:30:00.000").await;
        insert_streak(&pool, "K_3", "other", 40, "E4", "2024-05-05 21:00:00.000").await;
        let service = StatsService::new(pool);

        let stats = service.stats("writer", StatsScope::Global).await.unwrap();

        assert_eq!(stats.words_written, 9400);
        assert_eq!(stats.longest_entry, 9000);
        assert_eq!(stats.longest_streak, 40);
        assert_eq!(stats.preferred_day_of_week, Some(0));
        assert_eq!(stats.preferred_hour_of_day, Some(21));
    }

    #[tokio::test]
    async fn test_ties_resolve_to_earliest_bucket() {
        let pool = setup_test_db().await;
        insert_entry(&pool, "E1", "writer", 10, false, "2024-05-05 22:00:00.000").await;
        insert_entry(&pool, "E2", "writer", 10, false, "2024-05-01 07:00:00.000").await;
        let service = StatsService::new(pool);

        let stats = service
            .stats("writer", StatsScope::User("writer".to_string()))
            .await
            .unwrap();

        assert_eq!(stats.preferred_day_of_week, Some(0));
        assert_eq!(stats.preferred_hour_of_day, Some(7));
    }

    #[tokio::test]
    async fn test_anonymous_caller_rejected() {
        let pool = setup_test_db().await;
        let service = StatsService::new(pool);

        let result = service.stats("", StatsScope::Global).await;

        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn test_scope_filter() {
        assert_eq!(StatsScope::Global.user_filter(), None);
        assert_eq!(StatsScope::User("writer".to_string()).user_filter(), Some("writer"));
    }
}
