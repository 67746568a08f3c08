//! SQLite store.
//!
//! A single `content_items` table holds both kinds, keyed by `(kind, id)`.
//! Timestamps are stored as integer nanoseconds, so `ORDER BY` matches
//! the in-memory ordering exactly.
//! One covering index serves the candidate-pool query:
//! `(kind, sponsored, created_at_ns DESC, id DESC)`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feedmix_core::{
    Article, CampaignReview, ContentItem, ContentKind, ContentStore, ItemQuery, StoreError,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

const LIST_SQL: &str = r#"
    SELECT kind, id, title, company_id, category_id, created_at_ns, sponsored, sponsored_label
    FROM content_items
    WHERE kind = ?1
      AND sponsored = ?2
      AND (?3 IS NULL OR company_id = ?3)
      AND (?4 IS NULL OR category_id = ?4)
    ORDER BY created_at_ns DESC, id DESC
    LIMIT ?5
"#;

/// A SQLite-backed content store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url`.
    ///
    /// Pass `"sqlite::memory:"` for an in-process ephemeral database; the
    /// pool is then pinned to a single connection so every query sees the
    /// same data.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Unavailable(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let ephemeral = url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(if ephemeral { 1 } else { max_connections.max(1) });
        if ephemeral {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite content store initialized at {url}");
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS content_items (
                kind            TEXT NOT NULL,
                id              TEXT NOT NULL,
                title           TEXT NOT NULL,
                company_id      TEXT,
                category_id     TEXT,
                created_at_ns   INTEGER NOT NULL,
                sponsored       INTEGER NOT NULL DEFAULT 0,
                sponsored_label TEXT,
                PRIMARY KEY (kind, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("content_items table: {e}")))?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_content_items_pool
            ON content_items(kind, sponsored, created_at_ns DESC, id DESC)
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("pool index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<ContentItem, StoreError> {
        let column =
            |name: &str, e: sqlx::Error| StoreError::InvalidRow(format!("{name} column: {e}"));

        let kind: String = row.try_get("kind").map_err(|e| column("kind", e))?;
        let id: String = row.try_get("id").map_err(|e| column("id", e))?;
        let title: String = row.try_get("title").map_err(|e| column("title", e))?;
        let company_id: Option<String> =
            row.try_get("company_id").map_err(|e| column("company_id", e))?;
        let category_id: Option<String> =
            row.try_get("category_id").map_err(|e| column("category_id", e))?;
        let created_at_ns: i64 = row
            .try_get("created_at_ns")
            .map_err(|e| column("created_at_ns", e))?;
        let sponsored: bool = row.try_get("sponsored").map_err(|e| column("sponsored", e))?;
        let sponsored_label: Option<String> = row
            .try_get("sponsored_label")
            .map_err(|e| column("sponsored_label", e))?;

        let kind = ContentKind::from_str(&kind).map_err(StoreError::InvalidRow)?;
        let created_at = DateTime::<Utc>::from_timestamp_nanos(created_at_ns);
        let sponsored_label = sponsored_label.filter(|_| sponsored);

        Ok(match kind {
            ContentKind::Article => ContentItem::Article(Article {
                id,
                title,
                company_id,
                category_id,
                created_at,
                sponsored,
                sponsored_label,
            }),
            ContentKind::CampaignReview => ContentItem::CampaignReview(CampaignReview {
                id,
                title,
                company_id,
                created_at,
                sponsored,
                sponsored_label,
            }),
        })
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<ContentItem>, StoreError> {
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);

        let rows = sqlx::query(LIST_SQL)
            .bind(query.kind.as_str())
            .bind(query.sponsored)
            .bind(query.company_id.as_deref())
            .bind(query.category_id.as_deref())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("list {} items: {e}", query.kind)))?;

        debug!(
            kind = %query.kind,
            sponsored = query.sponsored,
            rows = rows.len(),
            "Listed content items"
        );
        rows.iter().map(Self::row_to_item).collect()
    }

    async fn insert(&self, item: ContentItem) -> Result<(), StoreError> {
        let item = item.normalized();
        let created_at_ns = item.created_at().timestamp_nanos_opt().ok_or_else(|| {
            StoreError::QueryFailed(format!(
                "created_at {} is outside the storable range",
                item.created_at()
            ))
        })?;

        sqlx::query(
            r#"
            INSERT INTO content_items
                (kind, id, title, company_id, category_id, created_at_ns, sponsored, sponsored_label)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(kind, id) DO UPDATE SET
                title = excluded.title,
                company_id = excluded.company_id,
                category_id = excluded.category_id,
                created_at_ns = excluded.created_at_ns,
                sponsored = excluded.sponsored,
                sponsored_label = excluded.sponsored_label
            "#,
        )
        .bind(item.kind().as_str())
        .bind(item.id())
        .bind(item.title())
        .bind(item.company_id())
        .bind(item.category_id())
        .bind(created_at_ns)
        .bind(item.is_sponsored())
        .bind(item.sponsored_label())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("INSERT failed: {e}")))?;

        debug!(kind = %item.kind(), id = item.id(), "Stored content item");
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM content_items")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("COUNT: {e}")))?;

        let cnt: i64 = row
            .try_get("cnt")
            .map_err(|e| StoreError::InvalidRow(format!("cnt column: {e}")))?;

        Ok(cnt as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn test_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:", 4).await.unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn article(id: &str, t: i64) -> Article {
        Article::new(id, format!("Article {id}"), at(t))
    }

    fn review(id: &str, t: i64) -> CampaignReview {
        CampaignReview::new(id, format!("Review {id}"), at(t))
    }

    #[tokio::test]
    async fn insert_and_list_round_trip() {
        let db = test_store().await;
        let original: ContentItem = article("a1", 100)
            .with_company("acme")
            .with_category("news")
            .sponsored(Some("Partner content".into()))
            .into();
        db.insert(original.clone()).await.unwrap();

        let results = db
            .list_items(&ItemQuery::new(ContentKind::Article, true, 10))
            .await
            .unwrap();
        assert_eq!(results, vec![original]);
    }

    #[tokio::test]
    async fn orders_by_recency_then_id() {
        let db = test_store().await;
        db.insert(article("a", 50).into()).await.unwrap();
        db.insert(article("c", 10).into()).await.unwrap();
        db.insert(article("b", 50).into()).await.unwrap();
        db.insert(article("d", 70).into()).await.unwrap();

        let results = db
            .list_items(&ItemQuery::new(ContentKind::Article, false, 10))
            .await
            .unwrap();
        let ids: Vec<&str> = results.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["d", "b", "a", "c"]);
    }

    #[tokio::test]
    async fn respects_limit() {
        let db = test_store().await;
        for i in 0..20 {
            db.insert(article(&format!("a{i:02}"), i).into()).await.unwrap();
        }

        let results = db
            .list_items(&ItemQuery::new(ContentKind::Article, false, 5))
            .await
            .unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results[0].id(), "a19");
    }

    #[tokio::test]
    async fn filters_company_and_category() {
        let db = test_store().await;
        db.insert(article("a1", 1).with_company("acme").with_category("news").into())
            .await
            .unwrap();
        db.insert(article("a2", 2).with_company("acme").into())
            .await
            .unwrap();
        db.insert(article("a3", 3).with_company("globex").with_category("news").into())
            .await
            .unwrap();

        let by_company = db
            .list_items(&ItemQuery::new(ContentKind::Article, false, 10).company(Some("acme")))
            .await
            .unwrap();
        assert_eq!(by_company.len(), 2);

        let by_both = db
            .list_items(
                &ItemQuery::new(ContentKind::Article, false, 10)
                    .company(Some("acme"))
                    .category(Some("news")),
            )
            .await
            .unwrap();
        assert_eq!(by_both.len(), 1);
        assert_eq!(by_both[0].id(), "a1");
    }

    #[tokio::test]
    async fn reviews_have_no_category() {
        let db = test_store().await;
        db.insert(review("r1", 5).with_company("acme").into())
            .await
            .unwrap();

        let unfiltered = db
            .list_items(&ItemQuery::new(ContentKind::CampaignReview, false, 10))
            .await
            .unwrap();
        assert_eq!(unfiltered.len(), 1);
        assert_eq!(unfiltered[0].category_id(), None);

        let with_category = db
            .list_items(
                &ItemQuery::new(ContentKind::CampaignReview, false, 10).category(Some("news")),
            )
            .await
            .unwrap();
        assert!(with_category.is_empty());
    }

    #[tokio::test]
    async fn upsert_on_conflict() {
        let db = test_store().await;
        db.insert(article("a1", 1).into()).await.unwrap();
        db.insert(Article::new("a1", "Version 2", at(1)).into())
            .await
            .unwrap();
        db.insert(review("a1", 1).into()).await.unwrap();

        assert_eq!(db.count().await.unwrap(), 2);
        let articles = db
            .list_items(&ItemQuery::new(ContentKind::Article, false, 10))
            .await
            .unwrap();
        assert_eq!(articles[0].title(), "Version 2");
    }

    #[tokio::test]
    async fn organic_label_is_dropped() {
        let db = test_store().await;
        let mut organic = article("a1", 1);
        organic.sponsored_label = Some("leftover".into());
        db.insert(organic.into()).await.unwrap();

        let results = db
            .list_items(&ItemQuery::new(ContentKind::Article, false, 10))
            .await
            .unwrap();
        let ContentItem::Article(a) = &results[0] else {
            panic!("expected article");
        };
        assert!(a.sponsored_label.is_none());
    }

    #[tokio::test]
    async fn sub_second_timestamps_order_correctly() {
        let db = test_store().await;
        let base = at(1_700_000_000);
        db.insert(Article::new("early", "t", base).into()).await.unwrap();
        db.insert(
            Article::new("late", "t", base + chrono::Duration::microseconds(1)).into(),
        )
        .await
        .unwrap();

        let results = db
            .list_items(&ItemQuery::new(ContentKind::Article, false, 10))
            .await
            .unwrap();
        assert_eq!(results[0].id(), "late");
    }

    #[tokio::test]
    async fn nanosecond_timestamps_survive_round_trip() {
        let db = test_store().await;
        let original: ContentItem = Article::new(
            "precise",
            "t",
            Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap(),
        )
        .into();
        db.insert(original.clone()).await.unwrap();

        let results = db
            .list_items(&ItemQuery::new(ContentKind::Article, false, 10))
            .await
            .unwrap();
        assert_eq!(results, vec![original]);
    }

    #[tokio::test]
    async fn sub_microsecond_order_matches_in_memory() {
        let base = at(1_700_000_000);
        // "a" is newer by one nanosecond; id order alone would put "b" first.
        let items: Vec<ContentItem> = vec![
            Article::new("a", "t", base + chrono::Duration::nanoseconds(1)).into(),
            Article::new("b", "t", base).into(),
        ];

        let db = test_store().await;
        let memory = crate::InMemoryStore::new();
        for item in &items {
            db.insert(item.clone()).await.unwrap();
            memory.insert(item.clone()).await.unwrap();
        }

        let query = ItemQuery::new(ContentKind::Article, false, 10);
        let from_sqlite = db.list_items(&query).await.unwrap();
        let from_memory = memory.list_items(&query).await.unwrap();
        assert_eq!(from_sqlite[0].id(), "a");
        assert_eq!(from_sqlite, from_memory);
    }

    #[tokio::test]
    async fn rejects_unstorable_timestamp() {
        let db = test_store().await;
        let far_future = Utc.with_ymd_and_hms(2500, 1, 1, 0, 0, 0).unwrap();
        let err = db
            .insert(Article::new("late", "t", far_future).into())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::QueryFailed(_)));
    }

    #[tokio::test]
    async fn count_empty() {
        let db = test_store().await;
        assert_eq!(db.count().await.unwrap(), 0);
        assert_eq!(db.name(), "sqlite");
    }
}
