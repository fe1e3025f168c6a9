use async_trait::async_trait;
use sqlx::{PgPool, Postgres, query_builder::QueryBuilder};

use super::{RepoResult, Repository};
use crate::{
    models::{Category, CategoryDraft, Post, PostDraft},
    pagination::{Page, PageRequest, PostSortField},
};

/// PostgresRepository
///
/// The `Repository` implementation backed by PostgreSQL. The schema lives in `migrations/`.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn create_category(&self, draft: CategoryDraft) -> RepoResult<Category> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, description) VALUES ($1, $2) \
             RETURNING id, name, description",
        )
        .bind(draft.name)
        .bind(draft.description)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_category(&self, id: i64) -> RepoResult<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name, description FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_categories(&self) -> RepoResult<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name, description FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    async fn update_category(
        &self,
        id: i64,
        draft: CategoryDraft,
    ) -> RepoResult<Option<Category>> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2, description = $3 WHERE id = $1 \
             RETURNING id, name, description",
        )
        .bind(id)
        .bind(draft.name)
        .bind(draft.description)
        .fetch_optional(&self.pool)
        .await
    }

    /// Fails with a foreign key violation while posts still reference the category.
    async fn delete_category(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_posts_in_category(&self, category_id: i64) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn create_post(&self, draft: PostDraft) -> RepoResult<Post> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, description, content, category_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, title, description, content, category_id, created_at, updated_at
            "#,
        )
        .bind(draft.title)
        .bind(draft.description)
        .bind(draft.content)
        .bind(draft.category_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_post(&self, id: i64) -> RepoResult<Option<Post>> {
        sqlx::query_as::<_, Post>(
            "SELECT id, title, description, content, category_id, created_at, updated_at \
             FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// list_posts
    ///
    /// Builds the ORDER BY clause with QueryBuilder. Only the column name of a parsed
    /// `PostSortField` is pushed as text; limit and offset are bound parameters. The page
    /// and the count share one REPEATABLE READ snapshot so they always agree.
    async fn list_posts(&self, page: PageRequest) -> RepoResult<Page<Post>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, title, description, content, category_id, created_at, updated_at \
             FROM posts ORDER BY ",
        );
        builder
            .push(page.sort_by.column())
            .push(" ")
            .push(page.direction.as_sql());
        if page.sort_by != PostSortField::Id {
            builder.push(", id ASC");
        }
        builder
            .push(" LIMIT ")
            .push_bind(page.page_size)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let items = builder
            .build_query_as::<Post>()
            .fetch_all(&mut *tx)
            .await?;

        let total_elements = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Page {
            items,
            total_elements,
        })
    }

    async fn list_posts_by_category(&self, category_id: i64) -> RepoResult<Vec<Post>> {
        sqlx::query_as::<_, Post>(
            "SELECT id, title, description, content, category_id, created_at, updated_at \
             FROM posts WHERE category_id = $1 ORDER BY id",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_post(&self, id: i64, draft: PostDraft) -> RepoResult<Option<Post>> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $2,
                description = $3,
                content = $4,
                category_id = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, content, category_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(draft.title)
        .bind(draft.description)
        .bind(draft.content)
        .bind(draft.category_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_post(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
