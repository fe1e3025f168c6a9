use std::{cmp::Ordering, collections::BTreeMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{RepoResult, Repository};
use crate::{
    models::{Category, CategoryDraft, Post, PostDraft},
    pagination::{Page, PageRequest, PostSortField, SortDirection},
};

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    posts: BTreeMap<i64, Post>,
    last_category_id: i64,
    last_post_id: i64,
}

/// InMemoryRepository
///
/// A `Repository` held entirely in process memory, used by the unit and router tests so
/// they run without PostgreSQL. Ids start at 1 and are never reused. Unlike the database
/// schema it does not enforce the posts → categories foreign key; the services check
/// that themselves.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_posts(a: &Post, b: &Post, field: PostSortField) -> Ordering {
    match field {
        PostSortField::Id => a.id.cmp(&b.id),
        PostSortField::Title => a.title.cmp(&b.title),
        PostSortField::Description => a.description.cmp(&b.description),
        PostSortField::Content => a.content.cmp(&b.content),
        PostSortField::CategoryId => a.category_id.cmp(&b.category_id),
        PostSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        PostSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create_category(&self, draft: CategoryDraft) -> RepoResult<Category> {
        let mut tables = self.tables.write().await;
        tables.last_category_id += 1;
        let category = Category {
            id: tables.last_category_id,
            name: draft.name,
            description: draft.description,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: i64) -> RepoResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> RepoResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn update_category(
        &self,
        id: i64,
        draft: CategoryDraft,
    ) -> RepoResult<Option<Category>> {
        let mut tables = self.tables.write().await;
        Ok(tables.categories.get_mut(&id).map(|category| {
            category.name = draft.name;
            category.description = draft.description;
            category.clone()
        }))
    }

    async fn delete_category(&self, id: i64) -> RepoResult<bool> {
        Ok(self.tables.write().await.categories.remove(&id).is_some())
    }

    async fn count_posts_in_category(&self, category_id: i64) -> RepoResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .posts
            .values()
            .filter(|post| post.category_id == category_id)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn create_post(&self, draft: PostDraft) -> RepoResult<Post> {
        let mut tables = self.tables.write().await;
        tables.last_post_id += 1;
        let now = Utc::now();
        let post = Post {
            id: tables.last_post_id,
            title: draft.title,
            description: draft.description,
            content: draft.content,
            category_id: draft.category_id,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> RepoResult<Option<Post>> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn list_posts(&self, page: PageRequest) -> RepoResult<Page<Post>> {
        let mut posts: Vec<Post> = self.tables.read().await.posts.values().cloned().collect();

        posts.sort_by(|a, b| {
            let ordering = compare_posts(a, b, page.sort_by);
            let ordering = match page.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        let total_elements = i64::try_from(posts.len()).unwrap_or(i64::MAX);
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.page_size).unwrap_or(usize::MAX);

        Ok(Page {
            items: posts.into_iter().skip(offset).take(limit).collect(),
            total_elements,
        })
    }

    async fn list_posts_by_category(&self, category_id: i64) -> RepoResult<Vec<Post>> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|post| post.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn update_post(&self, id: i64, draft: PostDraft) -> RepoResult<Option<Post>> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.get_mut(&id).map(|post| {
            post.title = draft.title;
            post.description = draft.description;
            post.content = draft.content;
            post.category_id = draft.category_id;
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete_post(&self, id: i64) -> RepoResult<bool> {
        Ok(self.tables.write().await.posts.remove(&id).is_some())
    }
}
