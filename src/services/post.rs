use crate::{
    error::{AppError, AppResult},
    models::{PostDto, PostResponse},
    pagination::PageRequest,
    repository::RepositoryState,
};

/// PostService
///
/// Post CRUD and listing. Every write first resolves the referenced category so a post
/// can only ever point at an existing one.
#[derive(Clone)]
pub struct PostService {
    repo: RepositoryState,
}

impl PostService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    async fn ensure_category_exists(&self, category_id: i64) -> AppResult<()> {
        match self.repo.get_category(category_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("Category", category_id)),
        }
    }

    pub async fn create_post(&self, dto: &PostDto) -> AppResult<PostDto> {
        self.ensure_category_exists(dto.category_id).await?;
        let post = self.repo.create_post(dto.to_draft()).await?;
        tracing::info!(post_id = post.id, category_id = post.category_id, "post created");
        Ok(post.into())
    }

    /// get_all_post
    ///
    /// Wraps one page of posts in the `PostResponse` envelope. A page past the end comes
    /// back with empty `content` and `last = true`.
    pub async fn get_all_post(&self, page: PageRequest) -> AppResult<PostResponse> {
        let result = self.repo.list_posts(page).await?;
        tracing::debug!(
            page_no = page.page_no,
            page_size = page.page_size,
            returned = result.items.len(),
            total = result.total_elements,
            "listed posts"
        );

        Ok(PostResponse {
            content: result.items.into_iter().map(PostDto::from).collect(),
            page_no: page.page_no,
            page_size: page.page_size,
            total_elements: result.total_elements,
            total_pages: page.total_pages(result.total_elements),
            last: page.is_last(result.total_elements),
        })
    }

    pub async fn get_post_by_id(&self, id: i64) -> AppResult<PostDto> {
        self.repo
            .get_post(id)
            .await?
            .map(PostDto::from)
            .ok_or_else(|| AppError::not_found("Post", id))
    }

    /// update_post
    ///
    /// Full replace of title, description, content and category.
    pub async fn update_post(&self, dto: &PostDto, id: i64) -> AppResult<PostDto> {
        if self.repo.get_post(id).await?.is_none() {
            return Err(AppError::not_found("Post", id));
        }
        self.ensure_category_exists(dto.category_id).await?;

        let post = self
            .repo
            .update_post(id, dto.to_draft())
            .await?
            .ok_or_else(|| AppError::not_found("Post", id))?;
        tracing::info!(post_id = id, "post updated");
        Ok(post.into())
    }

    pub async fn delete_post_by_id(&self, id: i64) -> AppResult<()> {
        if !self.repo.delete_post(id).await? {
            return Err(AppError::not_found("Post", id));
        }
        tracing::info!(post_id = id, "post deleted");
        Ok(())
    }

    pub async fn get_posts_by_category_id(&self, category_id: i64) -> AppResult<Vec<PostDto>> {
        self.ensure_category_exists(category_id).await?;
        let posts = self.repo.list_posts_by_category(category_id).await?;
        Ok(posts.into_iter().map(PostDto::from).collect())
    }
}
