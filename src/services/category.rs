use crate::{
    error::{AppError, AppResult},
    models::CategoryDto,
    repository::RepositoryState,
};

/// CategoryService
///
/// Category CRUD over the injected repository.
#[derive(Clone)]
pub struct CategoryService {
    repo: RepositoryState,
}

impl CategoryService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    pub async fn add_category(&self, dto: &CategoryDto) -> AppResult<CategoryDto> {
        let category = self.repo.create_category(dto.to_draft()).await?;
        tracing::info!(category_id = category.id, "category created");
        Ok(category.into())
    }

    pub async fn get_category(&self, id: i64) -> AppResult<CategoryDto> {
        self.repo
            .get_category(id)
            .await?
            .map(CategoryDto::from)
            .ok_or_else(|| AppError::not_found("Category", id))
    }

    pub async fn get_all_categories(&self) -> AppResult<Vec<CategoryDto>> {
        let categories = self.repo.list_categories().await?;
        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }

    pub async fn update_category(&self, dto: &CategoryDto, id: i64) -> AppResult<CategoryDto> {
        let category = self
            .repo
            .update_category(id, dto.to_draft())
            .await?
            .ok_or_else(|| AppError::not_found("Category", id))?;
        tracing::info!(category_id = id, "category updated");
        Ok(category.into())
    }

    /// delete_category
    ///
    /// Refuses with `Conflict` while any post still belongs to the category, so deleting
    /// never orphans or cascades posts.
    pub async fn delete_category(&self, id: i64) -> AppResult<()> {
        if self.repo.get_category(id).await?.is_none() {
            return Err(AppError::not_found("Category", id));
        }

        let dependent_posts = self.repo.count_posts_in_category(id).await?;
        if dependent_posts > 0 {
            tracing::warn!(category_id = id, dependent_posts, "category delete refused");
            return Err(AppError::Conflict(format!(
                "Category with id : '{id}' still has {dependent_posts} post(s)"
            )));
        }

        if !self.repo.delete_category(id).await? {
            return Err(AppError::not_found("Category", id));
        }
        tracing::info!(category_id = id, "category deleted");
        Ok(())
    }
}
