use crate::error::{AppError, AppResult};

// Defaults applied to omitted `GET /api/v1/posts` query parameters.
pub const DEFAULT_PAGE_NUMBER: i64 = 0;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const DEFAULT_SORT_BY: &str = "id";
pub const DEFAULT_SORT_DIRECTION: &str = "asc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only a case-insensitive "desc" sorts descending; every other value ascends.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// PostSortField
///
/// The post properties a listing may be ordered by. Parsing through this enum is what keeps
/// the client-supplied `sortBy` out of the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSortField {
    #[default]
    Id,
    Title,
    Description,
    Content,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}

impl PostSortField {
    /// Accepts the wire (camelCase) property names and their column (snake_case) spelling.
    pub fn parse(raw: &str) -> Option<Self> {
        let field = match raw {
            "id" => PostSortField::Id,
            "title" => PostSortField::Title,
            "description" => PostSortField::Description,
            "content" => PostSortField::Content,
            "categoryId" | "category_id" => PostSortField::CategoryId,
            "createdAt" | "created_at" => PostSortField::CreatedAt,
            "updatedAt" | "updated_at" => PostSortField::UpdatedAt,
            _ => return None,
        };
        Some(field)
    }

    pub fn column(self) -> &'static str {
        match self {
            PostSortField::Id => "id",
            PostSortField::Title => "title",
            PostSortField::Description => "description",
            PostSortField::Content => "content",
            PostSortField::CategoryId => "category_id",
            PostSortField::CreatedAt => "created_at",
            PostSortField::UpdatedAt => "updated_at",
        }
    }
}

/// PageRequest
///
/// A validated paging and sorting request, handed to the repository as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_no: i64,
    pub page_size: i64,
    pub sort_by: PostSortField,
    pub direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_no: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: PostSortField::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl PageRequest {
    /// Validates raw query values.
    ///
    /// `page_no` must be non-negative and `page_size` positive. An unknown `sort_by` is
    /// rejected rather than silently replaced, while `sort_dir` never fails.
    pub fn new(page_no: i64, page_size: i64, sort_by: &str, sort_dir: &str) -> AppResult<Self> {
        if page_no < 0 {
            return Err(AppError::BadRequest(
                "pageNo must not be less than zero".to_string(),
            ));
        }
        if page_size < 1 {
            return Err(AppError::BadRequest(
                "pageSize must not be less than one".to_string(),
            ));
        }
        let sort_by = PostSortField::parse(sort_by).ok_or_else(|| {
            AppError::BadRequest(format!("unsupported sort property '{sort_by}'"))
        })?;

        Ok(Self {
            page_no,
            page_size,
            sort_by,
            direction: SortDirection::parse(sort_dir),
        })
    }

    /// Number of rows preceding this page.
    pub fn offset(&self) -> i64 {
        self.page_no.saturating_mul(self.page_size)
    }

    pub fn total_pages(&self, total_elements: i64) -> i64 {
        total_pages(total_elements, self.page_size)
    }

    /// Mirrors "has no next page": true for every page at or beyond the last one.
    pub fn is_last(&self, total_elements: i64) -> bool {
        self.page_no.saturating_add(1) >= self.total_pages(total_elements)
    }
}

/// One slice of an ordered result set plus the size of the whole set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_elements: i64,
}

/// `ceil(total_elements / page_size)`, zero for an empty set.
pub fn total_pages(total_elements: i64, page_size: i64) -> i64 {
    if page_size <= 0 || total_elements <= 0 {
        return 0;
    }
    (total_elements - 1) / page_size + 1
}
