use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Page sizes offered by the winners table
pub const PAGE_SIZES: [u32; 5] = [5, 10, 20, 50, 100];

#[derive(Debug, Clone, Copy, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be >= 1".to_string());
        }
        if !PAGE_SIZES.contains(&self.page_size) {
            return Err(format!("page_size must be one of {:?}", PAGE_SIZES));
        }
        Ok(())
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.page_size as usize
    }

    pub fn limit(&self) -> usize {
        self.page_size as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(page_size.max(1) as u64) as u32;
        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, page_size: u32, total_items: u64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(page, page_size, total_items),
        }
    }

    /// Slices an already fetched list; pages past the end come back empty.
    pub fn from_items(items: Vec<T>, params: &PaginationParams) -> Self {
        let total_items = items.len() as u64;
        let data = items
            .into_iter()
            .skip(params.offset())
            .take(params.limit())
            .collect();
        Self::new(data, params.page, params.page_size, total_items)
    }
}

/// Failure body returned by the gateway functions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_must_be_offered() {
        assert!(PaginationParams::new(1, 10).validate().is_ok());
        assert!(PaginationParams::new(1, 7).validate().is_err());
        assert!(PaginationParams::new(0, 10).validate().is_err());
    }

    #[test]
    fn test_from_items_slices_requested_page() {
        let items: Vec<u32> = (1..=23).collect();

        let page = PaginatedResponse::from_items(items.clone(), &PaginationParams::new(3, 10));
        assert_eq!(page.data, vec![21, 22, 23]);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_previous());
        assert!(!page.pagination.has_next());

        let past_end = PaginatedResponse::from_items(items, &PaginationParams::new(9, 10));
        assert!(past_end.data.is_empty());
    }

    #[test]
    fn test_empty_list_has_no_pages() {
        let page = PaginatedResponse::<u32>::from_items(Vec::new(), &PaginationParams::default());
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_next());
    }
}
