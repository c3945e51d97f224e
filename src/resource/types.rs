//! Types shared by every resource kind

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;
use crate::resource::Resource;

/// Pagination metadata reported by list endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of records across all pages
    #[serde(default)]
    pub total: u64,

    /// Current page, starting at 1
    #[serde(default)]
    pub page: u32,

    /// Page size
    #[serde(default)]
    pub limit: u32,

    /// Number of pages
    #[serde(default)]
    pub pages: u32,
}

impl Pagination {
    /// Metadata for a single page holding `len` records
    pub fn single_page(len: usize) -> Self {
        Self {
            total: len as u64,
            page: 1,
            limit: len as u32,
            pages: if len == 0 { 0 } else { 1 },
        }
    }
}

/// Wire shapes accepted by list endpoints
#[derive(Deserialize)]
#[serde(untagged)]
enum ListPayload<T> {
    Paged { data: Vec<T>, pagination: Pagination },
    Bare(Vec<T>),
}

/// One page of records in server order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceList<T> {
    /// The records, never reordered client-side
    #[serde(rename = "data")]
    pub items: Vec<T>,

    /// Pagination metadata
    pub pagination: Pagination,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ResourceList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ListPayload::deserialize(deserializer)? {
            ListPayload::Paged { data, pagination } => Self {
                items: data,
                pagination,
            },
            ListPayload::Bare(items) => {
                let pagination = Pagination::single_page(items.len());
                Self { items, pagination }
            }
        })
    }
}

impl<T> Default for ResourceList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
        }
    }
}

impl<T> ResourceList<T> {
    /// Create a list from records and metadata
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Records on this page
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Total records across all pages
    pub fn total(&self) -> u64 {
        self.pagination.total
    }
}

impl<T: Resource> ResourceList<T> {
    /// The record with identifier `id`, if it is on this page
    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }
}

/// Query for a list endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Page, starting at 1
    pub page: u32,

    /// Page size
    pub limit: u32,

    /// Extra filters such as `category`
    pub filters: Vec<(String, String)>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

impl ListParams {
    /// Create params for one page
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            filters: Vec::new(),
        }
    }

    /// Add a filter
    pub fn with_filter(mut self, key: &str, value: &str) -> Self {
        self.filters.push((key.to_string(), value.to_string()));
        self
    }

    /// Reject a zero page or page size
    pub fn validate(&self) -> Result<(), Error> {
        if self.page < 1 {
            return Err(Error::invalid_input("page must be at least 1"));
        }
        if self.limit == 0 {
            return Err(Error::invalid_input("limit must be greater than 0"));
        }
        Ok(())
    }

    /// Query pairs in request order
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        query.extend(self.filters.iter().cloned());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_paged_payload() {
        let list: ResourceList<serde_json::Value> = serde_json::from_value(json!({
            "data": [{"_id": "a"}, {"_id": "b"}],
            "pagination": {"total": 12, "page": 1, "limit": 2, "pages": 6}
        }))
        .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.total(), 12);
        assert_eq!(list.pagination.pages, 6);
    }

    #[test]
    fn reads_bare_array() {
        let list: ResourceList<serde_json::Value> =
            serde_json::from_value(json!([{"_id": "a"}, {"_id": "b"}, {"_id": "c"}])).unwrap();

        assert_eq!(list.pagination, Pagination::single_page(3));
        assert_eq!(list.pagination.pages, 1);
        assert_eq!(Pagination::single_page(0).pages, 0);
    }

    #[test]
    fn list_params_bounds() {
        assert!(ListParams::new(1, 10).validate().is_ok());
        assert!(matches!(
            ListParams::new(0, 10).validate(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            ListParams::new(1, 0).validate(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn query_keeps_filters_after_paging() {
        let query = ListParams::new(2, 5).with_filter("category", "Backend").to_query();
        assert_eq!(
            query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "5".to_string()),
                ("category".to_string(), "Backend".to_string()),
            ]
        );
    }
}
