//! # Order Store
//!
//! In-memory test object orders loaded from a JSON file, indexed by
//! upper-cased order id.

use crate::error::{AppError, KdpError};
use crate::kdp::OrderLookup;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use varspec_core::{OrderQuery, TestObjectOrder, VarspecError, filter_orders};

// =============================================================================
// FILE LIMITS
// =============================================================================

/// Maximum size of an orders file (100 MB).
pub const MAX_ORDERS_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Maximum size of a single specification document (10 MB).
pub const MAX_DOCUMENT_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Validate file size before reading.
pub fn validate_file_size(path: &Path, max_size: u64) -> Result<(), AppError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| AppError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(AppError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize `path` and require it to be a regular file.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, AppError> {
    let canonical = path.canonicalize().map_err(|e| {
        AppError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(AppError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Read a JSON document after the path and size checks.
pub fn read_json_file<T: serde::de::DeserializeOwned>(
    path: &Path,
    max_size: u64,
) -> Result<T, AppError> {
    let canonical = validate_file_path(path)?;
    validate_file_size(&canonical, max_size)?;

    let content = std::fs::read_to_string(&canonical)
        .map_err(|e| AppError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
    serde_json::from_str(&content).map_err(|e| {
        VarspecError::SerializationError(format!("'{}': {}", path.display(), e)).into()
    })
}

// =============================================================================
// STORE
// =============================================================================

/// Read-only order collection.
#[derive(Debug, Default, Clone)]
pub struct OrderStore {
    orders: Vec<TestObjectOrder>,
    index: BTreeMap<String, usize>,
}

impl OrderStore {
    /// Build a store; later duplicates of an id are ignored.
    pub fn new(orders: Vec<TestObjectOrder>) -> Self {
        let mut kept = Vec::with_capacity(orders.len());
        let mut index = BTreeMap::new();

        for order in orders {
            let key = order.test_object_order_id.trim().to_uppercase();
            if index.contains_key(&key) {
                tracing::warn!(order = %order.test_object_order_id, "Duplicate order id ignored");
                continue;
            }
            index.insert(key, kept.len());
            kept.push(order);
        }

        Self {
            orders: kept,
            index,
        }
    }

    /// Load orders from a JSON array file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let orders: Vec<TestObjectOrder> = read_json_file(path, MAX_ORDERS_FILE_SIZE)?;
        let store = Self::new(orders);
        tracing::info!(path = %path.display(), orders = store.len(), "Order store loaded");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Order by id, ignoring case and surrounding whitespace.
    pub fn get(&self, test_object_order_id: &str) -> Option<&TestObjectOrder> {
        self.index
            .get(&test_object_order_id.trim().to_uppercase())
            .and_then(|&i| self.orders.get(i))
    }

    /// Every order matching `query`, in load order.
    pub fn search(&self, query: &OrderQuery) -> Result<Vec<&TestObjectOrder>, VarspecError> {
        filter_orders(&self.orders, query)
    }

    /// All orders in load order.
    pub fn orders(&self) -> &[TestObjectOrder] {
        &self.orders
    }
}

#[async_trait]
impl OrderLookup for OrderStore {
    async fn find_order(&self, test_object_order_id: &str) -> Result<TestObjectOrder, KdpError> {
        self.get(test_object_order_id)
            .cloned()
            .ok_or_else(|| KdpError::OrderNotFound(test_object_order_id.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn order(id: &str, project: &str) -> TestObjectOrder {
        TestObjectOrder {
            project: Some(project.to_string()),
            ..TestObjectOrder::new(id)
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let store = OrderStore::new(vec![order("AB123456", "P519")]);
        assert!(store.get("ab123456").is_some());
        assert!(store.get(" AB123456 ").is_some());
        assert!(store.get("ZZ999999").is_none());
    }

    #[test]
    fn duplicates_keep_first() {
        let store = OrderStore::new(vec![order("AB123456", "P519"), order("ab123456", "P536")]);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("AB123456").and_then(|o| o.project.as_deref()),
            Some("P519")
        );
    }

    #[test]
    fn search_filters_in_load_order() {
        let store = OrderStore::new(vec![
            order("AB000001", "P519"),
            order("AB000002", "P536"),
            order("AB000003", "p519"),
        ]);
        let query = OrderQuery {
            project: Some("P519".to_string()),
            ..OrderQuery::default()
        };
        let ids: Vec<&str> = store
            .search(&query)
            .expect("search")
            .iter()
            .map(|o| o.test_object_order_id.as_str())
            .collect();
        assert_eq!(ids, vec!["AB000001", "AB000003"]);
    }

    #[test]
    fn load_reads_json_array() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[{{"testObjectOrderId":"AB123456","project":"P519"}}]"#
        )
        .expect("write");

        let store = OrderStore::load(file.path()).expect("load");
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn load_rejects_directories_and_bad_json() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(matches!(OrderStore::load(dir.path()), Err(AppError::Io(_))));

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write");
        assert!(matches!(
            OrderStore::load(file.path()),
            Err(AppError::Core(VarspecError::SerializationError(_)))
        ));
    }

    #[tokio::test]
    async fn order_lookup_reports_missing_orders() {
        let store = OrderStore::new(vec![order("AB123456", "P519")]);
        assert!(store.find_order("ab123456").await.is_ok());
        assert!(matches!(
            store.find_order("ZZ999999").await,
            Err(KdpError::OrderNotFound(id)) if id == "ZZ999999"
        ));
    }
}
