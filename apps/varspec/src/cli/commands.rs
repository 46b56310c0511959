//! # CLI Command Implementations
//!
//! Each command has a pure half that computes a result (used by tests) and a
//! `cmd_*` wrapper that loads inputs and prints.

use crate::api::{self, AppState};
use crate::config::VarspecConfig;
use crate::error::AppError;
use crate::kdp::{KdpService, OrderLookup};
use crate::store::{MAX_DOCUMENT_FILE_SIZE, OrderStore, read_json_file};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use varspec_core::{
    KdpVariantSpecification, OrderQuery, PrinsVariantSpecification, SelectionMode,
    TestObjectOrder, Validator, VariantSpecification, VariantSpecificationVersion, VarspecError,
    from_alternate, from_external, predicate::VARIANT_COLLECTION, require_current, to_external,
};

use super::Dialect;

// =============================================================================
// SHARED HELPERS
// =============================================================================

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| VarspecError::SerializationError(e.to_string()).into())
}

/// Load the order store from `--orders` or `[data] orders_file`.
pub fn load_store(config: &VarspecConfig, orders: Option<&Path>) -> Result<OrderStore, AppError> {
    let path = orders
        .or(config.data.orders_file.as_deref())
        .ok_or(crate::config::ConfigError::MissingKey("data.orders_file"))?;
    OrderStore::load(path)
}

/// Build the KDP service when `[kdp]` is configured.
fn kdp_service(config: &VarspecConfig, store: Arc<OrderStore>) -> Result<Option<KdpService>, AppError> {
    if !config.kdp.is_configured() {
        return Ok(None);
    }
    KdpService::from_config(&config.kdp, store).map(Some)
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    config: &VarspecConfig,
    host: Option<String>,
    port: Option<u16>,
    orders: Option<&Path>,
) -> Result<(), AppError> {
    let store = match orders.or(config.data.orders_file.as_deref()) {
        Some(path) => OrderStore::load(path)?,
        None => {
            tracing::warn!("No orders file configured, serving an empty order store");
            OrderStore::default()
        }
    };
    let store = Arc::new(store);
    let kdp = kdp_service(config, Arc::clone(&store))?;
    if kdp.is_none() {
        tracing::warn!("No [kdp] section configured, downgrade endpoint disabled");
    }

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    println!("varspec server starting...");
    println!();
    println!("Configuration:");
    println!("  Host:   {}", host);
    println!("  Port:   {}", port);
    println!("  Orders: {}", store.len());
    println!("  KDP:    {}", if kdp.is_some() { "configured" } else { "disabled" });
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let state = AppState {
        store,
        kdp: kdp.map(Arc::new),
    };
    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, state).await
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Orders of `store` matching `query`.
pub fn search_orders<'a>(
    store: &'a OrderStore,
    query: &OrderQuery,
) -> Result<Vec<&'a TestObjectOrder>, AppError> {
    Ok(store.search(query)?)
}

/// Filter orders and print the matches.
pub fn cmd_search(
    config: &VarspecConfig,
    orders: Option<&Path>,
    query: OrderQuery,
    json_mode: bool,
) -> Result<(), AppError> {
    let store = load_store(config, orders)?;
    let matches = search_orders(&store, &query)?;

    if json_mode {
        let output = serde_json::json!({
            "count": matches.len(),
            "total": store.len(),
            "orders": matches,
        });
        println!("{}", to_pretty_json(&output)?);
        return Ok(());
    }

    println!("Matched {} of {} orders", matches.len(), store.len());
    for order in matches {
        println!(
            "  {:<10} {:<6} {:<8} {}",
            order.test_object_order_id,
            order.project.as_deref().unwrap_or("-"),
            order.series.as_deref().unwrap_or("-"),
            order.status.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

// =============================================================================
// LATEST COMMAND
// =============================================================================

/// The current variant specification version of an order.
pub fn current_version<'a>(
    store: &'a OrderStore,
    id: &str,
    mode: SelectionMode,
) -> Result<(&'a TestObjectOrder, &'a VariantSpecificationVersion), AppError> {
    let order = store
        .get(id)
        .ok_or_else(|| AppError::OrderNotFound(id.to_string()))?;
    let version = require_current(
        &order.variant_specification_versions,
        mode,
        &order.test_object_order_id,
        VARIANT_COLLECTION,
    )?;
    Ok((order, version))
}

/// Print an order's current version.
pub fn cmd_latest(
    config: &VarspecConfig,
    orders: Option<&Path>,
    id: &str,
    mode: SelectionMode,
    json_mode: bool,
) -> Result<(), AppError> {
    let store = load_store(config, orders)?;
    let (order, version) = current_version(&store, id, mode)?;
    let compact = match version.variant_specification.as_ref() {
        Some(spec) => spec.compact_assignments()?,
        None => "{}".to_string(),
    };

    if json_mode {
        let output = serde_json::json!({
            "test_object_order_id": order.test_object_order_id,
            "mode": mode,
            "version": version,
            "compact_assignments": compact,
        });
        println!("{}", to_pretty_json(&output)?);
        return Ok(());
    }

    println!("Order {} ({} mode)", order.test_object_order_id, mode);
    println!("  {}", version.summary());
    if let Some(vcu_v2) = version.is_vcu_v2() {
        println!("  VCU v2: {}", vcu_v2);
    }
    println!("  Assignments: {}", compact);
    Ok(())
}

// =============================================================================
// TRANSLATE COMMAND
// =============================================================================

/// Translate the specification in `file` from `dialect`.
///
/// KDP and PRINS inputs become internal specifications; internal input
/// becomes KDP.
pub fn translate_file(dialect: Dialect, file: &Path) -> Result<serde_json::Value, AppError> {
    let to_value = |value: serde_json::Result<serde_json::Value>| {
        value.map_err(|e| AppError::from(VarspecError::SerializationError(e.to_string())))
    };

    match dialect {
        Dialect::Kdp => {
            let spec: KdpVariantSpecification = read_json_file(file, MAX_DOCUMENT_FILE_SIZE)?;
            let internal = from_external(&spec);
            Validator::validate_specification(&internal)?;
            to_value(serde_json::to_value(internal))
        }
        Dialect::Prins => {
            let spec: PrinsVariantSpecification = read_json_file(file, MAX_DOCUMENT_FILE_SIZE)?;
            let internal = from_alternate(&spec);
            Validator::validate_specification(&internal)?;
            to_value(serde_json::to_value(internal))
        }
        Dialect::Internal => {
            let spec: VariantSpecification = read_json_file(file, MAX_DOCUMENT_FILE_SIZE)?;
            Validator::validate_specification(&spec)?;
            to_value(serde_json::to_value(to_external(&spec)))
        }
    }
}

/// Translate and print as JSON.
pub fn cmd_translate(dialect: Dialect, file: &Path) -> Result<(), AppError> {
    let output = translate_file(dialect, file)?;
    println!("{}", to_pretty_json(&output)?);
    Ok(())
}

// =============================================================================
// COMPACT COMMAND
// =============================================================================

/// Compact assignment string of the internal specification in `file`.
pub fn compact_file(file: &Path) -> Result<String, AppError> {
    let spec: VariantSpecification = read_json_file(file, MAX_DOCUMENT_FILE_SIZE)?;
    Ok(spec.compact_assignments()?)
}

pub fn cmd_compact(file: &Path, json_mode: bool) -> Result<(), AppError> {
    let compact = compact_file(file)?;
    if json_mode {
        let output = serde_json::json!({ "compact_assignments": compact });
        println!("{}", to_pretty_json(&output)?);
    } else {
        println!("{}", compact);
    }
    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// One failed order.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationFailure {
    pub test_object_order_id: String,
    pub error: String,
}

/// Validate every order of `store`, returning the failures.
pub fn validate_orders(store: &OrderStore) -> Vec<ValidationFailure> {
    store
        .orders()
        .iter()
        .filter_map(|order| {
            Validator::validate_order(order)
                .err()
                .map(|e| ValidationFailure {
                    test_object_order_id: order.test_object_order_id.clone(),
                    error: e.to_string(),
                })
        })
        .collect()
}

/// Validate and print a report; any failure makes the command fail.
pub fn cmd_validate(
    config: &VarspecConfig,
    orders: Option<&Path>,
    json_mode: bool,
) -> Result<(), AppError> {
    let store = load_store(config, orders)?;
    let failures = validate_orders(&store);

    if json_mode {
        let output = serde_json::json!({
            "checked": store.len(),
            "failed": failures.len(),
            "failures": failures,
        });
        println!("{}", to_pretty_json(&output)?);
    } else {
        println!("Checked {} orders, {} failed", store.len(), failures.len());
        for failure in &failures {
            println!("  {}: {}", failure.test_object_order_id, failure.error);
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(AppError::Invalid(failures.len()))
    }
}

// =============================================================================
// DOWNGRADE COMMAND
// =============================================================================

/// Downgrade a standard specification, from a file or an order's current version.
///
/// Exactly one of `file` and `order_id` must be given; the KDP service is
/// built only after that check.
pub async fn cmd_downgrade(
    config: &VarspecConfig,
    orders: Option<&Path>,
    file: Option<&Path>,
    order_id: Option<&str>,
    mode: SelectionMode,
) -> Result<(), AppError> {
    let downloadable = downgrade(config, orders, file, order_id, mode).await?;
    println!("{}", to_pretty_json(&downloadable)?);
    Ok(())
}

/// The downloadable specification `cmd_downgrade` prints.
pub async fn downgrade(
    config: &VarspecConfig,
    orders: Option<&Path>,
    file: Option<&Path>,
    order_id: Option<&str>,
    mode: SelectionMode,
) -> Result<KdpVariantSpecification, AppError> {
    let source = match (order_id, file) {
        (Some(id), _) => DowngradeSource::Order(id),
        (None, Some(file)) => DowngradeSource::File(file),
        (None, None) => {
            return Err(VarspecError::ArgumentInvalid(
                "either --file or --order is required".to_string(),
            )
            .into());
        }
    };

    let store = Arc::new(match orders.or(config.data.orders_file.as_deref()) {
        Some(path) => OrderStore::load(path)?,
        None => OrderStore::default(),
    });
    let lookup: Arc<dyn OrderLookup> = store.clone();
    let kdp = KdpService::from_config(&config.kdp, lookup)?;

    match source {
        DowngradeSource::Order(id) => {
            let (order, version) = current_version(&store, id, mode)?;
            Ok(kdp.translate_version_to_downloadable(version, order).await?)
        }
        DowngradeSource::File(file) => {
            let standard: KdpVariantSpecification = read_json_file(file, MAX_DOCUMENT_FILE_SIZE)?;
            Ok(kdp.translate_to_downloadable(Some(&standard)).await?)
        }
    }
}

enum DowngradeSource<'a> {
    Order(&'a str),
    File(&'a Path),
}
