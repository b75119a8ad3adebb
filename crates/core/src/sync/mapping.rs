//! Column-map handling: identifier validation, payload assembly, auto-mapping

use tracing::debug;

use partsync_domain::{ColumnMap, ColumnRole, PartSyncError, PropertyUpdate, Result, SheetRow};

use crate::registry;

/// Find the single column mapped to the identifier role.
///
/// # Errors
/// Returns `PartSyncError::Config` when no column (or more than one)
/// carries the identifier role. This is the only fail-fast path of a
/// sync run.
pub fn identifier_column(column_map: &ColumnMap) -> Result<&str> {
    let mut identifiers =
        column_map.iter().filter(|(_, role)| **role == ColumnRole::Identifier).map(|(name, _)| name);

    let column = identifiers.next().ok_or_else(|| {
        PartSyncError::Config("no column is mapped to the part reference".to_string())
    })?;

    if identifiers.next().is_some() {
        return Err(PartSyncError::Config(
            "more than one column is mapped to the part reference".to_string(),
        ));
    }

    Ok(column)
}

/// Build the property payload for one row.
///
/// Every mapped property column with a defined cell value is resolved
/// through the registry; names without a registry entry are dropped with
/// a notice, never failed. An empty cell still counts as a defined value.
pub fn build_payload(row: &SheetRow, column_map: &ColumnMap) -> Vec<PropertyUpdate> {
    let mut updates = Vec::new();

    for (column, role) in column_map {
        let ColumnRole::Property(name) = role else { continue };
        let Some(value) = row.value(column) else { continue };

        match registry::resolve_updatable(name) {
            Some(property_id) => updates.push(PropertyUpdate {
                property_id: property_id.to_string(),
                value: value.to_string(),
            }),
            None => {
                debug!(property = %name, row_id = %row.id, "property has no registry entry; dropped from payload");
            }
        }
    }

    updates
}

/// Propose a column map for freshly imported headers.
///
/// A header containing `url` (case-insensitive) is assumed to hold the
/// part reference; everything else starts out ignored until the user
/// maps it.
pub fn auto_map(headers: &[String]) -> ColumnMap {
    headers
        .iter()
        .map(|header| {
            let role = if header.to_lowercase().contains("url") {
                ColumnRole::Identifier
            } else {
                ColumnRole::Ignore
            };
            (header.clone(), role)
        })
        .collect()
}
