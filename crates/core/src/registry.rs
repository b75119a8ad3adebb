//! Property registry: canonical property names to Onshape property ids
//!
//! The registry is a fixed table built at process start. It is never
//! derived from user input, and a name missing from it is policy, not an
//! error: the property is excluded from outgoing payloads with a notice.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Default column label for the part reference on import/export
pub const PART_REFERENCE_COLUMN: &str = "Onshape Part URL";

/// Property names offered for catalog export, in column order
pub const EXPORTABLE_PROPERTIES: &[&str] = &[
    "Name",
    "Description",
    "Part Number",
    "Revision",
    "State",
    "Material",
    "Vendor",
    "Cost",
    "Weight",
    "Title 1",
    "Title 2",
    "Title 3",
];

// Standard Onshape property ids accepted by the metadata update endpoint.
// Material, Vendor, Cost, Weight, and the Titles are custom or calculated
// properties that the standard endpoint cannot set (Material needs a
// material-library assignment, Weight is computed), so they stay out of
// this table and get dropped from payloads.
static UPDATABLE_PROPERTY_IDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Name", "57f3fb8efa8c52439d51f041"),
        ("Description", "57f3fb8efa8c52439d51f044"),
        ("Part Number", "57f3fb8efa8c52439d51f047"),
        ("Revision", "57f3fb8efa8c52439d51f04a"),
        ("State", "57f3fb8efa8c52439d51f03b"),
    ])
});

/// Resolve a property name to the vendor id required for update calls.
///
/// Returns `None` for names the update endpoint cannot handle; callers
/// drop those from the payload without failing the row.
pub fn resolve_updatable(name: &str) -> Option<&'static str> {
    UPDATABLE_PROPERTY_IDS.get(name).copied()
}

/// Whether a property name can appear in an update payload.
pub fn is_updatable(name: &str) -> bool {
    UPDATABLE_PROPERTY_IDS.contains_key(name)
}
