//! Account-wide part catalog fetcher
//!
//! Walks every accessible document: default workspace, part-studio
//! elements, per-studio part metadata. Each part flattens into a
//! property map keyed by the exportable property names plus the part
//! reference URL, ready for sheet export. A failing document is logged
//! and skipped; the walk never aborts on one bad document.

use std::collections::HashMap;

use futures::future::join_all;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use partsync_core::registry::{EXPORTABLE_PROPERTIES, PART_REFERENCE_COLUMN};
use partsync_domain::{CatalogConfig, PartSyncError, Result};

use crate::api::OnshapeClient;

const PART_STUDIO_TYPE: &str = "PARTSTUDIO";

#[derive(Debug, Deserialize)]
struct DocumentList {
    items: Vec<Document>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    id: String,
    name: String,
    default_workspace: Option<Workspace>,
}

#[derive(Debug, Deserialize)]
struct Workspace {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Element {
    id: String,
    element_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudioMetadata {
    #[serde(default)]
    parts: Vec<PartMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartMetadata {
    part_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    properties: Vec<PartProperty>,
}

#[derive(Debug, Deserialize)]
struct PartProperty {
    name: String,
    #[serde(default)]
    value: Option<serde_json::Value>,
}

/// Fetch every part in the account as a flat property map per part.
///
/// Map keys are [`PART_REFERENCE_COLUMN`] plus [`EXPORTABLE_PROPERTIES`];
/// calculated properties (`Material`, `Weight`) export as `N/A`.
///
/// # Errors
/// Fails only when the initial document listing fails. Per-document
/// failures are logged and skipped.
#[instrument(skip(client, config))]
pub async fn fetch_all_parts(
    client: &OnshapeClient,
    config: &CatalogConfig,
) -> Result<Vec<HashMap<String, String>>> {
    let url = format!(
        "{}/api/documents?limit={}&filter=1",
        client.base_url(),
        config.document_limit
    );
    let listing: DocumentList = serde_json::from_value(client.get_json(&url).await?)
        .map_err(|err| {
            PartSyncError::Internal(format!(
                "unexpected document listing shape: {err}"
            ))
        })?;
    info!(documents = listing.items.len(), "walking account documents");

    let walks = listing
        .items
        .into_iter()
        .map(|document| collect_document_parts(client, document));
    let mut rows = Vec::new();
    for outcome in join_all(walks).await {
        rows.extend(outcome);
    }

    info!(parts = rows.len(), "catalog walk complete");
    Ok(rows)
}

/// Collect all parts of one document; failures degrade to an empty list.
async fn collect_document_parts(
    client: &OnshapeClient,
    document: Document,
) -> Vec<HashMap<String, String>> {
    match document_parts(client, &document).await {
        Ok(rows) => rows,
        Err(err) => {
            warn!(
                document_id = %document.id,
                document_name = %document.name,
                error = %err,
                "skipping document"
            );
            Vec::new()
        }
    }
}

async fn document_parts(
    client: &OnshapeClient,
    document: &Document,
) -> Result<Vec<HashMap<String, String>>> {
    let workspace = document.default_workspace.as_ref().ok_or_else(|| {
        PartSyncError::Internal("document has no default workspace".to_string())
    })?;

    let elements_url = format!(
        "{}/api/documents/d/{}/w/{}/elements",
        client.base_url(),
        document.id,
        workspace.id
    );
    let elements: Vec<Element> = serde_json::from_value(client.get_json(&elements_url).await?)
        .map_err(|err| {
            PartSyncError::Internal(format!(
                "unexpected element listing shape: {err}"
            ))
        })?;

    let mut rows = Vec::new();
    for element in elements.iter().filter(|e| e.element_type == PART_STUDIO_TYPE) {
        let metadata_url = format!(
            "{}/api/partstudios/d/{}/w/{}/e/{}/metadata",
            client.base_url(),
            document.id,
            workspace.id,
            element.id
        );
        let metadata: StudioMetadata =
            serde_json::from_value(client.get_json(&metadata_url).await?).map_err(|err| {
                PartSyncError::Internal(format!(
                    "unexpected part metadata shape: {err}"
                ))
            })?;
        debug!(
            document_id = %document.id,
            element_id = %element.id,
            parts = metadata.parts.len(),
            "collected part studio"
        );

        for part in metadata.parts {
            rows.push(export_row(&document.id, &workspace.id, &element.id, part));
        }
    }

    Ok(rows)
}

/// Flatten one part into an export row keyed by the canonical columns.
fn export_row(
    document_id: &str,
    workspace_id: &str,
    element_id: &str,
    part: PartMetadata,
) -> HashMap<String, String> {
    let mut values: HashMap<&str, String> = part
        .properties
        .iter()
        .filter_map(|property| {
            let value = property.value.as_ref()?;
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((property.name.as_str(), text))
        })
        .collect();

    let mut row = HashMap::new();
    row.insert(
        PART_REFERENCE_COLUMN.to_string(),
        format!(
            "https://cad.onshape.com/documents/{document_id}/w/{workspace_id}/e/{element_id}?partId={}",
            part.part_id
        ),
    );
    for name in EXPORTABLE_PROPERTIES {
        let value = match *name {
            // Material needs a library assignment and Weight is computed;
            // neither round-trips through the metadata endpoint
            "Material" | "Weight" => "N/A".to_string(),
            "Name" => values
                .remove(name)
                .or_else(|| part.name.clone())
                .unwrap_or_default(),
            _ => values.remove(name).unwrap_or_default(),
        };
        row.insert((*name).to_string(), value);
    }
    row
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use partsync_domain::ApiCredentials;

    use crate::api::OnshapeClientConfig;

    use super::*;

    fn client(base_url: String) -> OnshapeClient {
        OnshapeClient::with_config(
            ApiCredentials {
                access_key: "test-access".to_string(),
                secret_key: "test-secret".to_string(),
            },
            OnshapeClientConfig { base_url, ..Default::default() },
        )
        .expect("client")
    }

    #[tokio::test]
    async fn walks_documents_and_flattens_parts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/documents"))
            .and(query_param("limit", "50"))
            .and(query_param("filter", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"id": "d1", "name": "Good Doc", "defaultWorkspace": {"id": "w1"}}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/documents/d/d1/w/w1/elements"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "e1", "elementType": "PARTSTUDIO"},
                {"id": "e2", "elementType": "ASSEMBLY"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/partstudios/d/d1/w/w1/e/e1/metadata"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "parts": [
                    {
                        "partId": "JHD",
                        "name": "Bracket",
                        "properties": [
                            {"name": "Part Number", "value": "PN-100"},
                            {"name": "Material", "value": "Steel"}
                        ]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = client(server.uri());
        let rows = fetch_all_parts(&client, &CatalogConfig::default())
            .await
            .expect("walk succeeds");

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row["Name"], "Bracket");
        assert_eq!(row["Part Number"], "PN-100");
        // Calculated properties always export as N/A
        assert_eq!(row["Material"], "N/A");
        assert_eq!(row["Weight"], "N/A");
        assert_eq!(
            row[PART_REFERENCE_COLUMN],
            "https://cad.onshape.com/documents/d1/w/w1/e/e1?partId=JHD"
        );
    }

    #[tokio::test]
    async fn failing_document_is_skipped_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"id": "bad", "name": "Broken Doc", "defaultWorkspace": {"id": "wx"}},
                    {"id": "d1", "name": "Good Doc", "defaultWorkspace": {"id": "w1"}}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/documents/d/bad/w/wx/elements"))
            .respond_with(ResponseTemplate::new(500).set_body_string("element service down"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/documents/d/d1/w/w1/elements"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "e1", "elementType": "PARTSTUDIO"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/partstudios/d/d1/w/w1/e/e1/metadata"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "parts": [{"partId": "P1", "name": "Survivor", "properties": []}]
            })))
            .mount(&server)
            .await;

        let client = client(server.uri());
        let rows = fetch_all_parts(&client, &CatalogConfig::default())
            .await
            .expect("walk survives one bad document");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Name"], "Survivor");
    }

    #[tokio::test]
    async fn document_without_default_workspace_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "d1", "name": "Orphan"}]
            })))
            .mount(&server)
            .await;

        let client = client(server.uri());
        let rows = fetch_all_parts(&client, &CatalogConfig::default())
            .await
            .expect("walk succeeds");
        assert!(rows.is_empty());
    }
}
