//! Part reference resolution
//!
//! A part reference is the URL a user copies out of the document view:
//! `.../documents/<did>/<w|v|m>/<wvid>/e/<eid>?partId=<pid>`. Resolution
//! extracts the structured identifiers the API endpoints need.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use partsync_domain::{PartSyncError, ResolvedReference, Result, RevisionSelector};

static REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"documents/(?P<did>\w+)/(?P<selector>[wvm])/(?P<wvid>\w+)/e/(?P<eid>\w+)")
        .expect("REFERENCE_PATTERN is valid and well-formed")
});

static PART_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[?&]partId=([^&]+)").expect("PART_ID_PATTERN is valid and well-formed")
});

/// Resolve a part reference string into its structured identifiers.
///
/// # Errors
/// Returns `PartSyncError::InvalidReference` when the path shape does not
/// match or the `partId` query parameter is missing.
pub fn resolve(reference: &str) -> Result<ResolvedReference> {
    let caps = REFERENCE_PATTERN.captures(reference).ok_or_else(|| {
        PartSyncError::InvalidReference("malformed part URL".to_string())
    })?;

    // The selector group only matches w/v/m, so from_code cannot fail here
    let selector = RevisionSelector::from_code(&caps["selector"]).ok_or_else(|| {
        PartSyncError::InvalidReference("unknown revision selector".to_string())
    })?;

    let part_id = extract_part_id(reference).ok_or_else(|| {
        PartSyncError::InvalidReference("part id not found in URL".to_string())
    })?;

    Ok(ResolvedReference {
        document_id: caps["did"].to_string(),
        selector,
        revision_id: caps["wvid"].to_string(),
        element_id: caps["eid"].to_string(),
        part_id,
    })
}

/// Extract the `partId` query parameter.
///
/// Standard URL query parsing first; references that are not absolute
/// URLs fall back to a direct pattern match on the raw string.
fn extract_part_id(reference: &str) -> Option<String> {
    match Url::parse(reference) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == "partId")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty()),
        Err(_) => {
            PART_ID_PATTERN.captures(reference).map(|caps| caps[1].to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKSPACE_URL: &str =
        "https://cad.onshape.com/documents/d1f2e3/w/a1b2c3/e/e9f8a7?partId=JHD";

    #[test]
    fn resolves_workspace_reference() {
        let reference = resolve(WORKSPACE_URL).expect("valid reference");

        assert_eq!(reference.document_id, "d1f2e3");
        assert_eq!(reference.selector, RevisionSelector::Workspace);
        assert_eq!(reference.revision_id, "a1b2c3");
        assert_eq!(reference.element_id, "e9f8a7");
        assert_eq!(reference.part_id, "JHD");
    }

    #[test]
    fn resolves_version_and_microversion_selectors() {
        let version =
            resolve("https://cad.onshape.com/documents/d1/v/r2/e/e3?partId=P").expect("version");
        assert_eq!(version.selector, RevisionSelector::Version);

        let micro =
            resolve("https://cad.onshape.com/documents/d1/m/r2/e/e3?partId=P").expect("micro");
        assert_eq!(micro.selector, RevisionSelector::Microversion);
    }

    #[test]
    fn malformed_path_is_rejected() {
        let err = resolve("https://cad.onshape.com/nothing/here").expect_err("must fail");
        assert!(matches!(err, PartSyncError::InvalidReference(msg) if msg.contains("malformed")));
    }

    #[test]
    fn missing_part_id_is_rejected() {
        let err = resolve("https://cad.onshape.com/documents/d1/w/r2/e/e3").expect_err("must fail");
        assert!(matches!(err, PartSyncError::InvalidReference(msg) if msg.contains("part id")));
    }

    #[test]
    fn relative_reference_falls_back_to_raw_pattern() {
        // Not an absolute URL, so url::Url::parse fails and the raw
        // partId= match takes over
        let reference = resolve("documents/d1/w/r2/e/e3?partId=XYZ&other=1").expect("fallback");
        assert_eq!(reference.part_id, "XYZ");
    }

    #[test]
    fn part_id_amid_other_query_parameters() {
        let reference =
            resolve("https://cad.onshape.com/documents/d1/w/r2/e/e3?configuration=default&partId=QQQ")
                .expect("valid");
        assert_eq!(reference.part_id, "QQQ");
    }
}
