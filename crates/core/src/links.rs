//! Canonical file viewer URLs.
//!
//! Sync both writes and reads this shape to recognise files it already
//! recorded, so the two functions here must stay in step.

const VIEWER_HOST: &str = "https://drive.google.com";
const ID_MARKER: &str = "/d/";

pub fn viewer_url(file_id: &str) -> String {
    format!("{VIEWER_HOST}/file/d/{file_id}/view?usp=sharing")
}

/// The path segment following `/d/`, if any.
pub fn extract_file_id(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once(ID_MARKER)?;
    let id = rest.split('/').next().unwrap_or_default();
    (!id.is_empty()).then_some(id)
}
