// Asset records as returned by the project listing endpoint.
//
// The service owns the schema, so an asset is kept as the raw JSON object
// and only the thumbnail fields are interpreted. `serde_json::Map` is a
// BTreeMap here, which gives the sorted keys the snapshot file expects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::{CloudLabelError, Result};

pub const THUMBNAIL_FIELD: &str = "thumbnail_320x200";
pub const THUMBNAIL_PATH_FIELD: &str = "thumbnail_320x200_path";

/// One remote asset. Every service-defined field is preserved verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Asset(Map<String, Value>);

impl Asset {
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    /// Thumbnail URL, or `None` when the field is missing, null or empty.
    pub fn thumbnail_url(&self) -> Option<&str> {
        match self.0.get(THUMBNAIL_FIELD) {
            Some(Value::String(url)) if !url.is_empty() => Some(url),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn thumbnail_path(&self) -> Option<&str> {
        self.0.get(THUMBNAIL_PATH_FIELD).and_then(Value::as_str)
    }

    pub fn set_thumbnail_path(&mut self, file_name: &str) {
        self.0
            .insert(THUMBNAIL_PATH_FIELD.to_string(), Value::from(file_name));
    }

    #[cfg(test)]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Local file name for a thumbnail: the last segment of the URL path as
/// written, with query and fragment dropped. No decoding or normalization is
/// applied. Two URLs with the same last segment map to the same file.
pub fn thumbnail_file_name(raw_url: &str) -> Result<String> {
    let invalid = || CloudLabelError::InvalidThumbnailUrl {
        url: raw_url.to_string(),
    };
    // Parsing only rejects URLs that could not be fetched anyway.
    Url::parse(raw_url).map_err(|_| invalid())?;

    let without_query = raw_url.split(['?', '#']).next().unwrap_or_default();
    let after_scheme = without_query
        .split_once(':')
        .map(|(_, rest)| rest)
        .unwrap_or(without_query);
    let path = match after_scheme.strip_prefix("//") {
        Some(authority_and_path) => authority_and_path
            .find('/')
            .map(|start| &authority_and_path[start..])
            .unwrap_or_default(),
        None => after_scheme,
    };
    let name = path.rsplit('/').next().unwrap_or_default();
    if name.is_empty() || name == "." || name == ".." {
        return Err(invalid());
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn asset(value: Value) -> Asset {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_file_name_strips_query_and_fragment() {
        assert_eq!(
            thumbnail_file_name("https://cdn.example.com/t/320x200/a.jpg?sig=abc#frag").unwrap(),
            "a.jpg"
        );
    }

    #[test]
    fn test_file_name_ignores_prefix() {
        let a = thumbnail_file_name("http://x/one/a.jpg").unwrap();
        let b = thumbnail_file_name("http://x/two/a.jpg").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_file_name_rejects_directory_url() {
        assert!(matches!(
            thumbnail_file_name("http://x/thumbs/"),
            Err(CloudLabelError::InvalidThumbnailUrl { .. })
        ));
        assert!(thumbnail_file_name("http://x").is_err());
    }

    #[test]
    fn test_file_name_keeps_raw_characters() {
        assert_eq!(
            thumbnail_file_name("http://x/thumbs/été.jpg").unwrap(),
            "été.jpg"
        );
        assert_eq!(
            thumbnail_file_name("http://x/thumbs/a b.jpg?size=320").unwrap(),
            "a b.jpg"
        );
        assert_eq!(
            thumbnail_file_name("http://x/thumbs/a%20b.jpg").unwrap(),
            "a%20b.jpg"
        );
        assert_eq!(
            thumbnail_file_name("http://x/thumbs\\a.jpg").unwrap(),
            "thumbs\\a.jpg"
        );
    }

    #[test]
    fn test_file_name_rejects_dot_segments() {
        assert!(thumbnail_file_name("http://x/thumbs/..").is_err());
        assert!(thumbnail_file_name("http://x/thumbs/.?v=1").is_err());
    }

    #[test]
    fn test_file_name_rejects_relative_url() {
        assert!(thumbnail_file_name("thumbs/a.jpg").is_err());
    }

    #[test]
    fn test_thumbnail_url_absent_null_or_empty() {
        assert_eq!(asset(json!({"id": 1})).thumbnail_url(), None);
        assert_eq!(
            asset(json!({"id": 1, "thumbnail_320x200": null})).thumbnail_url(),
            None
        );
        assert_eq!(
            asset(json!({"id": 1, "thumbnail_320x200": ""})).thumbnail_url(),
            None
        );
        assert_eq!(
            asset(json!({"id": 1, "thumbnail_320x200": "http://x/a.jpg"})).thumbnail_url(),
            Some("http://x/a.jpg")
        );
    }

    #[test]
    fn test_set_thumbnail_path_keeps_other_fields() {
        let mut a = asset(json!({"id": 7, "name": "cat", "thumbnail_320x200": "http://x/a.jpg"}));
        a.set_thumbnail_path("a.jpg");
        assert_eq!(a.thumbnail_path(), Some("a.jpg"));
        assert_eq!(a.id(), Some(&json!(7)));
        assert_eq!(a.fields()["name"], json!("cat"));
    }
}
