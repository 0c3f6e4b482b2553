//! Public folder listings: descriptors, upstream JSON decoding, filtering.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::service::SELECTION_SEPARATOR;

/// Kind tag of a listed resource.
///
/// The upstream tags are kept verbatim so that filtering compares against
/// exactly what the listing API returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
    File,
    Folder,
    /// Any tag the listing API may add later. Listed, never interpreted.
    Other(String),
}

impl ResourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::File => "file",
            ResourceKind::Folder => "dir",
            ResourceKind::Other(tag) => tag,
        }
    }
}

impl From<String> for ResourceKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "file" => ResourceKind::File,
            "dir" => ResourceKind::Folder,
            _ => ResourceKind::Other(tag),
        }
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One entry of a public folder listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    /// Direct download URL. Only files carry one.
    #[serde(rename = "file", default, skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Remaining upstream fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileDescriptor {
    pub fn is_file(&self) -> bool {
        self.kind == ResourceKind::File
    }

    /// The `"<name>||<url>"` token a listing page submits for a download.
    ///
    /// `None` when there is no link, or when the link itself contains the
    /// separator and could not be split back out.
    pub fn selection_token(&self) -> Option<String> {
        self.download_link
            .as_deref()
            .filter(|link| !link.is_empty() && !link.contains(SELECTION_SEPARATOR))
            .map(|link| format!("{}{SELECTION_SEPARATOR}{}", self.name, link))
    }
}

#[derive(Deserialize)]
struct ListingBody {
    #[serde(rename = "_embedded")]
    embedded: Option<Embedded>,
}

#[derive(Deserialize)]
struct Embedded {
    items: Option<Vec<FileDescriptor>>,
}

/// Decode a listing response body.
///
/// `Ok(None)` means the body parsed but carried no `_embedded.items`
/// container; callers treat that as an empty listing.
pub fn parse_listing(body: &[u8]) -> serde_json::Result<Option<Vec<FileDescriptor>>> {
    let body: ListingBody = serde_json::from_slice(body)?;
    Ok(body.embedded.and_then(|embedded| embedded.items))
}

/// Keep only descriptors whose raw kind tag equals `kind`, in order.
///
/// A missing or empty `kind` keeps everything.
pub fn filter(items: &[FileDescriptor], kind: Option<&str>) -> Vec<FileDescriptor> {
    match kind.filter(|k| !k.is_empty()) {
        None => items.to_vec(),
        Some(kind) => items
            .iter()
            .filter(|item| item.kind.as_str() == kind)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, kind: &str) -> FileDescriptor {
        FileDescriptor {
            name: name.to_string(),
            kind: ResourceKind::from(kind.to_string()),
            download_link: None,
            size: None,
            modified: None,
            preview: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn parses_embedded_items_with_passthrough_fields() {
        let body = br#"{
            "public_key": "abc",
            "_embedded": {
                "total": 2,
                "items": [
                    {
                        "name": "photo.jpg",
                        "type": "file",
                        "file": "https://downloader.example/photo",
                        "size": 2048,
                        "modified": "2024-01-02T03:04:05+00:00",
                        "preview": "https://preview.example/photo",
                        "mime_type": "image/jpeg",
                        "path": "/photo.jpg"
                    },
                    { "name": "docs", "type": "dir", "path": "/docs" }
                ]
            }
        }"#;

        let items = parse_listing(body).unwrap().unwrap();
        assert_eq!(items.len(), 2);

        let photo = &items[0];
        assert!(photo.is_file());
        assert_eq!(photo.download_link.as_deref(), Some("https://downloader.example/photo"));
        assert_eq!(photo.size, Some(2048));
        assert_eq!(photo.extra["mime_type"], "image/jpeg");
        assert_eq!(
            photo.selection_token().as_deref(),
            Some("photo.jpg||https://downloader.example/photo")
        );

        let docs = &items[1];
        assert_eq!(docs.kind, ResourceKind::Folder);
        assert!(docs.download_link.is_none());
        assert!(docs.selection_token().is_none());
    }

    #[test]
    fn link_containing_separator_has_no_token() {
        let body = br#"{"_embedded": {"items": [
            {"name": "odd.txt", "type": "file", "file": "https://dl.example/a||b"}
        ]}}"#;
        let items = parse_listing(body).unwrap().unwrap();
        assert!(items[0].selection_token().is_none());
    }

    #[test]
    fn missing_container_is_none() {
        assert!(parse_listing(br#"{"name": "single.txt", "type": "file"}"#).unwrap().is_none());
        assert!(parse_listing(br#"{"_embedded": {"total": 0}}"#).unwrap().is_none());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_listing(b"<html>503</html>").is_err());
    }

    #[test]
    fn unknown_kind_is_kept_verbatim() {
        let body = br#"{"_embedded": {"items": [{"name": "x", "type": "symlink"}]}}"#;
        let items = parse_listing(body).unwrap().unwrap();
        assert_eq!(items[0].kind, ResourceKind::Other("symlink".to_string()));
        assert_eq!(filter(&items, Some("symlink")).len(), 1);
        assert!(filter(&items, Some("file")).is_empty());
    }

    #[test]
    fn filter_keeps_matching_kind_in_order() {
        let items = vec![
            descriptor("one", "file"),
            descriptor("folder", "dir"),
            descriptor("two", "file"),
        ];

        let files = filter(&items, Some("file"));
        let names: Vec<_> = files.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["one", "two"]);
    }

    #[test]
    fn filter_without_kind_returns_everything() {
        let items = vec![descriptor("a", "dir"), descriptor("b", "file")];
        assert_eq!(filter(&items, None), items);
        assert_eq!(filter(&items, Some("")), items);
    }

    #[test]
    fn filter_is_case_sensitive() {
        let items = vec![descriptor("a", "file")];
        assert!(filter(&items, Some("FILE")).is_empty());
        assert!(filter(&items, Some("folder")).is_empty());
    }
}
