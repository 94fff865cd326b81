//! One-way JSON export of an image's annotations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Annotation, ImageRef};

/// Snapshot written to a downloadable JSON file. Never read back by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub image_id: String,
    pub image_title: String,
    pub image_url: String,
    pub annotations: Vec<Annotation>,
    pub exported_at: DateTime<Utc>,
}

impl ExportDocument {
    /// MIME type of the serialized document.
    pub const MIME_TYPE: &'static str = "application/json";

    pub fn new(image: &ImageRef, annotations: Vec<Annotation>, exported_at: DateTime<Utc>) -> Self {
        Self {
            image_id: image.id.clone(),
            image_title: image.title.clone(),
            image_url: image.url.clone(),
            annotations,
            exported_at,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Suggested download name, e.g. `annotations-city-at-night.json`.
    pub fn file_name(&self) -> String {
        export_file_name(&self.image_title)
    }

    /// Write the document to a file (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn write_to(&self, path: &std::path::Path) -> Result<(), crate::error::StorageError> {
        log::info!("Exporting {} annotations to {:?}", self.annotations.len(), path);
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Export file name for an image title: lowercased, whitespace runs become `-`.
pub fn export_file_name(title: &str) -> String {
    let slug = title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("annotations-{slug}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationId, BoundingBox};

    fn image() -> ImageRef {
        ImageRef::new("img-7", "City At  Night", "https://example.com/7.jpg")
    }

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name("City At  Night"), "annotations-city-at-night.json");
        assert_eq!(export_file_name("photo"), "annotations-photo.json");
    }

    #[test]
    fn test_json_shape() {
        let now = Utc::now();
        let annotations = vec![Annotation::new(
            AnnotationId::Numeric(1),
            BoundingBox::new(1.0, 2.0, 30.0, 40.0),
            "Car",
            now,
        )];
        let doc = ExportDocument::new(&image(), annotations, now);
        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

        assert_eq!(json["imageId"], "img-7");
        assert_eq!(json["imageTitle"], "City At  Night");
        assert_eq!(json["imageUrl"], "https://example.com/7.jpg");
        assert_eq!(json["annotations"][0]["label"], "Car");
        let exported_at = json["exportedAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(exported_at).is_ok());
    }

    #[test]
    fn test_pretty_printed() {
        let doc = ExportDocument::new(&image(), Vec::new(), Utc::now());
        let json = doc.to_json().unwrap();
        assert!(json.contains("\n  \"imageId\""));
    }
}
