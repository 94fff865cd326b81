//! Browser glue: entry point, confirmation prompt and export download.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::config::EditorConfig;
use crate::error::StorageError;
use crate::export::ExportDocument;
use crate::host::ConfirmPrompt;

#[wasm_bindgen(start)]
pub fn start() {
    let config = EditorConfig::load_from_local_storage().unwrap_or_default();
    crate::logging::init(config.preferences.log_level);
    log::info!("photo-annotate WASM starting...");
}

fn js_error(context: &str, value: JsValue) -> StorageError {
    StorageError::storage(format!("{context}: {value:?}"))
}

/// `window.confirm()` prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConfirm;

impl ConfirmPrompt for BrowserConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        let Some(window) = web_sys::window() else {
            log::warn!("No window, declining '{}'", message);
            return false;
        };
        window.confirm_with_message(message).unwrap_or(false)
    }
}

/// Offer an export document as a file download.
pub fn download_export(document: &ExportDocument) -> Result<(), StorageError> {
    let json = document.to_json()?;

    let window = web_sys::window().ok_or_else(|| StorageError::storage("no window"))?;
    let dom = window
        .document()
        .ok_or_else(|| StorageError::storage("no document"))?;

    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(&json));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(ExportDocument::MIME_TYPE);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| js_error("failed to create blob", e))?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|e| js_error("failed to create object URL", e))?;

    let anchor: web_sys::HtmlAnchorElement = dom
        .create_element("a")
        .map_err(|e| js_error("failed to create anchor", e))?
        .dyn_into()
        .map_err(|_| StorageError::storage("not an anchor element"))?;
    anchor.set_href(&url);
    anchor.set_download(&document.file_name());
    anchor.click();

    if let Err(e) = web_sys::Url::revoke_object_url(&url) {
        log::warn!("Failed to revoke object URL: {:?}", e);
    }
    log::info!("Downloaded {}", document.file_name());
    Ok(())
}
