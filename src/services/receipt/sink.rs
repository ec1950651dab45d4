use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Where a finished receipt or report goes: a folder on desktop, a download in the browser.
#[cfg_attr(test, mockall::automock)]
pub trait ReceiptSink: Send + Sync {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<()>;
}

pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ReceiptSink for DirectorySink {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating receipt folder {}", self.dir.display()))?;
        let path = self.dir.join(safe_file_name(file_name)?);
        std::fs::write(&path, bytes)
            .with_context(|| format!("writing receipt {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Receipt saved");
        Ok(())
    }
}

/// Triggers a browser download through a Blob URL and a throwaway anchor.
#[cfg(target_arch = "wasm32")]
pub struct BrowserDownloadSink;

#[cfg(target_arch = "wasm32")]
impl ReceiptSink for BrowserDownloadSink {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<()> {
        use wasm_bindgen::JsCast;

        let js_err = |e: wasm_bindgen::JsValue| anyhow::anyhow!("{:?}", e);

        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(bytes));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime_type(file_name));
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(js_err)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

        let anchor: web_sys::HtmlAnchorElement = document
            .create_element("a")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| anyhow::anyhow!("created element is not an anchor"))?;
        anchor.set_href(&url);
        anchor.set_download(file_name);
        anchor.click();

        web_sys::Url::revoke_object_url(&url).map_err(js_err)?;
        tracing::info!(file_name, "Receipt download triggered");
        Ok(())
    }
}

/// Maps anything outside `[A-Za-z0-9._-]` to `-` so server-issued numbers stay one path component.
pub fn clean_file_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

pub fn safe_file_name(name: &str) -> Result<String> {
    let cleaned = clean_file_name(name);
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        bail!("unusable file name {:?}", name);
    }
    Ok(cleaned)
}

pub fn mime_type(file_name: &str) -> &'static str {
    match file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "pdf" => "application/pdf",
        Some(ext) if ext == "csv" => "text/csv;charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_creates_folder() {
        let root = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(root.path().join("nested/receipts"));
        sink.deliver("Receipt-1.pdf", b"%PDF-1.4").unwrap();

        let written = std::fs::read(sink.dir().join("Receipt-1.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.4");
    }

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(mime_type("Receipt-7.pdf"), "application/pdf");
        assert_eq!(mime_type("Transaction_Report_2024-03-01.CSV"), "text/csv;charset=utf-8");
        assert_eq!(mime_type("notes"), "application/octet-stream");
    }

    #[test]
    fn test_directory_sink_reports_unwritable_target() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let sink = DirectorySink::new(blocker.join("receipts"));
        assert!(sink.deliver("Receipt-1.pdf", b"data").is_err());
    }

    #[test]
    fn test_directory_sink_keeps_slashed_numbers_in_folder() {
        let root = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(root.path());
        sink.deliver("Receipt-RCPT/2024/001.pdf", b"%PDF-1.4").unwrap();

        let written = std::fs::read(root.path().join("Receipt-RCPT-2024-001.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.4");
        assert!(!root.path().join("Receipt-RCPT").exists());
    }

    #[test]
    fn test_safe_file_name_rejects_dot_names() {
        assert!(safe_file_name("..").is_err());
        assert!(safe_file_name("   ").is_err());
        assert_eq!(safe_file_name("../etc\\passwd").unwrap(), "..-etc-passwd");
        assert_eq!(safe_file_name("Receipt 7\n.pdf").unwrap(), "Receipt-7-.pdf");
    }
}
