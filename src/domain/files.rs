use serde::{Deserialize, Serialize};

/// Upload size ceiling (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Metadata kept for an uploaded document; the content itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size_bytes: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_mime(&self.mime_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Document,
    Other,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            FileKind::Image
        } else if mime.contains("pdf") {
            FileKind::Pdf
        } else if mime.contains("word") || mime.contains("document") {
            FileKind::Document
        } else {
            FileKind::Other
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            FileKind::Image => "🖼️",
            FileKind::Pdf => "📄",
            FileKind::Document => "📝",
            FileKind::Other => "📎",
        }
    }
}

/// Guesses a MIME type from the file extension.
pub fn guess_mime(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
