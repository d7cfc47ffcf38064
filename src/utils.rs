// src/utils.rs
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Extensions offered by the file picker. Advisory only.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx"];

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// MIME type for an accepted resume file name
pub fn content_type_for(file_name: &str) -> Option<&'static str> {
    match get_file_extension(file_name).as_deref() {
        Some("pdf") => Some(PDF_CONTENT_TYPE),
        Some("docx") => Some(DOCX_CONTENT_TYPE),
        _ => None,
    }
}

/// Trim trailing slashes so endpoint paths can be appended directly
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// `has_contact_info` -> `Has contact info`
pub fn humanize_key(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Truncate on a char boundary, appending an ellipsis when shortened
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push('…');
    truncated
}
