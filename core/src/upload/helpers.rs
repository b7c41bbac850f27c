//! Pure helpers for presenting files before and after upload.

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

pub fn is_image_file(content_type: &str) -> bool {
    content_type.starts_with("image/")
}

pub fn is_video_file(content_type: &str) -> bool {
    content_type.starts_with("video/")
}

/// Extension after the last `.`; empty when there is none or the name only
/// starts with a dot.
pub fn file_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[idx + 1..],
        _ => "",
    }
}

/// Human readable size in 1024-based units, rounded to two decimals.
///
/// Sizes of a terabyte or more stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}
