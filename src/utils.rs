use log::info;

use crate::errors::Result;

/// Strips characters the server refuses in saved filenames.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| {
            !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') && !c.is_control()
        })
        .collect()
}

/// Formats a byte count as mebibytes with two decimals, e.g. "10.00 MB".
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Creates a directory if it doesn't exist
pub async fn ensure_dir_exists(path: &std::path::Path) -> Result<()> {
    if !path.exists() {
        tokio::fs::create_dir_all(path).await?;
        info!("Created directory: {:?}", path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_reserved_characters() {
        assert_eq!(sanitize_filename(r#"a/b\c:d*e?f"g<h>i|j"#), "abcdefghij");
        assert_eq!(sanitize_filename("Cat Video"), "Cat Video");
    }

    #[test]
    fn sanitize_strips_control_characters() {
        assert_eq!(sanitize_filename("a\0b\nc"), "abc");
    }

    #[test]
    fn size_is_rendered_in_mebibytes() {
        assert_eq!(format_size_mb(10_485_760), "10.00 MB");
        assert_eq!(format_size_mb(1_572_864), "1.50 MB");
    }
}
