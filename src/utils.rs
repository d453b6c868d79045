//! Size formatting helpers shared by the logger and the converter.

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 KB")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Percentage saved by the conversion, `(1 - output/source) * 100`.
///
/// Negative when the output grew. An empty source reports `0.0`.
pub fn savings_percent(source_size: u64, output_size: u64) -> f64 {
    if source_size == 0 {
        return 0.0;
    }
    (1.0 - output_size as f64 / source_size as f64) * 100.0
}
