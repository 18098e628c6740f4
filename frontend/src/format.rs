//! Display helpers for file rows.

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Human readable file size: `1536` -> `"1.5 KB"`.
///
/// Uses powers of 1024, at most two fractional digits and no trailing
/// zeros. Sizes past the last unit stay expressed in TB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    // Ties round up: 1.125 -> "1.13"
    let rounded = (value * 100.0).round() / 100.0;
    let fixed = format!("{:.2}", rounded);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Upper-cased extension of a file name, used as the row icon.
///
/// A name without a dot yields the whole name.
pub fn file_extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(1), "1 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2048), "2 KB");
        assert_eq!(format_file_size(1_048_576), "1 MB");
        assert_eq!(format_file_size(1_288_490_189), "1.2 GB");
        assert_eq!(format_file_size(1_099_511_627_776), "1 TB");
    }

    #[test]
    fn test_format_rounds_to_two_digits() {
        // 1234 / 1024 = 1.2050...
        assert_eq!(format_file_size(1234), "1.21 KB");
        // 1048575 / 1024 = 1023.999...
        assert_eq!(format_file_size(1_048_575), "1024 KB");
        // Exact ties at the third decimal
        assert_eq!(format_file_size(1152), "1.13 KB");
        assert_eq!(format_file_size(1664), "1.63 KB");
    }

    #[test]
    fn test_format_caps_at_terabytes() {
        assert_eq!(format_file_size(2048 * 1_099_511_627_776), "2048 TB");
    }

    #[test]
    fn test_format_is_deterministic() {
        assert_eq!(format_file_size(123_456_789), format_file_size(123_456_789));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("report.final.pdf"), "PDF");
        assert_eq!(file_extension("a.txt"), "TXT");
        assert_eq!(file_extension("Makefile"), "MAKEFILE");
        assert_eq!(file_extension(".env"), "ENV");
    }
}
