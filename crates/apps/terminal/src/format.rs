//! Text formatting for `ls` output.

use chrono::{DateTime, Utc};
use platform_host::FsEntry;

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Human-readable size with up to two decimals: `0 Bytes`, `1 KB`, `1.5 KB`, `150 KB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit + 1 < SIZE_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", SIZE_UNITS[unit])
}

/// `YYYY-MM-DD HH:MM` in UTC.
pub fn format_timestamp(unix_ms: u64) -> String {
    i64::try_from(unix_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One `ls` line: type flag, date, right-aligned size and name (directories end in `/`).
pub fn format_ls_line(entry: &FsEntry) -> String {
    let (flag, size, suffix) = match entry.size {
        Some(size) if !entry.is_directory() => ('-', format_bytes(size), ""),
        _ => ('d', "-".to_string(), "/"),
    };
    format!(
        "{flag} {:<17} {size:>9} {}{suffix}",
        format_timestamp(entry.modified_at_unix_ms),
        entry.name
    )
}

#[cfg(test)]
mod tests {
    use platform_host::{FsEntryKind, FsNode};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn format_bytes_trims_trailing_zeros() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(153_600), "150 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
    }

    #[test]
    fn ls_lines_align_columns() {
        let file = FsEntry::from_node(
            "readme.txt",
            "/home/readme.txt",
            &FsNode::file("hi", 1024, 1_699_713_000_000),
        );
        assert_eq!(
            format_ls_line(&file),
            "- 2023-11-11 14:30       1 KB readme.txt"
        );

        let dir = FsEntry::from_node(
            "documents",
            "/home/documents",
            &FsNode::directory(1_699_606_800_000),
        );
        assert_eq!(dir.kind, FsEntryKind::Directory);
        assert_eq!(
            format_ls_line(&dir),
            "d 2023-11-10 09:00          - documents/"
        );
    }
}
