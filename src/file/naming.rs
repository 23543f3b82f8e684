use std::path::Path;

const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL",
    "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8", "COM9",
    "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Give up numbering after this many collisions
const MAX_NUMBERED_COPIES: u32 = 999;

/// Make a file name safe to create on every platform.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) || c.is_control() { '_' } else { c })
        .collect();

    let trimmed = replaced.trim_end_matches([' ', '.']);
    if trimmed.is_empty() {
        return "_".to_string();
    }

    let stem = trimmed.split('.').next().unwrap_or_default().to_uppercase();
    if RESERVED_NAMES.contains(&stem.as_str()) {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// `Reporte.pdf` + 2 -> `Reporte (2).pdf`
fn numbered_filename(filename: &str, copy: u32) -> String {
    let path = Path::new(filename);
    match (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|s| s.to_str()),
    ) {
        (Some(stem), Some(ext)) => format!("{} ({}).{}", stem, copy, ext),
        _ => format!("{} ({})", filename, copy),
    }
}

/// Pick a name that does not collide with an existing file in `dir`.
///
/// Collisions are numbered the way browsers number repeated downloads:
/// `Reporte.pdf`, `Reporte (1).pdf`, `Reporte (2).pdf`, ...
/// Returns `None` once every numbered copy is taken.
pub fn ensure_unique_filename(dir: &Path, filename: &str) -> Option<String> {
    if !dir.join(filename).exists() {
        return Some(filename.to_string());
    }

    (1..=MAX_NUMBERED_COPIES)
        .map(|copy| numbered_filename(filename, copy))
        .find(|candidate| !dir.join(candidate).exists())
}
