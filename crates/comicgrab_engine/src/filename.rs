/// Longest sanitized stem in bytes. Leaves room under the common 255-byte
/// name limit for the extension and the `.part` suffix.
pub const MAX_STEM_BYTES: usize = 240;

/// Filesystem-safe archive name for a comic: `{sanitized_title}.{ext}`.
///
/// The extension is `zip` when the link mentions `.zip` (any case) and
/// `default_extension` otherwise. The link text is the only signal used.
pub fn archive_filename(
    title: &str,
    link: &str,
    default_extension: &str,
    max_len: usize,
) -> String {
    let stem = sanitize_title(title, max_len);
    let extension = archive_extension(link, default_extension);
    format!("{stem}.{extension}")
}

pub fn archive_extension<'a>(link: &str, default_extension: &'a str) -> &'a str {
    if link.to_ascii_lowercase().contains(".zip") {
        "zip"
    } else {
        default_extension
    }
}

/// Replaces characters illegal in path components with `_`, collapses
/// whitespace runs to one space and truncates to `max_len` characters and
/// at most [`MAX_STEM_BYTES`] bytes, cutting on a character boundary.
pub fn sanitize_title(input: &str, max_len: usize) -> String {
    let replaced: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut name: String = collapsed.chars().take(max_len).collect();
    truncate_to_char_boundary(&mut name, MAX_STEM_BYTES);
    name.truncate(name.trim_end().len());
    if name.is_empty() {
        name = "untitled".to_string();
    }
    if is_reserved_windows_name(&name) {
        name.push('_');
    }
    name
}

fn truncate_to_char_boundary(name: &mut String, max_bytes: usize) {
    if name.len() <= max_bytes {
        return;
    }
    let mut end = max_bytes;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name.truncate(end);
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{8}' | '\u{E}'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
