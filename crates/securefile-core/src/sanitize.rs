//! Filename sanitization

/// Reserved device names on Windows; a file named like this cannot be
/// created or opened normally there.
const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reduce an untrusted filename to a safe, flat on-disk name.
///
/// - non-ASCII characters are dropped
/// - `/` and `\` become word breaks, so directory components are flattened
///   into the name rather than interpreted
/// - whitespace runs become a single `_`
/// - anything outside `[A-Za-z0-9_.-]` is dropped
/// - leading and trailing `.` and `_` are trimmed, which removes `..`
/// - Windows device names get a `_` prefix
///
/// The result may be empty; callers must reject that.
///
/// ```
/// use securefile_core::secure_filename;
///
/// assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
/// assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
/// ```
pub fn secure_filename(filename: &str) -> String {
    let flattened: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");

    let safe: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = safe.trim_matches(|c| c == '.' || c == '_');

    if is_windows_device_name(trimmed) {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

fn is_windows_device_name(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or_default();
    WINDOWS_DEVICE_NAMES
        .iter()
        .any(|device| device.eq_ignore_ascii_case(stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_unchanged() {
        assert_eq!(secure_filename("normal.txt"), "normal.txt");
        assert_eq!(secure_filename("file.exe.jpg"), "file.exe.jpg");
        assert_eq!(secure_filename("report-2024_v2.PDF"), "report-2024_v2.PDF");
    }

    #[test]
    fn test_path_traversal_is_flattened() {
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("../../evil.txt"), "evil.txt");
        assert_eq!(secure_filename("/etc/shadow.txt"), "etc_shadow.txt");
        assert_eq!(
            secure_filename("..\\..\\windows\\system.ini"),
            "windows_system.ini"
        );
    }

    #[test]
    fn test_whitespace_and_unsafe_characters() {
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(secure_filename("  spaced \t out .txt"), "spaced_out_.txt");
        assert_eq!(secure_filename("a<b>c:d\"e|f?g*.png"), "abcdefg.png");
        assert_eq!(secure_filename("café menu.pdf"), "caf_menu.pdf");
    }

    #[test]
    fn test_names_that_collapse_to_nothing() {
        assert_eq!(secure_filename(""), "");
        assert_eq!(secure_filename(".."), "");
        assert_eq!(secure_filename("../../"), "");
        assert_eq!(secure_filename("___..___"), "");
        assert_eq!(secure_filename("日本語"), "");
    }

    #[test]
    fn test_hidden_file_prefix_is_trimmed() {
        assert_eq!(secure_filename(".htaccess.txt"), "htaccess.txt");
        assert_eq!(secure_filename(".txt"), "txt");
    }

    #[test]
    fn test_windows_device_names_are_prefixed() {
        assert_eq!(secure_filename("CON.txt"), "_CON.txt");
        assert_eq!(secure_filename("lpt1.doc"), "_lpt1.doc");
        assert_eq!(secure_filename("console.txt"), "console.txt");
    }
}
