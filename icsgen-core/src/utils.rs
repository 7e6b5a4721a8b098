use std::io::Write;
use std::path::Path;

/// Characters that are not safe in an artifact file stem, with their replacement.
const UNSAFE_CHARS: &[(char, char)] = &[
    ('"', '-'),
    ('\\', '-'),
    ('/', '-'),
    ('\'', '-'),
    ('>', '-'),
    ('<', '-'),
    ('|', '-'),
    (' ', '_'),
];

/// Map an event name to a filesystem-safe file stem.
///
/// Spaces become underscores, the other unsafe characters become hyphens,
/// everything else passes through unchanged.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            UNSAFE_CHARS
                .iter()
                .find(|(unsafe_char, _)| *unsafe_char == c)
                .map(|(_, replacement)| *replacement)
                .unwrap_or(c)
        })
        .collect()
}

/// Write `contents` to `path` through a temp file in the same directory,
/// then rename it into place. An existing file is replaced.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_passes_safe_names_through() {
        assert_eq!(sanitize_file_stem("Talk"), "Talk");
        assert_eq!(sanitize_file_stem("rust-2022_intro.v2"), "rust-2022_intro.v2");
        assert_eq!(sanitize_file_stem(""), "");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        let stem = sanitize_file_stem("A/B\"C");
        assert_eq!(stem, "A-B-C");

        let stem = sanitize_file_stem("Intro to <Rust> | Bob's \\ talk");
        assert_eq!(stem, "Intro_to_-Rust-_-_Bob-s_-_talk");
        assert!(!stem.contains(|c| UNSAFE_CHARS.iter().any(|(u, _)| *u == c)));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize_file_stem("Bob's talk / Q&A");
        assert_eq!(sanitize_file_stem(&once), once);
    }

    #[test]
    fn test_write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ics");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
