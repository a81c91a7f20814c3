use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ReportError;

/// Suffix a directory entry must carry (case-sensitive) to count as a report.
pub const REPORT_EXTENSION: &str = ".xml";

/// A report file read from disk, before parsing.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub path: PathBuf,
    pub text: String,
}

impl RawDocument {
    /// Name used when the report itself does not carry one.
    pub fn fallback_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// What a report path resolved to.
#[derive(Debug)]
pub enum Source {
    File(RawDocument),
    Directory(Vec<RawDocument>),
}

/// Resolve a report path into one document or every report in a directory.
/// Sub-directories are not searched, and a single unreadable report fails
/// the whole load.
pub fn load(path: &Path) -> Result<Source, ReportError> {
    let meta = std::fs::metadata(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ReportError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ReportError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    if !meta.is_dir() {
        return Ok(Source::File(read(path)?));
    }

    let files = report_files(path)?;
    if files.is_empty() {
        return Err(ReportError::NotFound {
            path: path.to_path_buf(),
        });
    }
    debug!(dir = %path.display(), count = files.len(), "found report files");

    let docs = files
        .iter()
        .map(|file| read(file))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Source::Directory(docs))
}

fn read(path: &Path) -> Result<RawDocument, ReportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RawDocument {
        path: path.to_path_buf(),
        text,
    })
}

/// Immediate children of `dir` ending in the report extension, sorted by
/// file name. Non-UTF-8 names are compared on their raw bytes.
fn report_files(dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    let read_error = |source| ReportError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let name = entry.file_name();
        if !name.as_encoded_bytes().ends_with(REPORT_EXTENSION.as_bytes()) {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_file_loads_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.trx");
        std::fs::write(&path, "<TestRun/>").unwrap();

        let Source::File(doc) = load(&path).unwrap() else {
            panic!("expected a single file");
        };
        assert_eq!(doc.text, "<TestRun/>");
        assert_eq!(doc.fallback_name(), "results");
    }

    #[test]
    fn directory_lists_only_immediate_xml_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.xml"), "<testsuite/>").unwrap();
        std::fs::write(dir.path().join("b.xml"), "<testsuite/>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        std::fs::write(dir.path().join("UPPER.XML"), "skip").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/c.xml"), "<testsuite/>").unwrap();
        std::fs::create_dir(dir.path().join("folder.xml")).unwrap();

        let Source::Directory(docs) = load(dir.path()).unwrap() else {
            panic!("expected a directory");
        };
        let mut names: Vec<_> = docs.iter().map(RawDocument::fallback_name).collect();
        names.sort();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.xml")).unwrap_err();
        assert!(matches!(err, ReportError::NotFound { .. }));
    }

    #[test]
    fn directory_without_reports_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.md"), "").unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::NotFound { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn directory_with_non_utf8_name_still_lists_reports() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join(OsStr::from_bytes(b"reports-\xff"));
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("a.xml"), "<testsuite/>").unwrap();
        std::fs::write(dir.join(OsStr::from_bytes(b"b-\xfe.xml")), "<testsuite/>").unwrap();

        let Source::Directory(docs) = load(&dir).unwrap() else {
            panic!("expected a directory");
        };
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|doc| doc.path.parent() == Some(dir.as_path())));
    }

    #[test]
    fn non_utf8_report_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.xml"), "<testsuite/>").unwrap();
        std::fs::write(dir.path().join("b.xml"), [0xff, 0xfe, 0x00]).unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::Read { .. }));
    }
}
