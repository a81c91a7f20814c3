pub mod aggregate;
pub mod classify;
pub mod extract;
pub mod loader;
pub mod timestamp;
pub mod tree;

use std::path::Path;

use tracing::debug;

use crate::error::ReportError;
use crate::models::{FormatKind, PartialSummary};

use aggregate::Aggregate;
use classify::{Classified, classify};
use loader::{RawDocument, Source};
use tree::ParseTree;

/// Normalize the report at `path`, a single file or a directory of
/// JUnit-family reports, into one partial summary.
pub fn normalize(path: &Path) -> Result<PartialSummary, ReportError> {
    match loader::load(path)? {
        Source::File(doc) => {
            let (tree, classified) = parse(&doc)?;
            extract::extract(&tree, &classified, &doc)
        }
        Source::Directory(docs) => {
            let mut aggregate = Aggregate::new();
            for doc in &docs {
                let (tree, classified) = parse(doc)?;
                if !classified.kind.supports_directory() {
                    return Err(directory_error(doc, classified));
                }
                aggregate.fold(extract::extract(&tree, &classified, doc)?);
            }
            debug!(files = aggregate.folded(), "folded directory reports");
            Ok(aggregate.finish())
        }
    }
}

fn parse(doc: &RawDocument) -> Result<(ParseTree, Classified), ReportError> {
    let tree = ParseTree::parse(&doc.text).map_err(|message| ReportError::Malformed {
        path: doc.path.clone(),
        message,
    })?;
    let classified = classify(&tree);
    debug!(file = %doc.path.display(), format = ?classified.kind, root = %classified.tag, "classified report");
    Ok((tree, classified))
}

fn directory_error(doc: &RawDocument, classified: Classified) -> ReportError {
    match classified.kind {
        FormatKind::Unsupported => ReportError::Unsupported {
            path: doc.path.clone(),
            root: classified.tag,
        },
        _ => ReportError::NoDirectorySupport {
            path: doc.path.clone(),
            root: classified.tag,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn junit(name: &str, tests: u64, failures: u64, skipped: u64, time: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="{name}" tests="{tests}" failures="{failures}" errors="0" skipped="{skipped}" time="{time}"/>
</testsuites>"#
        )
    }

    #[test]
    fn single_junit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TEST-com.acme.Foo.xml");
        std::fs::write(
            &path,
            r#"<testsuite name="com.acme.Foo" tests="10" failures="1" errors="0" skipped="2" time="5"/>"#,
        )
        .unwrap();

        let summary = normalize(&path).unwrap();
        assert_eq!(summary.name, "com.acme");
        assert_eq!(summary.total, 10);
        assert_eq!(summary.passed, 7);
        assert_eq!(summary.duration_seconds, 5.0);
    }

    #[test]
    fn directory_sums_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let files = [
            ("a.xml", junit("pkg.Alpha", 4, 1, 0, "1.25")),
            ("b.xml", junit("pkg.Beta", 6, 0, 2, "2")),
            ("c.xml", junit("pkg.Gamma", 1, 1, 0, "0.5")),
        ];
        for (name, body) in &files {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        std::fs::write(dir.path().join("ignored.txt"), "<assemblies/>").unwrap();

        let summary = normalize(dir.path()).unwrap();
        assert_eq!(summary.format, FormatKind::JUnit);
        assert_eq!(summary.total, 11);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.passed, 7);
        assert_eq!(summary.duration_seconds, 3.75);
        assert_eq!(summary.name, "pkg");
        assert!(summary.start_time.is_empty());
    }

    #[test]
    fn directory_name_comes_from_a_folded_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.xml"), junit("first.Suite", 1, 0, 0, "1")).unwrap();
        std::fs::write(dir.path().join("two.xml"), junit("second.Suite", 1, 0, 0, "1")).unwrap();

        let Source::Directory(docs) = loader::load(dir.path()).unwrap() else {
            panic!("expected a directory");
        };
        let last = docs.last().unwrap();
        let expected = if last.text.contains("first.Suite") { "first" } else { "second" };
        assert_eq!(normalize(dir.path()).unwrap().name, expected);
    }

    #[test]
    fn directory_totals_saturate_instead_of_overflowing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.xml"), junit("pkg.A", u64::MAX, 0, 0, "1")).unwrap();
        std::fs::write(dir.path().join("b.xml"), junit("pkg.B", u64::MAX, 1, 0, "1")).unwrap();

        let summary = normalize(dir.path()).unwrap();
        assert_eq!(summary.total, u64::MAX);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.passed, u64::MAX - 1);
    }

    #[test]
    fn directory_rejects_other_formats() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("junit.xml"), junit("pkg.A", 1, 0, 0, "1")).unwrap();
        std::fs::write(
            dir.path().join("nunit.xml"),
            r#"<test-run total="1" passed="1"/>"#,
        )
        .unwrap();

        let err = normalize(dir.path()).unwrap_err();
        match &err {
            ReportError::NoDirectorySupport { root, .. } => assert_eq!(root, "test-run"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("this format has no directory support"));
    }

    #[test]
    fn directory_rejects_unknown_roots() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        let err = normalize(dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::Unsupported { ref root, .. } if root == "project"));
    }

    #[test]
    fn malformed_file_is_reported_not_summarised() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xml");
        std::fs::write(&path, r#"<testsuite name="a" tests="3"><testcase"#).unwrap();
        let err = normalize(&path).unwrap_err();
        assert!(matches!(err, ReportError::Malformed { .. }));

        std::fs::write(&path, r#"<testsuite name="a" tests="3"/>trailing"#).unwrap();
        let err = normalize(&path).unwrap_err();
        assert!(matches!(err, ReportError::Malformed { .. }));
    }

    #[test]
    fn single_file_of_any_supported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.xml");
        std::fs::write(
            &path,
            r#"<test-run total="3" passed="2" failed="1" skipped="0"><test-suite name="Acme.Tests.dll"/></test-run>"#,
        )
        .unwrap();
        let summary = normalize(&path).unwrap();
        assert_eq!(summary.format, FormatKind::NUnit);
        assert_eq!(summary.name, "Acme.Tests");
    }
}
