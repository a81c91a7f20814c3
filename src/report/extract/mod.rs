mod junit;
mod mstest;
mod nunit;
mod testng;
mod xunit;

use crate::error::ReportError;
use crate::models::{FormatKind, PartialSummary};

use super::classify::Classified;
use super::loader::RawDocument;
use super::tree::ParseTree;

/// Produce the partial summary for a classified document.
pub fn extract(
    tree: &ParseTree,
    classified: &Classified,
    doc: &RawDocument,
) -> Result<PartialSummary, ReportError> {
    let fallback = doc.fallback_name();
    let summary = match classified.kind {
        FormatKind::JUnit => junit::extract(tree, classified, &fallback),
        FormatKind::TestNG => testng::extract(tree, classified.root, &fallback),
        FormatKind::XUnit => xunit::extract(tree, classified.root, &fallback),
        FormatKind::NUnit => nunit::extract(tree, classified.root, &fallback),
        FormatKind::UnitTest => mstest::extract(tree, classified.root, &fallback),
        FormatKind::Unsupported => {
            return Err(ReportError::Unsupported {
                path: doc.path.clone(),
                root: classified.tag.clone(),
            });
        }
    };
    Ok(summary)
}

/// Drop the last `.segment` of a dotted identifier: `com.acme.Foo` -> `com.acme`.
fn strip_last_segment(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) => name[..dot].to_string(),
        None => name.to_string(),
    }
}

/// Integer attribute; missing or unparseable values count as zero.
fn count(raw: Option<&str>) -> u64 {
    let Some(raw) = raw.map(str::trim) else {
        return 0;
    };
    raw.parse::<u64>().unwrap_or_else(|_| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64)
            .unwrap_or(0)
    })
}

/// Seconds attribute; missing, negative or unparseable values are zero.
fn seconds(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
pub(crate) fn extract_str(xml: &str) -> Result<PartialSummary, ReportError> {
    let doc = RawDocument {
        path: "reports/fallback.xml".into(),
        text: xml.to_string(),
    };
    let tree = ParseTree::parse(&doc.text).unwrap();
    let classified = super::classify::classify(&tree);
    extract(&tree, &classified, &doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_the_final_segment() {
        assert_eq!(strip_last_segment("com.acme.Foo"), "com.acme");
        assert_eq!(strip_last_segment("Foo"), "Foo");
        assert_eq!(strip_last_segment("Acme.Tests.dll"), "Acme.Tests");
        assert_eq!(strip_last_segment(""), "");
    }

    #[test]
    fn lenient_numbers() {
        assert_eq!(count(Some(" 12 ")), 12);
        assert_eq!(count(Some("12.9")), 12);
        assert_eq!(count(Some("-3")), 0);
        assert_eq!(count(Some("many")), 0);
        assert_eq!(count(None), 0);
        assert_eq!(seconds(Some("0.25")), 0.25);
        assert_eq!(seconds(Some("-1")), 0.0);
        assert_eq!(seconds(Some("NaN")), 0.0);
    }

    #[test]
    fn unsupported_root_names_the_tag() {
        let err = extract_str("<coverage line-rate=\"1\"/>").unwrap_err();
        match err {
            ReportError::Unsupported { root, .. } => assert_eq!(root, "coverage"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
