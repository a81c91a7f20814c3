use crate::models::FormatKind;

use super::tree::ParseTree;

/// Root element names checked in priority order. The first one present wins.
const MARKERS: [(&str, FormatKind); 6] = [
    ("testng-results", FormatKind::TestNG),
    ("assemblies", FormatKind::XUnit),
    ("test-run", FormatKind::NUnit),
    ("TestRun", FormatKind::UnitTest),
    ("testsuites", FormatKind::JUnit),
    ("testsuite", FormatKind::JUnit),
];

/// Result of classifying one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: FormatKind,
    /// Element the extractor starts from.
    pub root: usize,
    /// Its tag, kept for diagnostics.
    pub tag: String,
}

pub fn classify(tree: &ParseTree) -> Classified {
    let matched = MARKERS.iter().find_map(|&(tag, kind)| {
        tree.find_child_by_name(ParseTree::DOCUMENT, tag)
            .map(|root| (kind, root))
    });

    match matched {
        Some((kind, root)) => Classified {
            kind,
            root,
            tag: tree.get(root).map(|n| n.name.clone()).unwrap_or_default(),
        },
        None => {
            let root = tree.root_element().unwrap_or(ParseTree::DOCUMENT);
            Classified {
                kind: FormatKind::Unsupported,
                root,
                tag: tree.get(root).map(|n| n.name.clone()).unwrap_or_default(),
            }
        }
    }
}
