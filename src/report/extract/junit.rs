use crate::models::{FormatKind, PartialSummary};
use crate::report::classify::Classified;
use crate::report::tree::ParseTree;

use super::{count, seconds, strip_last_segment};

/// JUnit and JUnit-compatible output (pytest, jest, surefire). With a
/// `testsuites` wrapper every child suite is summed; a bare `testsuite` is
/// read on its own. The name comes from the last suite that has one.
pub(super) fn extract(tree: &ParseTree, classified: &Classified, fallback: &str) -> PartialSummary {
    let suites: Vec<usize> = if classified.tag == "testsuites" {
        tree.children_named(classified.root, "testsuite").collect()
    } else {
        vec![classified.root]
    };

    let mut summary = PartialSummary::new(FormatKind::JUnit, fallback);
    let mut name = None;
    for suite in suites {
        let failed = count(tree.attr(suite, "failures")).saturating_add(count(tree.attr(suite, "errors")));
        summary.total = summary.total.saturating_add(count(tree.attr(suite, "tests")));
        summary.failed = summary.failed.saturating_add(failed);
        summary.skipped = summary.skipped.saturating_add(count(tree.attr(suite, "skipped")));
        summary.duration_seconds += seconds(tree.attr(suite, "time"));
        if let Some(suite_name) = tree.attr(suite, "name") {
            name = Some(strip_last_segment(suite_name));
        }
    }
    if let Some(name) = name {
        summary.name = name;
    }
    summary.derive_passed();
    summary
}
