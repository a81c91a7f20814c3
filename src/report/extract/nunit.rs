use crate::models::{FormatKind, PartialSummary};
use crate::report::timestamp;
use crate::report::tree::ParseTree;

use super::{count, seconds, strip_last_segment};

/// NUnit 3 `test-run`.
pub(super) fn extract(tree: &ParseTree, root: usize, fallback: &str) -> PartialSummary {
    let name = tree
        .find_child_by_name(root, "test-suite")
        .and_then(|suite| tree.attr(suite, "name"))
        .map_or_else(|| fallback.to_string(), strip_last_segment);

    let mut summary = PartialSummary::new(FormatKind::NUnit, name);
    summary.total = count(tree.attr(root, "total"));
    summary.passed = count(tree.attr(root, "passed"));
    summary.failed = count(tree.attr(root, "failed"));
    summary.skipped = count(tree.attr(root, "skipped"));
    summary.duration_seconds = seconds(tree.attr(root, "duration"));
    summary.derive_ignored();

    let start = tree.attr(root, "start-time");
    let end = tree.attr(root, "end-time");
    summary.start_time = timestamp::or_empty(start.and_then(timestamp::nunit), "start-time", start);
    summary.end_time = timestamp::or_empty(end.and_then(timestamp::nunit), "end-time", end);
    summary
}
