use crate::models::{FormatKind, PartialSummary};
use crate::report::timestamp;
use crate::report::tree::ParseTree;

use super::{count, seconds, strip_last_segment};

/// TestNG `testng-results`: counts are read from the root as-is, name and
/// times come from the first suite.
pub(super) fn extract(tree: &ParseTree, root: usize, fallback: &str) -> PartialSummary {
    let mut summary = PartialSummary::new(FormatKind::TestNG, fallback);
    summary.total = count(tree.attr(root, "total"));
    summary.passed = count(tree.attr(root, "passed"));
    summary.failed = count(tree.attr(root, "failed"));
    summary.skipped = count(tree.attr(root, "skipped"));
    summary.ignored = count(tree.attr(root, "ignored"));

    let Some(suite) = tree.find_child_by_name(root, "suite") else {
        return summary;
    };

    if let Some(class) = tree.descend(suite, &["test", "class"])
        && let Some(name) = tree.attr(class, "name")
    {
        summary.name = strip_last_segment(name);
    }

    let started = tree.attr(suite, "started-at");
    let finished = tree.attr(suite, "finished-at");
    summary.start_time = timestamp::or_empty(started.and_then(timestamp::testng), "started-at", started);
    summary.end_time = timestamp::or_empty(finished.and_then(timestamp::testng), "finished-at", finished);
    summary.duration_seconds = seconds(tree.attr(suite, "duration-ms")) / 1000.0;
    summary
}
