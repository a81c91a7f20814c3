use crate::models::{FormatKind, PartialSummary};
use crate::report::timestamp;
use crate::report::tree::ParseTree;

use super::{count, strip_last_segment};

/// MSTest `.trx` (`TestRun`). There is no skipped or ignored concept, and the
/// duration is always computed from the normalized start and finish.
pub(super) fn extract(tree: &ParseTree, root: usize, fallback: &str) -> PartialSummary {
    let name = tree
        .descend(root, &["TestDefinitions", "UnitTest", "TestMethod"])
        .and_then(|method| tree.attr(method, "className"))
        .map_or_else(|| fallback.to_string(), strip_last_segment);

    let mut summary = PartialSummary::new(FormatKind::UnitTest, name);
    if let Some(counters) = tree.descend(root, &["ResultSummary", "Counters"]) {
        summary.total = count(tree.attr(counters, "total"));
        summary.passed = count(tree.attr(counters, "passed"));
        summary.failed = count(tree.attr(counters, "failed"));
    }

    let times = tree.find_child_by_name(root, "Times");
    let raw_start = times.and_then(|t| tree.attr(t, "start"));
    let raw_finish = times.and_then(|t| tree.attr(t, "finish"));
    let start = raw_start.and_then(timestamp::mstest);
    let finish = raw_finish.and_then(timestamp::mstest);

    if let (Some(start), Some(finish)) = (start, finish) {
        summary.duration_seconds = timestamp::seconds_between(start, finish);
    }
    summary.start_time = timestamp::or_empty(start.map(timestamp::to_utc_string), "start", raw_start);
    summary.end_time = timestamp::or_empty(finish.map(timestamp::to_utc_string), "finish", raw_finish);
    summary
}
