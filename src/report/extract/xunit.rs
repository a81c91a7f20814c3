use crate::models::{FormatKind, PartialSummary};
use crate::report::timestamp;
use crate::report::tree::ParseTree;

use super::{count, seconds, strip_last_segment};

/// xUnit.net v2 `assemblies`. Each field prefers the first assembly's
/// attribute and falls back to that assembly's first collection. The format
/// has no end time, so it is computed from the start and the duration.
pub(super) fn extract(tree: &ParseTree, root: usize, fallback: &str) -> PartialSummary {
    let assembly = tree.find_child_by_name(root, "assembly");
    let collection = assembly.and_then(|a| tree.find_child_by_name(a, "collection"));
    let field = |key: &str| {
        assembly
            .and_then(|a| tree.attr(a, key))
            .or_else(|| collection.and_then(|c| tree.attr(c, key)))
    };

    let mut summary = PartialSummary::new(
        FormatKind::XUnit,
        field("name").map_or_else(|| fallback.to_string(), strip_last_segment),
    );
    summary.total = count(field("total"));
    summary.passed = count(field("passed"));
    summary.failed = count(field("failed"));
    summary.skipped = count(field("skipped"));
    summary.duration_seconds = seconds(field("time"));
    summary.derive_ignored();

    let raw = tree.attr(root, "timestamp");
    let start = raw.and_then(timestamp::xunit);
    let end = start.and_then(|s| timestamp::plus_seconds(s, summary.duration_seconds));
    summary.start_time = timestamp::or_empty(start.map(timestamp::to_utc_string), "timestamp", raw);
    summary.end_time = end.map(timestamp::to_utc_string).unwrap_or_default();
    summary
}
