use crate::models::{FormatKind, PartialSummary};

/// Running total over the JUnit-family reports of a directory.
#[derive(Debug)]
pub struct Aggregate {
    running: PartialSummary,
    folded: usize,
}

impl Aggregate {
    pub fn new() -> Self {
        Self {
            running: PartialSummary::new(FormatKind::JUnit, ""),
            folded: 0,
        }
    }

    /// Add one report. Counts and duration accumulate, `passed` is recomputed
    /// from the running totals and the name is replaced by the newest one.
    pub fn fold(&mut self, part: PartialSummary) {
        let running = &mut self.running;
        running.total = running.total.saturating_add(part.total);
        running.failed = running.failed.saturating_add(part.failed);
        running.ignored = running.ignored.saturating_add(part.ignored);
        running.skipped = running.skipped.saturating_add(part.skipped);
        running.duration_seconds += part.duration_seconds;
        running.name = part.name;
        running.derive_passed();
        self.folded += 1;
    }

    pub fn folded(&self) -> usize {
        self.folded
    }

    pub fn finish(self) -> PartialSummary {
        self.running
    }
}
