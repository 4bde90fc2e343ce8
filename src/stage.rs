/// Per-URL result of one fetch-and-record step. Skips carry the reason so a
/// stage can report them without aborting the remaining work.
#[derive(Debug)]
pub enum Outcome {
    Recorded,
    AlreadyDone,
    Skipped(String),
}

/// Tallies of per-URL outcomes for one stage run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    /// URLs fetched, parsed, and written to the cache.
    pub recorded: usize,
    /// URLs the cache already covered; nothing was fetched.
    pub already_done: usize,
    /// URLs skipped this run; they stay pending and are retried by the next
    /// run.
    pub skipped: usize,
}

impl StageReport {
    pub fn tally(&mut self, stage: &str, url: &str, outcome: Outcome) {
        match outcome {
            Outcome::Recorded => self.recorded += 1,
            Outcome::AlreadyDone => self.already_done += 1,
            Outcome::Skipped(reason) => {
                tracing::warn!(stage, url, reason = %reason, "skipped; will retry on a later run");
                self.skipped += 1;
            }
        }
    }
}
