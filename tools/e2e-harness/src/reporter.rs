//! Scenario result reporter — formats PASS/FAIL output and prints a summary.

pub struct Reporter {
    passed: usize,
    failed: usize,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            passed: 0,
            failed: 0,
        }
    }

    pub fn record(&mut self, suite: &str, scenario: &str, result: anyhow::Result<()>) {
        match result {
            Ok(()) => {
                self.passed += 1;
                println!("PASS  [{suite}] {scenario}");
            }
            Err(err) => {
                self.failed += 1;
                println!("FAIL  [{suite}] {scenario}");
                println!("        error: {err:#}");
            }
        }
    }

    pub fn print_summary(&self, title: &str) {
        println!();
        println!("────────────────────────────────────────────────────");
        println!("{title}: {} passed, {} failed", self.passed, self.failed);
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_passed_starts_true() {
        assert!(Reporter::new().all_passed());
    }

    #[test]
    fn counts_passes_and_failures() {
        let mut reporter = Reporter::new();
        reporter.record("users", "a", Ok(()));
        reporter.record("users", "b", Err(anyhow::anyhow!("boom")));
        reporter.record("contacts", "c", Ok(()));
        assert!(!reporter.all_passed());
        assert_eq!((reporter.passed, reporter.failed), (2, 1));
    }
}
