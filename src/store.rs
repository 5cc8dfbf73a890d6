use std::sync::{Arc, RwLock};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::classifier::ScanResult;

/// Summary over one scan's result set. `valid = total - invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatistics {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

impl ScanStatistics {
    pub fn new(total: usize, valid: usize, invalid: usize) -> Self {
        Self {
            total,
            valid,
            invalid,
        }
    }

    pub fn from_results(results: &[ScanResult]) -> Self {
        let total = results.len();
        let invalid = results.iter().filter(|r| r.is_invalid).count();
        Self::new(total, total - invalid, invalid)
    }
}

/// Display/export filter over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ResultFilter {
    #[default]
    All,
    Valid,
    Invalid,
}

impl ResultFilter {
    pub fn matches(&self, result: &ScanResult) -> bool {
        match self {
            ResultFilter::All => true,
            ResultFilter::Valid => !result.is_invalid,
            ResultFilter::Invalid => result.is_invalid,
        }
    }
}

/// Latest scan's results. Single writer (whoever owns the scan), many
/// readers; `replace` swaps the whole set at once, so a snapshot taken
/// before the swap keeps observing the old set.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: RwLock<Arc<Vec<ScanResult>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, results: Vec<ScanResult>) {
        *self.results.write().unwrap() = Arc::new(results);
    }

    pub fn snapshot(&self) -> Arc<Vec<ScanResult>> {
        Arc::clone(&self.results.read().unwrap())
    }

    pub fn filter(&self, filter: ResultFilter) -> Vec<ScanResult> {
        self.snapshot()
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    pub fn statistics(&self) -> ScanStatistics {
        ScanStatistics::from_results(&self.snapshot())
    }
}
