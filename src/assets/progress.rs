use std::fmt;

/// How far a collection download has come.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetDownloadProgress {
    pub completed: usize,
    pub total: usize,
}

impl AssetDownloadProgress {
    pub fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }

    /// Completed share in `0.0..=1.0`; an empty download counts as done.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.completed as f64 / self.total as f64).min(1.0)
        }
    }
}

impl fmt::Display for AssetDownloadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({:.0}%)",
            self.completed,
            self.total,
            self.fraction() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(AssetDownloadProgress::new(42, 69).to_string(), "42/69 (61%)");
        assert_eq!(AssetDownloadProgress::new(0, 0).to_string(), "0/0 (100%)");
    }
}
