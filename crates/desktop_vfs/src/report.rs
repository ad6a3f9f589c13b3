//! Aggregated outcomes for multi-item filesystem operations.

use platform_host::{FsError, FsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
/// An item that was processed successfully.
pub struct BatchItem {
    /// Path the item was addressed by.
    pub source: String,
    /// Resulting path, for operations that relocate or create nodes.
    pub destination: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An item that failed; earlier and later items are unaffected.
pub struct BatchFailure {
    /// Path the item was addressed by.
    pub source: String,
    /// Failure reported by the engine.
    pub error: FsError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Best-effort outcome of applying one operation to many paths.
pub struct BatchReport {
    /// Items processed successfully, in request order.
    pub succeeded: Vec<BatchItem>,
    /// Items that failed, in request order.
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// Records the outcome for `source`.
    pub fn record(&mut self, source: impl Into<String>, result: FsResult<Option<String>>) {
        let source = source.into();
        match result {
            Ok(destination) => self.succeeded.push(BatchItem {
                source,
                destination,
            }),
            Err(error) => self.failed.push(BatchFailure { source, error }),
        }
    }

    /// Number of successful items.
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of failed items.
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Returns `true` when nothing failed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// First failure, used as the headline error.
    pub fn first_error(&self) -> Option<&FsError> {
        self.failed.first().map(|failure| &failure.error)
    }
}

#[cfg(test)]
mod tests {
    use platform_host::FsError;

    use super::*;

    #[test]
    fn record_splits_outcomes_in_order() {
        let mut report = BatchReport::default();
        report.record("/a", Ok(Some("/dst/a".to_string())));
        report.record("/b", Err(FsError::not_found("mv: cannot stat '/b'")));
        report.record("/c", Err(FsError::not_found("mv: cannot stat '/c'")));

        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failure_count(), 2);
        assert!(!report.is_complete());
        assert_eq!(
            report.first_error().map(|e| e.message.as_str()),
            Some("mv: cannot stat '/b'")
        );
    }
}
