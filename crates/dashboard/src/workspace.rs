use crate::error::DashboardError;
use analytics::AnalyticsError;
use dataset::loader::Table;
use dataset::{Dataset, DatasetDraft, TableKind};
use std::sync::Arc;

/// The tables a dashboard currently serves.
///
/// Tables arrive one at a time. Once all three are present a new immutable
/// snapshot is published; readers clone the `Arc` and never see a table change
/// underneath them.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    draft: DatasetDraft,
    snapshot: Option<Arc<Dataset>>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every given table and publishes at most one new snapshot.
    ///
    /// Tables are parsed by the caller, so a batch that failed to parse never
    /// reaches the workspace.
    pub fn replace_tables<I>(&mut self, tables: I)
    where
        I: IntoIterator<Item = Table>,
    {
        for table in tables {
            self.draft.insert(table);
        }
        if let Some(dataset) = self.draft.to_dataset() {
            self.snapshot = Some(Arc::new(dataset));
        }
    }

    /// Rows held per table; `None` for tables not received yet.
    pub fn row_counts(&self) -> Vec<(TableKind, Option<usize>)> {
        TableKind::ALL
            .into_iter()
            .map(|kind| (kind, self.draft.row_count(kind)))
            .collect()
    }

    /// The current snapshot.
    ///
    /// Fails with `MissingPrecondition` until all three tables are present, since
    /// stock levels and profits cannot be derived without them.
    pub fn snapshot(&self) -> Result<Arc<Dataset>, DashboardError> {
        self.snapshot.clone().ok_or_else(|| {
            let missing: Vec<String> = self.draft.missing().iter().map(|k| k.to_string()).collect();
            AnalyticsError::MissingPrecondition(format!(
                "products cannot be enriched until the {} table(s) are loaded",
                missing.join(", ")
            ))
            .into()
        })
    }
}
