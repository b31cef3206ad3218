use gpui::Context;
use quarkfm_bridge::classification::{ClassificationResults, ClassificationStatus, ScanSummary};

/// Everything the server reported about scanning and classifying files.
#[derive(Debug, Clone, Default)]
pub struct ClassificationEntity {
    pub summary: Option<ScanSummary>,
    pub status: Option<ClassificationStatus>,
    pub results: Option<ClassificationResults>,
}

impl ClassificationEntity {
    pub fn set_summary(&mut self, summary: ScanSummary, cx: &mut Context<Self>) {
        self.summary = Some(summary);
        cx.notify();
    }

    pub fn set_status(&mut self, status: ClassificationStatus, cx: &mut Context<Self>) {
        self.status = Some(status);
        cx.notify();
    }

    pub fn set_results(&mut self, results: ClassificationResults, cx: &mut Context<Self>) {
        self.results = Some(results);
        cx.notify();
    }

    pub fn is_running(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(|status| status.status.is_running())
    }

    /// Moves a file to another category locally. Returns `false` when the
    /// file or the category is unknown.
    pub fn adjust(&mut self, file_id: u32, category_index: usize, cx: &mut Context<Self>) -> bool {
        let adjusted = self
            .results
            .as_mut()
            .is_some_and(|results| results.adjust(file_id, category_index));
        if adjusted {
            cx.notify();
        }
        adjusted
    }
}
