use serde::{Deserialize, Serialize};

/// Files found in the server's source folder by a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanSummary {
    pub files: Vec<String>,
    pub count: usize,
    /// Number of batches the classification will be split into.
    pub batches: usize,
    /// Number of configured categories.
    pub categories: usize,
}

/// Lifecycle of a classification run on the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationPhase {
    #[default]
    Idle,
    Processing,
    Completed,
    Error,
    #[serde(other)]
    Unknown,
}

impl ClassificationPhase {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Processing)
    }
}

/// Progress snapshot of the running classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassificationStatus {
    pub status: ClassificationPhase,
    /// Percentage in `0..=100`.
    pub progress: u8,
    pub current_batch: usize,
    pub total_batches: usize,
    pub current_file: String,
}

/// A single file together with the category the model picked for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClassifiedFile {
    /// 1-based position of the file in the scan.
    pub id: u32,
    pub filename: String,
    pub category_index: usize,
    pub category: String,
}

/// Outcome of a finished classification run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassificationResults {
    pub results: Vec<ClassifiedFile>,
    pub categories: Vec<String>,
    pub total_files: usize,
}

impl ClassificationResults {
    /// Applies a manual category change locally, mirroring what the server
    /// does on adjust. Returns `false` for an unknown file or category.
    pub fn adjust(&mut self, file_id: u32, category_index: usize) -> bool {
        let Some(category) = self.categories.get(category_index) else {
            return false;
        };
        match self.results.iter_mut().find(|file| file.id == file_id) {
            Some(file) => {
                file.category_index = category_index;
                file.category = category.clone();
                true
            }
            None => false,
        }
    }
}
