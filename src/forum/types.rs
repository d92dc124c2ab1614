use serde::Serialize;

#[derive(Serialize, Default)]
pub struct ExtractSummary {
    pub processed: usize,
    pub written: Vec<String>,
    pub skipped: usize,
    pub errors: usize,
}

#[derive(Serialize, Default)]
pub struct MetaSummary {
    pub processed: usize,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
    pub keys: Vec<String>,
    pub store_size: usize,
}
