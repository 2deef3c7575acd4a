use uuid::Uuid;

/// Correlation id that follows one polling cycle through resolution,
/// retrieval, classification and alerting.
#[derive(Clone, Debug)]
pub struct CycleId(String);

impl CycleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().as_hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}
