use serde::{Serialize, Deserialize};

/// Retention settings for the series store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum number of samples retained per metric key.
    ///
    /// On overflow the oldest entries are evicted first.
    pub retention: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { retention: 1000 }
    }
}

impl StoreConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.retention == 0 {
            return Err("Retention cannot be 0".into());
        }
        Ok(())
    }
}
