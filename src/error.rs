use thiserror::Error;

#[derive(Debug, Error)]
pub enum DietError {
    #[error("Invalid data at {location}: {reason}")]
    InvalidData { location: String, reason: String },

    #[error("Unknown {kind}: {key}")]
    UnknownKey { kind: &'static str, key: String },

    #[error("Unresolved nutrient reference '{nutrient}' in {context}")]
    UnresolvedReference { nutrient: String, context: String },

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DietError {
    /// Malformed cell in a data row. `row` is 1-based within the table body.
    pub fn invalid_cell(row: usize, column: &str, reason: impl Into<String>) -> Self {
        DietError::InvalidData {
            location: format!("row {}, column '{}'", row, column),
            reason: reason.into(),
        }
    }

    pub fn invalid_data(location: impl Into<String>, reason: impl Into<String>) -> Self {
        DietError::InvalidData {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_food(name: &str) -> Self {
        DietError::UnknownKey {
            kind: "food",
            key: name.to_string(),
        }
    }

    pub fn unknown_nutrient(name: &str) -> Self {
        DietError::UnknownKey {
            kind: "nutrient",
            key: name.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DietError>;
