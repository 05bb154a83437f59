//! Header parsing and diagnosis skeleton construction.

use std::collections::HashSet;

use tracing::info;

use crate::cache::IdentityCache;
use crate::error::{SchemaError, StoreResult};
use crate::hierarchy::build_hierarchy;
use crate::model::strip_code;
use crate::record::split_record;
use crate::store::GraphStore;

/// Leading columns that never name a diagnosis: visit id, sex, care site,
/// race, age and two pass-through columns.
pub const RESERVED_COLUMNS: usize = 7;

/// A diagnosis column and the code it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisColumn {
    pub index: usize,
    pub code: String,
}

/// The parsed header row, passed to every row processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
    diagnoses: Vec<DiagnosisColumn>,
}

impl Header {
    pub fn from_line(line: &str) -> Result<Self, SchemaError> {
        Self::parse(split_record(line))
    }

    pub fn parse(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.len() < RESERVED_COLUMNS {
            return Err(SchemaError::TooFewColumns {
                found: columns.len(),
                required: RESERVED_COLUMNS,
            });
        }

        let columns: Vec<String> = columns.into_iter().map(|c| c.trim().to_string()).collect();
        let diagnoses = columns
            .iter()
            .enumerate()
            .skip(RESERVED_COLUMNS)
            .map(|(index, name)| {
                let code = strip_code(name);
                if code.is_empty() {
                    Err(SchemaError::EmptyCode { column: index })
                } else {
                    Ok(DiagnosisColumn { index, code })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns, diagnoses })
    }

    /// Number of columns every data row must have.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn diagnosis_columns(&self) -> &[DiagnosisColumn] {
        &self.diagnoses
    }

    /// Diagnosis codes in column order, without repeats.
    pub fn distinct_codes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.diagnoses
            .iter()
            .map(|d| d.code.as_str())
            .filter(|code| seen.insert(*code))
            .collect()
    }
}

/// Build the diagnosis hierarchy for every code column in the header.
///
/// Returns the number of distinct codes processed.
pub async fn process_header<S: GraphStore>(cache: &IdentityCache<S>, header: &Header) -> StoreResult<usize> {
    let codes = header.distinct_codes();
    for code in &codes {
        build_hierarchy(cache, code).await?;
    }
    info!(columns = header.len(), codes = codes.len(), "Diagnosis hierarchy ready");
    Ok(codes.len())
}
