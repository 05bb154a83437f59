//! Data row parsing and per-visit graph writes.

use serde::Serialize;
use tracing::debug;

use crate::cache::IdentityCache;
use crate::error::{ParseError, StoreResult};
use crate::header::Header;
use crate::model::{normalize_key, NodeLabel, Relation};
use crate::record::split_record;
use crate::store::GraphStore;

/// One data row, normalized and ready to write.
///
/// The five identifier fields are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRow {
    /// 1-based line number in the source.
    pub line: usize,
    pub visit_id: String,
    pub sex: String,
    pub care_site: String,
    pub race: String,
    pub age: String,
    /// Dot-stripped codes whose flag column is set.
    pub diagnoses: Vec<String>,
}

impl VisitRow {
    pub fn parse(line: usize, raw: &str, header: &Header) -> Result<Self, ParseError> {
        let fields = split_record(raw);
        let fail = |reason: String| ParseError {
            line,
            content: raw.trim_end().to_string(),
            reason,
        };

        if fields.len() != header.len() {
            return Err(fail(format!(
                "expected {} columns, found {}",
                header.len(),
                fields.len()
            )));
        }

        let mut row = Self {
            line,
            visit_id: normalize_key(&fields[0]),
            sex: normalize_key(&fields[1]),
            care_site: normalize_key(&fields[2]),
            race: normalize_key(&fields[3]),
            age: normalize_key(&fields[4]),
            diagnoses: Vec::new(),
        };

        let required = [
            ("visit id", &row.visit_id),
            ("sex", &row.sex),
            ("care site", &row.care_site),
            ("race", &row.race),
            ("age", &row.age),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(fail(format!("{} is empty", name)));
        }

        row.diagnoses = header
            .diagnosis_columns()
            .iter()
            .filter(|column| is_flag_set(&fields[column.index]))
            .map(|column| column.code.clone())
            .collect();
        Ok(row)
    }

    /// Categorical attributes with the relation that links them to the visit.
    fn attributes(&self) -> [(Relation, &str); 4] {
        [
            (Relation::Sex, self.sex.as_str()),
            (Relation::CareSite, self.care_site.as_str()),
            (Relation::Race, self.race.as_str()),
            (Relation::Age, self.age.as_str()),
        ]
    }
}

/// Whether a diagnosis cell marks the code as present.
///
/// Quotes are already stripped, so a quoted `"1"` and a bare `1` both arrive
/// here as `1`. No other spelling counts.
pub fn is_flag_set(value: &str) -> bool {
    value.trim() == "1"
}

/// What a processed row wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowOutcome {
    pub attributes: usize,
    pub dx_links: usize,
}

/// Writes a single visit and its edges.
pub struct RowProcessor<'a, S> {
    cache: &'a IdentityCache<S>,
}

impl<'a, S: GraphStore> RowProcessor<'a, S> {
    pub fn new(cache: &'a IdentityCache<S>) -> Self {
        Self { cache }
    }

    pub async fn process(&self, row: &VisitRow) -> StoreResult<RowOutcome> {
        let store = self.cache.store();
        let visit = store.create_or_update(NodeLabel::Visit, &row.visit_id).await?;
        let mut outcome = RowOutcome::default();

        for (relation, value) in row.attributes() {
            let node = self.cache.lookup_or_insert(relation.target(), value).await?;
            store.connect(&visit, relation, &node).await?;
            outcome.attributes += 1;
        }

        for code in &row.diagnoses {
            let dx = self.cache.lookup_or_insert(NodeLabel::Diagnosis, code).await?;
            store.connect(&visit, Relation::Dx, &dx).await?;
            outcome.dx_links += 1;
        }

        debug!(line = row.line, visit = %row.visit_id, dx = outcome.dx_links, "Processed visit");
        Ok(outcome)
    }
}
