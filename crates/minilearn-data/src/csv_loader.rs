use std::fs::File;
use std::io::Read;
use std::path::Path;

use minilearn_core::Matrix;
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::encoder::{LabelEncoder, OneHotEncoder};
use crate::error::{DataError, DataResult};

/// Inferred type of a feature column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.parse::<f64>().is_ok()
}

/// Raw CSV contents split into feature columns and a target column.
///
/// Column kinds are inferred from the first data row. Rows whose field count
/// differs from the header are skipped.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    target_name: String,
    feature_names: Vec<String>,
    kinds: Vec<ColumnKind>,
    rows: Vec<Vec<String>>,
    targets: Vec<String>,
}

impl CsvLoader {
    pub fn from_path(path: impl AsRef<Path>, target: &str) -> DataResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file, target)
    }

    pub fn from_reader<R: Read>(reader: R, target: &str) -> DataResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(DataError::EmptyFile);
        }
        let target_idx = headers
            .iter()
            .position(|h| h == target)
            .ok_or_else(|| DataError::MissingTarget(target.to_string()))?;

        let mut rows = Vec::new();
        let mut targets = Vec::new();
        let mut skipped = 0usize;
        for result in rdr.records() {
            let record = result?;
            if record.len() != headers.len() {
                skipped += 1;
                continue;
            }
            let mut features = Vec::with_capacity(headers.len() - 1);
            for (i, field) in record.iter().enumerate() {
                if i == target_idx {
                    targets.push(field.to_string());
                } else {
                    features.push(field.to_string());
                }
            }
            rows.push(features);
        }
        if skipped > 0 {
            debug!(skipped, "skipped rows with wrong field count");
        }
        let first = rows.first().ok_or(DataError::NoRows)?;

        let kinds: Vec<ColumnKind> = first
            .iter()
            .map(|v| {
                if is_numeric(v) {
                    ColumnKind::Numeric
                } else {
                    ColumnKind::Categorical
                }
            })
            .collect();
        let feature_names: Vec<String> = headers
            .into_iter()
            .enumerate()
            .filter(|&(i, _)| i != target_idx)
            .map(|(_, h)| h)
            .collect();

        let loader = CsvLoader {
            target_name: target.to_string(),
            feature_names,
            kinds,
            rows,
            targets,
        };
        info!(
            rows = loader.n_rows(),
            features = loader.feature_names.len(),
            numeric = loader.count_kind(ColumnKind::Numeric),
            categorical = loader.count_kind(ColumnKind::Categorical),
            "loaded CSV"
        );
        Ok(loader)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Raw feature column names, target excluded.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn column_kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    fn count_kind(&self, kind: ColumnKind) -> usize {
        self.kinds.iter().filter(|&&k| k == kind).count()
    }

    /// Convert to a numeric [`Dataset`].
    ///
    /// Numeric cells that fail to parse become `0.0`. Categorical columns are
    /// one-hot encoded when `one_hot` is set and dropped otherwise. A target
    /// column that is not entirely numeric is label-encoded in sorted order.
    pub fn prepare(&self, one_hot: bool) -> DataResult<Dataset> {
        let encoders: Vec<Option<OneHotEncoder>> = self
            .kinds
            .iter()
            .enumerate()
            .map(|(j, kind)| match kind {
                ColumnKind::Categorical if one_hot => {
                    Some(OneHotEncoder::fit(self.rows.iter().map(|r| r[j].as_str())))
                }
                _ => None,
            })
            .collect();

        let mut names = Vec::new();
        for ((name, kind), enc) in self.feature_names.iter().zip(&self.kinds).zip(&encoders) {
            match (kind, enc) {
                (ColumnKind::Numeric, _) => names.push(name.clone()),
                (ColumnKind::Categorical, Some(enc)) => names.extend(enc.feature_names(name)),
                (ColumnKind::Categorical, None) => {}
            }
        }

        let mut data: Vec<f64> = Vec::with_capacity(self.rows.len() * names.len());
        for row in &self.rows {
            for ((value, kind), enc) in row.iter().zip(&self.kinds).zip(&encoders) {
                match (kind, enc) {
                    (ColumnKind::Numeric, _) => data.push(value.parse().unwrap_or(0.0)),
                    (ColumnKind::Categorical, Some(enc)) => enc.encode_into(value, &mut data),
                    (ColumnKind::Categorical, None) => {}
                }
            }
        }
        let features = Matrix::new(data, self.rows.len(), names.len())?;

        let (targets, classes) = self.encode_targets();
        let dataset = Dataset::new(features, targets)?
            .with_feature_names(names)
            .with_target_classes(classes);
        debug!(
            samples = dataset.n_samples(),
            features = dataset.n_features(),
            "prepared dataset"
        );
        Ok(dataset)
    }

    fn encode_targets(&self) -> (Vec<f64>, Vec<String>) {
        let parsed: Option<Vec<f64>> = self.targets.iter().map(|t| t.parse().ok()).collect();
        match parsed {
            Some(values) => (values, Vec::new()),
            None => {
                let enc = LabelEncoder::fit(self.targets.iter().map(String::as_str));
                let values = self
                    .targets
                    .iter()
                    .map(|t| enc.transform(t).unwrap_or(0.0))
                    .collect();
                (values, enc.classes().to_vec())
            }
        }
    }
}
