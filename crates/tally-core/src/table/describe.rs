use crate::{aggregate::quantile_linear_sorted, error::Error, table::Table};
use serde::Serialize;

///
/// ColumnStats
///
/// Descriptive statistics for one numeric column.
/// Missing cells are excluded; `count` is the number of non-missing cells.
/// `std` is the sample standard deviation (n - 1 denominator) and is `None`
/// below two values; every other statistic is `None` on an empty column.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnStats {
    pub count: u64,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStats {
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub(crate) fn from_values(mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);

        let count = values.len();
        let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
        let std = match (count, mean) {
            (n, Some(mean)) if n >= 2 => {
                let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
                Some((ss / (n - 1) as f64).sqrt())
            }
            _ => None,
        };

        Self {
            count: count as u64,
            mean,
            std,
            min: values.first().copied(),
            q25: quantile_linear_sorted(&values, 0.25),
            q50: quantile_linear_sorted(&values, 0.5),
            q75: quantile_linear_sorted(&values, 0.75),
            max: values.last().copied(),
        }
    }
}

///
/// Description
///
/// Per-column statistics in the order the columns were requested.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Description {
    columns: Vec<(String, ColumnStats)>,
}

impl Description {
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&ColumnStats> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, stats)| stats)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnStats)> {
        self.columns.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Table {
    /// Descriptive statistics for the named numeric columns.
    pub fn describe<S: AsRef<str>>(&self, columns: &[S]) -> Result<Description, Error> {
        let mut described = Vec::with_capacity(columns.len());
        for name in columns {
            let name = name.as_ref();
            let slot = self.schema().resolve_numeric(name, "describe")?;
            let values = self
                .raw_rows()
                .filter_map(|row| row[slot].as_f64())
                .collect::<Vec<_>>();

            described.push((name.to_string(), ColumnStats::from_values(values)));
        }

        Ok(Description { columns: described })
    }
}
