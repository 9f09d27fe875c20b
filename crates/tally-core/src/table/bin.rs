use crate::{
    error::Error,
    table::{ColumnDef, ColumnType, Row, Table},
    value::Value,
};

///
/// Interval
/// right-closed numeric bin `(lo, hi]`
///

#[derive(Clone, Debug)]
struct Interval {
    lo: f64,
    hi: f64,
    label: String,
}

impl Interval {
    fn contains(&self, v: f64) -> bool {
        v > self.lo && v <= self.hi
    }
}

impl Table {
    /// Bin a numeric column into right-closed intervals.
    ///
    /// Appends a `Category` column named `output` whose labels read
    /// `"(lo, hi]"`. Cells outside every interval, and missing cells, become
    /// `Null`.
    pub fn bin(&self, column: &str, edges: &[f64], output: &str) -> Result<Self, Error> {
        let slot = self.schema().resolve_numeric(column, "bin")?;
        let intervals = intervals(column, edges)?;
        let schema = self
            .schema()
            .with_column(ColumnDef::new(output, ColumnType::Category))?;

        let rows = self
            .raw_rows()
            .map(|values| {
                let label = values[slot]
                    .as_f64()
                    .and_then(|v| intervals.iter().find(|i| i.contains(v)))
                    .map_or(Value::Null, |i| Value::category(i.label.clone()));

                let mut extended = values.to_vec();
                extended.push(label);
                Row(extended)
            })
            .collect();

        Ok(Self { schema, rows })
    }
}

fn intervals(column: &str, edges: &[f64]) -> Result<Vec<Interval>, Error> {
    let invalid = |reason: &str| Error::InvalidBins {
        column: column.to_string(),
        reason: reason.to_string(),
    };

    if edges.len() < 2 {
        return Err(invalid("at least two edges are required"));
    }
    if edges.iter().any(|e| !e.is_finite()) {
        return Err(invalid("edges must be finite"));
    }
    if edges.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid("edges must be strictly increasing"));
    }

    Ok(edges
        .windows(2)
        .map(|w| Interval {
            lo: w[0],
            hi: w[1],
            label: format!("({}, {}]", w[0], w[1]),
        })
        .collect())
}
