use std::path::Path;

use anyhow::{Context, Result};

use crate::metrics::MetricsReport;

/// Loads a metrics report from a directory of per-series CSV files
/// (`accuracy.csv`, `latency.csv`, `cost.csv`), each a plain header+rows
/// file whose columns match the entry field names. Missing files read as
/// empty series, matching how absent series arrive over the wire.
pub fn report_from_dir(dir: &Path) -> Result<MetricsReport> {
    Ok(MetricsReport {
        accuracy: read_series(&dir.join("accuracy.csv"))?,
        latency: read_series(&dir.join("latency.csv"))?,
        cost: read_series(&dir.join("cost.csv"))?,
    })
}

fn read_series<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed opening metrics CSV: {}", path.display()))?;
    let mut out = Vec::new();
    for record in reader.deserialize() {
        let entry: T =
            record.with_context(|| format!("invalid metrics row in {}", path.display()))?;
        out.push(entry);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::report_from_dir;

    #[test]
    fn loads_available_series_and_defaults_the_rest() {
        let dir = std::env::temp_dir().join("upskill-advisor-ingest-test");
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        fs::write(
            dir.join("latency.csv"),
            "timestamp,component,operation,duration_ms,success\n\
             2026-08-01T09:00:00Z,advisor,advise,1250.5,true\n\
             2026-08-01T09:00:05Z,advisor,advise,3100.0,false\n",
        )
        .expect("failed to write latency csv");

        let report = report_from_dir(&dir).expect("failed to load report");
        assert_eq!(report.latency.len(), 2);
        assert!((report.latency[0].duration_ms - 1250.5).abs() < 1e-9);
        assert!(!report.latency[1].success);
        assert!(report.accuracy.is_empty());
        assert!(report.cost.is_empty());

        fs::remove_dir_all(&dir).ok();
    }
}
