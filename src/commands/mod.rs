//! CLI command handlers.
//!
//! Each handler loads bar files, runs the engine and prints pretty JSON to
//! stdout. Diagnostics go through `tracing`.

mod analyze;
mod cointegrate;
mod johansen;
mod screen;

pub use analyze::{analyze_series, run_analyze, AnalysisReport};
pub use cointegrate::run_cointegrate;
pub use johansen::run_johansen;
pub use screen::run_screen;

use crate::types::BarRecord;
use std::path::Path;

/// Read a JSON array of bars.
pub fn load_bars(path: &Path) -> Result<Vec<BarRecord>, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let bars: Vec<BarRecord> = serde_json::from_str(&raw)
        .map_err(|e| format!("cannot parse {}: {}", path.display(), e))?;
    Ok(bars)
}

/// Symbol for a bar file: its file stem (`data/AAPL.json` -> `AAPL`).
pub fn symbol_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_load_bars_roundtrip() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0]);
        let path = write_bars("load_roundtrip", &bars);
        assert_eq!(load_bars(&path).unwrap(), bars);
    }

    #[test]
    fn test_load_bars_missing_file() {
        let err = load_bars(Path::new("/nonexistent/bars.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_load_bars_bad_json() {
        let dir = std::env::temp_dir().join(format!("nexus-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("garbage.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_bars(&path).unwrap_err();
        assert!(err.to_string().contains("cannot parse"));
    }

    #[test]
    fn test_symbol_for() {
        assert_eq!(symbol_for(Path::new("data/AAPL.json")), "AAPL");
        assert_eq!(symbol_for(Path::new("MSFT")), "MSFT");
    }
}
