use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};

use super::clause::{FilterClause, FilterList};

/// Write the clauses of `list` to `path` as pretty JSON.
pub fn save_preset(path: &Path, list: &FilterList) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), list.clauses())
        .context("writing filter preset")?;
    log::info!("Saved {} filter clauses to {}", list.len(), path.display());
    Ok(())
}

/// Read clauses saved by [`save_preset`], re-validating each one.
pub fn load_preset(path: &Path) -> Result<Vec<FilterClause>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let clauses: Vec<FilterClause> =
        serde_json::from_reader(BufReader::new(file)).context("parsing filter preset")?;

    clauses
        .into_iter()
        .enumerate()
        .map(|(i, c)| c.validated().with_context(|| format!("clause #{}", i + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::clause::Logic;

    #[test]
    fn test_preset_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");
        let list = FilterList::from(vec![
            FilterClause::new("Name", "alice", true, Logic::And, "(", "").unwrap(),
            FilterClause::new("City", "oslo", false, Logic::Or, "", ")").unwrap(),
        ]);

        save_preset(&path, &list).unwrap();
        let loaded = load_preset(&path).unwrap();
        assert_eq!(loaded, list.clauses());

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"logic\": \"OR\""));
    }

    #[test]
    fn test_preset_with_bad_brackets_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"[{"column":"A","keyword":"x","include":true,"logic":"AND","prefix":"(x"}]"#,
        )
        .unwrap();

        let err = load_preset(&path).unwrap_err();
        assert!(format!("{err:#}").contains("clause #1"));
    }
}
