use std::fs;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use log::debug;
use serde::Serialize;

use crate::error::GenError;
use crate::SourceSystem;

/// `<year>_<MM>_<system>.csv`
#[must_use]
pub fn file_name(system: SourceSystem, year: i32, month: u32) -> String {
    format!("{year}_{month:02}_{}.csv", system.name())
}

/// Writes `records` to `dir/file_name` as CSV with a header row, creating `dir` if needed.
/// An existing file is overwritten.
///
/// # Errors
/// Errors when the directory or file cannot be created, or a record fails to serialize
pub fn write_csv<T: Serialize>(
    dir: &Path,
    file_name: &str,
    records: &[T],
) -> Result<PathBuf, GenError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);

    let mut writer = WriterBuilder::new().has_headers(true).from_path(&path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    debug!("wrote {} rows to {}", records.len(), path.display());

    Ok(path)
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        id: u32,
        name: &'static str,
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name(SourceSystem::SalesSys1, 2025, 3),
            "2025_03_sales_sys1.csv"
        );
        assert_eq!(
            file_name(SourceSystem::SalesSys2, 2025, 11),
            "2025_11_sales_sys2.csv"
        );
    }

    #[test]
    fn test_write_csv_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("sample");
        let rows = [Row { id: 1, name: "a" }, Row { id: 2, name: "b" }];
        let path = write_csv(&dir, "rows.csv", &rows).unwrap();
        assert_eq!(path, dir.join("rows.csv"));
        let data = fs::read_to_string(path).unwrap();
        assert_eq!(data, "id,name\n1,a\n2,b\n");
    }

    #[test]
    fn test_write_csv_fails_on_file_in_place_of_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let res = write_csv(&blocker, "rows.csv", &[Row { id: 1, name: "a" }]);
        assert!(matches!(res, Err(GenError::IoError(_))));
    }
}
