use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::PipelineError;
use crate::models::{DocumentRecord, REQUIRED_COLUMNS};

/// Read the tabular metadata index (CSV with a header row).
///
/// A missing file is fatal for the run and reported as
/// [`PipelineError::MetadataIndexMissing`].
pub fn read_metadata_index(path: &Path) -> Result<Vec<DocumentRecord>> {
    if !path.exists() {
        return Err(PipelineError::MetadataIndexMissing(path.to_path_buf()).into());
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open metadata index: {:?}", path))?;
    parse_metadata_index(file, path)
}

/// Parse metadata rows from any reader; `path` is only used in messages.
///
/// Rows keep their original order, every value is read as text and extra
/// columns are ignored.
pub fn parse_metadata_index<R: Read>(reader: R, path: &Path) -> Result<Vec<DocumentRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .with_context(|| format!("Failed to read header of {:?}", path))?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(PipelineError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            }
            .into());
        }
    }

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for (line, row) in csv_reader.deserialize::<DocumentRecord>().enumerate() {
        let record = row.with_context(|| format!("Invalid row {} in {:?}", line + 1, path))?;
        if !seen.insert(record.doc_id.clone()) {
            return Err(PipelineError::DuplicateDocumentId(record.doc_id).into());
        }
        records.push(record);
    }

    Ok(records)
}

/// Every `*.txt` file under `root`, sorted by path.
///
/// With `recursive` the whole tree is searched, otherwise only `root` itself.
pub fn find_text_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&root.to_string_lossy());
    let pattern = if recursive {
        format!("{}/**/*.txt", escaped)
    } else {
        format!("{}/*.txt", escaped)
    };

    let mut files = Vec::new();
    for entry in glob::glob(&pattern).with_context(|| format!("Invalid pattern {}", pattern))? {
        let path = entry.context("Failed to read directory entry")?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "docID,eventID,Convention_Type,docTitle,City,State,Country,Item_Number,URL";

    #[test]
    fn test_parse_rows_in_order() {
        let csv = format!(
            "{}\nX2,E1,T,Second,C,S,US,2,http://y\nX1,E1,T,\"Speech, first\",C,S,US,1,http://x\n",
            HEADER
        );
        let records = parse_metadata_index(csv.as_bytes(), Path::new("index.csv")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].doc_id, "X2");
        assert_eq!(records[1].doc_title, "Speech, first");
        assert_eq!(records[1].url, "http://x");
    }

    #[test]
    fn test_extra_columns_ignored_and_numbers_kept_as_text() {
        let csv = format!("{},Notes\nX1,007,T,Speech,C,S,US,01,http://x,extra\n", HEADER);
        let records = parse_metadata_index(csv.as_bytes(), Path::new("index.csv")).unwrap();
        assert_eq!(records[0].event_id, "007");
        assert_eq!(records[0].item_number, "01");
    }

    #[test]
    fn test_missing_column() {
        let csv = "docID,eventID\nX1,E1\n";
        let err = parse_metadata_index(csv.as_bytes(), Path::new("index.csv")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingColumn { column, .. }) if column == "Convention_Type"
        ));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let csv = format!("{}\nX1,E,T,a,C,S,US,1,u\nX1,E,T,b,C,S,US,2,u\n", HEADER);
        let err = parse_metadata_index(csv.as_bytes(), Path::new("index.csv")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::DuplicateDocumentId(id)) if id == "X1"
        ));
    }

    #[test]
    fn test_missing_index_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_metadata_index(&dir.path().join("toc.csv")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MetadataIndexMissing(_))
        ));
    }

    #[test]
    fn test_find_text_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(dir.path().join("notes.md"), "x").unwrap();
        std::fs::write(dir.path().join("sub").join("c.txt"), "c").unwrap();

        let flat = find_text_files(dir.path(), false).unwrap();
        assert_eq!(flat.len(), 2);
        assert!(flat[0].ends_with("a.txt"));

        let deep = find_text_files(dir.path(), true).unwrap();
        assert_eq!(deep.len(), 3);
    }
}
