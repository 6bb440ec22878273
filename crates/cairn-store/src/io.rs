//! JSONL I/O and atomic file operations

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Append JSON records to a JSONL file, one per line
pub fn append_jsonl<'a, T, I>(path: &Path, records: I) -> std::io::Result<usize>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);

    let mut written = 0;
    for record in records {
        let json = serde_json::to_string(record)?;
        writeln!(writer, "{}", json)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Read all records from a JSONL file, skipping malformed lines
pub fn read_jsonl<T: for<'de> Deserialize<'de>>(path: &Path) -> std::io::Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    let mut malformed = 0usize;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => records.push(record),
            Err(_) => malformed += 1,
        }
    }

    if malformed > 0 {
        tracing::warn!(path = %path.display(), malformed, "skipped malformed JSONL lines");
    }
    Ok(records)
}

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Marker {
        id: u32,
        label: String,
    }

    #[test]
    fn test_append_then_read_skips_garbage() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("nested").join("log.jsonl");

        let first = vec![Marker {
            id: 1,
            label: "a".to_string(),
        }];
        assert_eq!(append_jsonl(&path, &first).unwrap(), 1);

        // A torn write from another process
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{\"id\": 2, \"lab").unwrap();

        let second = vec![Marker {
            id: 3,
            label: "c".to_string(),
        }];
        append_jsonl(&path, &second).unwrap();

        let read: Vec<Marker> = read_jsonl(&path).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].id, 1);
        assert_eq!(read[1].id, 3);
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        let read: Vec<Marker> = read_jsonl(&temp.path().join("absent.jsonl")).unwrap();
        assert!(read.is_empty());
    }

    #[test]
    fn test_atomic_write() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("state.json");

        atomic_write(&path, b"{\"v\":1}").unwrap();
        atomic_write(&path, b"{\"v\":2}").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"v\":2}");
        assert!(!path.with_extension("tmp").exists());
    }
}
