//! Snapshot Module
//!
//! Dumps the whole store to a line-oriented text file and loads it back.
//! Each record is one JSON object (`{"Key":..,"Value":..,"TTl":..}`) and
//! records are separated by CRLF.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

use crate::error::{Result, StoreError};
use crate::store::{Entry, KeyValueStore};

/// Snapshot file used when none is configured, relative to the working directory.
pub const DEFAULT_SNAPSHOT_PATH: &str = "dump.txt";

const RECORD_SEPARATOR: &str = "\r\n";

// == Snapshot Codec ==
/// Reads and writes full-store snapshots at a fixed path.
///
/// Dumps and loads through the same codec run one at a time, so two dumps
/// never share the staging file.
#[derive(Debug)]
pub struct SnapshotCodec {
    path: PathBuf,
    file_lock: Mutex<()>,
}

impl SnapshotCodec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // == Dump ==
    /// Writes every entry of `store` to the snapshot file and returns the text.
    ///
    /// The snapshot is taken under a single read lock. The text is written to
    /// a temporary sibling file first and renamed over the target, so a
    /// failed dump leaves the previous snapshot in place. An empty store
    /// produces an empty file and an empty string.
    pub fn dump(&self, store: &KeyValueStore) -> Result<String> {
        let _file_guard = self.file_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = store.list();

        let mut snapshot = String::new();
        for entry in &entries {
            snapshot.push_str(&encode_line(entry)?);
            snapshot.push_str(RECORD_SEPARATOR);
        }

        let staging = self.staging_path();
        if let Err(err) = fs::write(&staging, &snapshot) {
            let _ = fs::remove_file(&staging);
            warn!(path = %self.path.display(), "Snapshot write failed: {}", err);
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            warn!(path = %self.path.display(), "Snapshot rename failed: {}", err);
            return Err(err.into());
        }

        info!(
            "Dumped {} entries to {}",
            entries.len(),
            self.path.display()
        );
        Ok(snapshot)
    }

    // == Load ==
    /// Replaces the contents of `store` with the snapshot file.
    ///
    /// Holds the store's write lock for the whole operation. The store is
    /// cleared first; a missing file or a malformed line aborts, keeping
    /// whatever was inserted before the failure. Stored TTLs are kept as is.
    /// Returns the number of entries loaded.
    pub fn load(&self, store: &KeyValueStore) -> Result<usize> {
        let _file_guard = self.file_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let result = store.with_entries_mut(|entries| -> Result<usize> {
            entries.clear();

            let reader = BufReader::new(File::open(&self.path)?);
            let mut loaded = 0;
            for (index, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let entry = decode_line(&line, index + 1)?;
                entries.insert(entry.key().to_string(), entry);
                loaded += 1;
            }
            Ok(loaded)
        });

        match &result {
            Ok(loaded) => info!("Loaded {} entries from {}", loaded, self.path.display()),
            Err(err) => warn!(path = %self.path.display(), "Snapshot load failed: {}", err),
        }
        result
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl Default for SnapshotCodec {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_PATH)
    }
}

// == Line Codec ==
/// Encodes one entry as a single JSON line, without the separator.
pub fn encode_line(entry: &Entry) -> Result<String> {
    Ok(serde_json::to_string(entry)?)
}

/// Decodes one snapshot line. `line_no` is 1-based and only used for errors.
///
/// Rejects records that could never have been written by `set`: a blank key,
/// a blank value, or a TTL that is already expired. A `null` value is a
/// cleared slot and is accepted.
pub fn decode_line(line: &str, line_no: usize) -> Result<Entry> {
    let entry: Entry = serde_json::from_str(line)?;

    if entry.key().trim().is_empty() {
        return Err(StoreError::MalformedRecord {
            line: line_no,
            reason: "blank key".to_string(),
        });
    }
    if entry.value().is_some_and(|value| value.trim().is_empty()) {
        return Err(StoreError::MalformedRecord {
            line: line_no,
            reason: "blank value".to_string(),
        });
    }
    if entry.ttl() <= 0 {
        return Err(StoreError::MalformedRecord {
            line: line_no,
            reason: format!("non-positive TTL {}", entry.ttl()),
        });
    }
    Ok(entry)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DEFAULT_TTL;

    fn temp_snapshot(name: &str) -> SnapshotCodec {
        let path = std::env::temp_dir().join(format!(
            "ttl_kv_{}_{}.txt",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        SnapshotCodec::new(path)
    }

    #[test]
    fn test_dump_format() {
        let codec = temp_snapshot("format");
        let store = KeyValueStore::default();
        store.set("b", "2", Some(7)).unwrap();
        store.set("a", "1", None).unwrap();

        let text = codec.dump(&store).unwrap();
        let expected = format!(
            "{{\"Key\":\"a\",\"Value\":\"1\",\"TTl\":{}}}\r\n{{\"Key\":\"b\",\"Value\":\"2\",\"TTl\":7}}\r\n",
            DEFAULT_TTL
        );
        assert_eq!(text, expected);
        assert_eq!(fs::read_to_string(codec.path()).unwrap(), expected);
        assert!(!codec.staging_path().exists());

        let _ = fs::remove_file(codec.path());
    }

    #[test]
    fn test_dump_empty_store() {
        let codec = temp_snapshot("empty");
        let store = KeyValueStore::default();

        assert_eq!(codec.dump(&store).unwrap(), "");
        assert_eq!(fs::read_to_string(codec.path()).unwrap(), "");

        let _ = fs::remove_file(codec.path());
    }

    #[test]
    fn test_dump_overwrites_previous_snapshot() {
        let codec = temp_snapshot("overwrite");
        let store = KeyValueStore::default();
        store.set("old", "value", None).unwrap();
        codec.dump(&store).unwrap();

        store.remove("old");
        store.sweep(DEFAULT_TTL);
        store.set("new", "value", None).unwrap();
        codec.dump(&store).unwrap();

        let text = fs::read_to_string(codec.path()).unwrap();
        assert!(text.contains("\"new\""));
        assert!(!text.contains("\"old\""));

        let _ = fs::remove_file(codec.path());
    }

    #[test]
    fn test_round_trip_preserves_ttl() {
        let codec = temp_snapshot("roundtrip");
        let store = KeyValueStore::default();
        store.set("a", "1", Some(100)).unwrap();
        store.set("b", "2", None).unwrap();
        store.set("c", "3", None).unwrap();
        store.remove("c");
        store.sweep(10);
        let before = store.list();

        codec.dump(&store).unwrap();
        store.set("d", "4", None).unwrap();

        let restored = KeyValueStore::default();
        assert_eq!(codec.load(&restored).unwrap(), 3);
        assert_eq!(restored.list(), before);
        assert_eq!(codec.load(&store).unwrap(), 3);
        assert_eq!(store.list(), before);
        assert_eq!(store.get("d"), None);

        let _ = fs::remove_file(codec.path());
    }

    #[test]
    fn test_load_missing_file_clears_and_fails() {
        let codec = temp_snapshot("missing");
        let store = KeyValueStore::default();
        store.set("key", "value", None).unwrap();

        let result = codec.load(&store);
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_malformed_line_is_partial() {
        let codec = temp_snapshot("malformed");
        fs::write(
            codec.path(),
            "{\"Key\":\"a\",\"Value\":\"1\",\"TTl\":5}\r\nnot json\r\n{\"Key\":\"b\",\"Value\":\"2\",\"TTl\":5}\r\n",
        )
        .unwrap();
        let store = KeyValueStore::default();

        let result = codec.load(&store);
        assert!(matches!(result, Err(StoreError::Serialization(_))));
        assert_eq!(store.get("a"), Some("1".to_string()));
        assert_eq!(store.get("b"), None);

        let _ = fs::remove_file(codec.path());
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let codec = temp_snapshot("blank");
        fs::write(
            codec.path(),
            "{\"Key\":\"a\",\"Value\":\"1\",\"TTl\":5}\r\n\r\n{\"Key\":\"b\",\"Value\":null,\"TTl\":9}\n",
        )
        .unwrap();
        let store = KeyValueStore::default();

        assert_eq!(codec.load(&store).unwrap(), 2);
        assert_eq!(store.get("b"), None);
        assert_eq!(store.len(), 2);

        let _ = fs::remove_file(codec.path());
    }

    #[test]
    fn test_decode_rejects_invalid_records() {
        let blank = decode_line(r#"{"Key":"  ","Value":"v","TTl":5}"#, 3);
        assert!(matches!(blank, Err(StoreError::MalformedRecord { line: 3, .. })));

        let expired = decode_line(r#"{"Key":"k","Value":"v","TTl":0}"#, 1);
        assert!(matches!(expired, Err(StoreError::MalformedRecord { line: 1, .. })));

        let empty_value = decode_line(r#"{"Key":"k","Value":"","TTl":5}"#, 2);
        assert!(matches!(empty_value, Err(StoreError::MalformedRecord { line: 2, .. })));

        let blank_value = decode_line(r#"{"Key":"k","Value":"   ","TTl":5}"#, 4);
        assert!(matches!(blank_value, Err(StoreError::MalformedRecord { line: 4, .. })));

        let cleared = decode_line(r#"{"Key":"k","Value":null,"TTl":5}"#, 5).unwrap();
        assert!(cleared.is_cleared());

        let missing_field = decode_line(r#"{"Key":"k","Value":"v"}"#, 1);
        assert!(matches!(missing_field, Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_load_rejects_blank_value() {
        let codec = temp_snapshot("blank_value");
        fs::write(codec.path(), "{\"Key\":\"k\",\"Value\":\"   \",\"TTl\":5}\r\n").unwrap();
        let store = KeyValueStore::default();

        let result = codec.load(&store);
        assert!(matches!(result, Err(StoreError::MalformedRecord { line: 1, .. })));
        assert_eq!(store.get("k"), None);
        assert!(store.is_empty());

        let _ = fs::remove_file(codec.path());
    }

    #[test]
    fn test_dump_into_missing_directory_fails() {
        let dir = std::env::temp_dir().join(format!("ttl_kv_no_such_dir_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let codec = SnapshotCodec::new(dir.join("dump.txt"));
        let store = KeyValueStore::default();
        store.set("key", "value", None).unwrap();

        let result = codec.dump(&store);
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(result.unwrap_err().is_processing_error());
        assert!(!codec.path().exists());
        assert!(!codec.staging_path().exists());
    }

    #[test]
    fn test_concurrent_dumps_leave_loadable_snapshot() {
        let codec = temp_snapshot("concurrent");
        let store = KeyValueStore::default();
        for i in 0..500 {
            store.set(format!("seed-{}", i), "value", None).unwrap();
        }

        for round in 0..10 {
            std::thread::scope(|scope| {
                for t in 0..8 {
                    let (codec, store) = (&codec, &store);
                    scope.spawn(move || {
                        if t % 2 == 0 {
                            store
                                .set(format!("r{}-t{}", round, t), "value", None)
                                .unwrap();
                        }
                        codec.dump(store).unwrap();
                    });
                }
            });

            let restored = KeyValueStore::default();
            let loaded = codec.load(&restored).unwrap();
            assert!(loaded >= 500);
            assert!(!codec.staging_path().exists());
        }

        // Last dump reflects every write made before it
        codec.dump(&store).unwrap();
        let restored = KeyValueStore::default();
        assert_eq!(codec.load(&restored).unwrap(), store.len());
        assert_eq!(restored.list(), store.list());

        let _ = fs::remove_file(codec.path());
    }

    #[test]
    fn test_encode_line_has_no_separator() {
        let line = encode_line(&Entry::new("k", "v", 1)).unwrap();
        assert!(!line.contains('\n'));
        assert_eq!(decode_line(&line, 1).unwrap(), Entry::new("k", "v", 1));
    }
}
