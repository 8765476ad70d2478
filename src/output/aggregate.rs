use crate::output::{read_artifact, write_artifact, COMBINED_FILE_NAME};
use crate::ScraperError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Merged top-level keys of every artifact produced for one run
pub type AggregatedResult = Map<String, Value>;

/// Merges the top-level keys of the given artifact files, in order
///
/// A key present in several files takes the value from the last of them; this
/// is a shallow merge, nested objects are not combined. Files that cannot be
/// read, are not valid JSON, or do not hold a JSON object are skipped with a
/// warning.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use sustain_scraper::output::combine;
///
/// let combined = combine(&[
///     PathBuf::from("json_files/Acme_scraped_data.json"),
///     PathBuf::from("json_files/Acme_sustainability_data.json"),
/// ]);
/// println!("{} top-level keys", combined.len());
/// ```
pub fn combine(result_files: &[PathBuf]) -> AggregatedResult {
    let mut combined = AggregatedResult::new();

    for path in result_files {
        match read_artifact(path) {
            Ok(Value::Object(entries)) => {
                tracing::debug!("Merging {} keys from {}", entries.len(), path.display());
                for (key, value) in entries {
                    if combined.insert(key.clone(), value).is_some() {
                        tracing::debug!("Key '{}' overwritten by {}", key, path.display());
                    }
                }
            }
            Ok(_) => {
                tracing::warn!(
                    "Skipping {}: top-level value is not a JSON object",
                    path.display()
                );
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
            }
        }
    }

    combined
}

/// Lists the artifact files of a results directory in merge order
///
/// Every `*.json` file except the combined output itself, sorted by file name.
pub fn artifact_files(results_dir: &Path) -> Result<Vec<PathBuf>, ScraperError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(results_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter(|path| path.file_name().is_some_and(|name| name != COMBINED_FILE_NAME))
        .collect();
    files.sort();
    Ok(files)
}

/// Combines every artifact in a results directory
pub fn combine_directory(results_dir: &Path) -> Result<AggregatedResult, ScraperError> {
    let files = artifact_files(results_dir)?;
    tracing::info!(
        "Combining {} artifact files from {}",
        files.len(),
        results_dir.display()
    );
    Ok(combine(&files))
}

/// Combines a results directory and writes `combined_results.json` into it
///
/// Reading and merging the artifacts runs on the blocking pool.
///
/// # Returns
///
/// The path of the combined artifact
pub async fn write_combined(results_dir: &Path) -> Result<PathBuf, ScraperError> {
    let dir = results_dir.to_path_buf();
    let combined = tokio::task::spawn_blocking(move || combine_directory(&dir))
        .await
        .map_err(std::io::Error::from)??;
    let path = write_artifact(results_dir, COMBINED_FILE_NAME, &combined).await?;
    tracing::info!("Combined JSON data saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_last_writer_wins_and_keeps_unique_keys() {
        let dir = tempfile::tempdir().unwrap();
        let first = write(
            dir.path(),
            "a.json",
            r#"{"Acme Corp": {"source": "website"}, "about": {"x": 1}}"#,
        );
        let second = write(
            dir.path(),
            "b.json",
            r#"{"Acme Corp": {"source": "filing"}, "reports": {}}"#,
        );

        let combined = combine(&[first.clone(), second.clone()]);
        assert_eq!(combined["Acme Corp"], json!({"source": "filing"}));
        assert_eq!(combined["about"], json!({"x": 1}));
        assert_eq!(combined["reports"], json!({}));
        assert_eq!(combined.len(), 3);

        let reversed = combine(&[second, first]);
        assert_eq!(reversed["Acme Corp"], json!({"source": "website"}));
    }

    #[test]
    fn test_merge_is_shallow() {
        let dir = tempfile::tempdir().unwrap();
        let first = write(dir.path(), "a.json", r#"{"Acme": {"a": 1, "b": 2}}"#);
        let second = write(dir.path(), "b.json", r#"{"Acme": {"c": 3}}"#);

        let combined = combine(&[first, second]);
        assert_eq!(combined["Acme"], json!({"c": 3}));
    }

    #[test]
    fn test_malformed_and_missing_files_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.json", r#"{"about": {}}"#);
        let broken = write(dir.path(), "broken.json", "{ not json");
        let array = write(dir.path(), "array.json", "[1, 2, 3]");
        let missing = dir.path().join("missing.json");

        let combined = combine(&[broken, good, array, missing]);
        assert_eq!(combined.len(), 1);
        assert!(combined.contains_key("about"));
    }

    #[test]
    fn test_artifact_files_excludes_combined_and_non_json() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.json", "{}");
        write(dir.path(), "a.json", "{}");
        write(dir.path(), COMBINED_FILE_NAME, "{}");
        write(dir.path(), "notes.txt", "hello");

        let files = artifact_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[tokio::test]
    async fn test_write_combined() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Acme_scraped_data.json", r#"{"about": {"k": "v"}}"#);
        write(dir.path(), "Acme_sustainability_data.json", r#"{"Acme": {}}"#);

        let path = write_combined(dir.path()).await.unwrap();
        assert_eq!(path.file_name().unwrap(), COMBINED_FILE_NAME);

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!({"about": {"k": "v"}, "Acme": {}}));
    }
}
