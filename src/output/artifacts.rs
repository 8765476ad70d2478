use crate::documents::make_safe_filename;
use crate::ScraperError;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Name of the merged artifact in the results directory
pub const COMBINED_FILE_NAME: &str = "combined_results.json";

/// Suffix of the website workflow artifact
pub const WEBSITE_ARTIFACT_SUFFIX: &str = "scraped_data";

/// Suffix of the filing workflow artifact
pub const FILING_ARTIFACT_SUFFIX: &str = "sustainability_data";

/// Builds `<Company_Name>_<suffix>.json`
///
/// Spaces in the company name become `_` and the name is made filesystem-safe,
/// so the artifact always lands directly in the results directory.
pub fn artifact_file_name(company: &str, suffix: &str) -> String {
    format!(
        "{}_{}.json",
        make_safe_filename(&company.trim().replace(' ', "_")),
        suffix
    )
}

/// Writes a value as pretty-printed JSON into `dir/name`
///
/// The directory is created if it does not exist.
pub async fn write_artifact<T: Serialize + ?Sized>(
    dir: &Path,
    name: &str,
    value: &T,
) -> Result<PathBuf, ScraperError> {
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(value).map_err(|source| ScraperError::Json {
        path: path.display().to_string(),
        source,
    })?;

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, json).await?;

    tracing::debug!("Wrote artifact {}", path.display());
    Ok(path)
}

/// Reads a JSON artifact
///
/// Blocking; async callers go through [`write_combined`](crate::output::write_combined),
/// which runs the merge on the blocking pool.
pub fn read_artifact(path: &Path) -> Result<Value, ScraperError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| ScraperError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Removes a directory with everything in it and recreates it empty
pub async fn reset_directory(dir: &Path) -> Result<(), ScraperError> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => tracing::info!("Cleared directory {}", dir.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_artifact_file_name() {
        assert_eq!(
            artifact_file_name("Acme Green Corp", WEBSITE_ARTIFACT_SUFFIX),
            "Acme_Green_Corp_scraped_data.json"
        );
        assert_eq!(
            artifact_file_name("Acme", FILING_ARTIFACT_SUFFIX),
            "Acme_sustainability_data.json"
        );
    }

    #[tokio::test]
    async fn test_artifact_file_name_stays_in_results_dir() {
        let name = artifact_file_name("Acme/Green: Corp", WEBSITE_ARTIFACT_SUFFIX);
        assert_eq!(name, "Acme_Green__Corp_scraped_data.json");

        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(dir.path(), &name, &json!({})).await.unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("results");

        let path = write_artifact(&nested, "a.json", &json!({"about": {"k": 1}}))
            .await
            .unwrap();
        assert!(path.exists());
        assert_eq!(read_artifact(&path).unwrap(), json!({"about": {"k": 1}}));
    }

    #[test]
    fn test_read_malformed_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{").unwrap();

        assert!(matches!(
            read_artifact(&path),
            Err(ScraperError::Json { .. })
        ));
    }

    #[tokio::test]
    async fn test_reset_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("downloaded_pdfs");
        std::fs::create_dir_all(target.join("sub")).unwrap();
        std::fs::write(target.join("old.pdf"), b"old").unwrap();

        reset_directory(&target).await.unwrap();
        assert!(target.is_dir());
        assert_eq!(std::fs::read_dir(&target).unwrap().count(), 0);

        let missing = dir.path().join("json_files");
        reset_directory(&missing).await.unwrap();
        assert!(missing.is_dir());
    }
}
