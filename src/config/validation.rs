use crate::config::types::{Config, CrawlerConfig, OutputConfig, Section};
use crate::ConfigError;
use std::collections::HashSet;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_exclusion_keywords(&config.exclusion_keywords)?;
    validate_sections(&config.sections)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.probe_concurrency < 1 || config.probe_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "probe_concurrency must be between 1 and 100, got {}",
            config.probe_concurrency
        )));
    }

    if config.page_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "page_timeout_secs must be >= 1, got {}",
            config.page_timeout_secs
        )));
    }

    if config.probe_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "probe_timeout_secs must be >= 1, got {}",
            config.probe_timeout_secs
        )));
    }

    // Documents can be large
    if config.document_timeout_secs < 30 {
        return Err(ConfigError::Validation(format!(
            "document_timeout_secs must be >= 30, got {}",
            config.document_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.documents_dir.is_empty() {
        return Err(ConfigError::Validation(
            "documents_dir cannot be empty".to_string(),
        ));
    }

    if config.results_dir.is_empty() {
        return Err(ConfigError::Validation(
            "results_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_exclusion_keywords(keywords: &[String]) -> Result<(), ConfigError> {
    if keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "exclusion keywords cannot be empty strings".to_string(),
        ));
    }
    Ok(())
}

/// Validates section entries
fn validate_sections(sections: &[Section]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for section in sections {
        if section.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "section name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(section.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "section '{}' is defined more than once",
                section.name
            )));
        }

        if section.keywords.is_empty() {
            return Err(ConfigError::Validation(format!(
                "section '{}' must have at least one keyword",
                section.name
            )));
        }

        if section.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "section '{}' contains an empty keyword",
                section.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_probe_concurrency_bounds() {
        let mut config = Config::default();
        config.crawler.probe_concurrency = 0;
        assert!(validate(&config).is_err());

        config.crawler.probe_concurrency = 101;
        assert!(validate(&config).is_err());

        config.crawler.probe_concurrency = 100;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_document_timeout_must_be_generous() {
        let mut config = Config::default();
        config.crawler.document_timeout_secs = 10;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_duplicate_section_names() {
        let mut config = Config::default();
        config.sections.push(Section::new("about", &["who we are"], 1));
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_section_without_keywords() {
        let mut config = Config::default();
        config.sections = vec![Section::new("empty", &[], 1)];
        assert!(validate(&config).is_err());

        config.sections = vec![Section::new("blank", &["  "], 1)];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_output_dirs() {
        let mut config = Config::default();
        config.output.results_dir = String::new();
        assert!(validate(&config).is_err());
    }
}
