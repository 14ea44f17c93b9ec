//! Section manifest: which questions appear, in which order, under which
//! heading.
//!
//! The default manifest is baked into the binary from
//! `manifest/sections.toml` via [`include_str!`].

use std::path::Path;

use hackathon_survey_analysis_models::SectionManifest;

use crate::AnalysisError;

const SECTIONS_TOML: &str = include_str!("../manifest/sections.toml");

/// Parses a manifest from TOML text.
///
/// # Errors
///
/// Returns [`AnalysisError::Manifest`] if the text is not a valid manifest.
pub fn parse_manifest(toml_str: &str) -> Result<SectionManifest, AnalysisError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// The compiled-in manifest.
///
/// # Errors
///
/// Returns [`AnalysisError::Manifest`] if the embedded TOML is malformed.
pub fn default_manifest() -> Result<SectionManifest, AnalysisError> {
    parse_manifest(SECTIONS_TOML)
}

/// Loads a manifest with the same schema from disk.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if the file cannot be read or
/// [`AnalysisError::Manifest`] if it cannot be parsed.
pub fn load_manifest(path: &Path) -> Result<SectionManifest, AnalysisError> {
    let text = std::fs::read_to_string(path)?;
    let manifest = parse_manifest(&text)?;
    log::info!(
        "Loaded manifest {} with {} sections",
        path.display(),
        manifest.sections.len()
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn embedded_manifest_parses() {
        let manifest = default_manifest().unwrap();

        assert_eq!(manifest.sections.len(), 9);
        assert_eq!(manifest.sections[0].section_title, "Individual measures");
        assert_eq!(
            manifest.sections[8].section_title,
            "Demographics and individual background"
        );
        assert_eq!(manifest.sections[1].questions.len(), 5);
    }

    #[test]
    fn embedded_question_titles_are_unique() {
        let manifest = default_manifest().unwrap();
        let titles: Vec<&String> = manifest
            .sections
            .iter()
            .flat_map(|s| &s.questions)
            .collect();
        let unique: HashSet<&String> = titles.iter().copied().collect();

        assert_eq!(titles.len(), unique.len());
        assert_eq!(titles.len(), 26);
    }

    #[test]
    fn rejects_manifest_without_questions() {
        let result = parse_manifest("[[sections]]\nsection_title = \"Only a title\"\n");
        assert!(matches!(result, Err(AnalysisError::Manifest(_))));
    }
}
