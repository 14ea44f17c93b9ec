//! Chart image export.
//!
//! Rasterization is delegated to a [`ChartRenderer`]; this module only
//! derives the element id and the file name, then writes the PNG once.

use std::path::{Path, PathBuf};

use crate::AnalysisError;

/// A chart could not be rasterized.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// No chart element with this id is available to the renderer.
    #[error("No chart element with id '{0}'")]
    UnknownElement(String),

    /// The renderer failed.
    #[error("Render failed: {0}")]
    Render(String),
}

/// Rasterizes the chart element with the given id into PNG bytes.
pub trait ChartRenderer {
    /// # Errors
    ///
    /// Returns [`ExportError`] if the element is unknown or cannot be
    /// rendered.
    fn render_png(&self, element_id: &str) -> Result<Vec<u8>, ExportError>;
}

/// Element id of a question's chart: the title without spaces, lowercased.
#[must_use]
pub fn chart_element_id(title: &str) -> String {
    title.replace(' ', "").to_lowercase()
}

/// File name of a question's exported chart.
///
/// Starts from the element id and replaces characters that are not
/// allowed in file names (path separators included) with `_`. Leading
/// dots are replaced too, so the file always lands inside the target
/// directory and is never hidden.
#[must_use]
pub fn chart_file_name(title: &str) -> String {
    let element_id = chart_element_id(title);
    let mut leading = true;
    let stem: String = element_id
        .chars()
        .map(|c| {
            let replace = matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
                || c.is_control()
                || (leading && c == '.');
            leading &= c == '.';
            if replace { '_' } else { c }
        })
        .collect();

    if stem.is_empty() {
        "chart.png".to_string()
    } else {
        format!("{stem}.png")
    }
}

/// Renders the chart for `title` and writes it into `dir` under
/// [`chart_file_name`].
///
/// Runs exactly once; a failed render or write is reported, not retried.
///
/// # Errors
///
/// Returns [`AnalysisError::Export`] if rendering fails or
/// [`AnalysisError::Io`] if the file cannot be written.
pub fn save_chart_image<R: ChartRenderer + ?Sized>(
    renderer: &R,
    title: &str,
    dir: &Path,
) -> Result<PathBuf, AnalysisError> {
    let element_id = chart_element_id(title);
    let png = renderer.render_png(&element_id)?;
    let path = dir.join(chart_file_name(title));
    std::fs::write(&path, png)?;
    log::info!("Saved chart '{title}' to {}", path.display());
    Ok(path)
}
