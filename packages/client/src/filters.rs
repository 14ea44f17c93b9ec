//! Saved filter combination presets of the logged in user.

use hackathon_survey_filters_models::FilterCombination;

use crate::{ClientError, HttpClient, retry};

const FILTERS_PATH: &str = "/filters";

impl HttpClient {
    /// Saves a filter combination as a preset. Not retried.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the preset cannot be saved.
    pub async fn save_filter(&self, filter: &FilterCombination) -> Result<(), ClientError> {
        log::info!("Saving filter preset '{}'", filter.name);
        retry::send(FILTERS_PATH, 0, || {
            self.request(reqwest::Method::POST, FILTERS_PATH).json(filter)
        })
        .await?;
        Ok(())
    }

    /// Lists the presets of the logged in user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the presets cannot be loaded.
    pub async fn list_filters(&self) -> Result<Vec<FilterCombination>, ClientError> {
        retry::send_json(FILTERS_PATH, self.config.max_retries, || {
            self.request(reqwest::Method::GET, FILTERS_PATH)
        })
        .await
    }

    /// Deletes a preset by id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidFilterId`] for an empty or dot-only
    /// id, or [`ClientError`] if the preset cannot be deleted.
    pub async fn delete_filter(&self, id: &str) -> Result<(), ClientError> {
        let path = filter_path(id)?;
        log::info!("Deleting filter preset {id}");
        retry::send(&path, self.config.max_retries, || {
            self.request(reqwest::Method::DELETE, &path)
        })
        .await?;
        Ok(())
    }
}

fn filter_path(id: &str) -> Result<String, ClientError> {
    // Dot segments are normalized away by URL parsing even when encoded.
    if id.chars().all(|c| c == '.') {
        return Err(ClientError::InvalidFilterId { id: id.to_string() });
    }
    Ok(format!("{FILTERS_PATH}/{}", encode_segment(id)))
}

/// Percent-encodes everything except unreserved characters.
fn encode_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_path_includes_id() {
        assert_eq!(filter_path("64f0c").unwrap(), "/filters/64f0c");
    }

    #[test]
    fn preset_path_encodes_reserved_characters() {
        assert_eq!(filter_path("a/b c").unwrap(), "/filters/a%2Fb%20c");
        assert_eq!(filter_path("x?y#z").unwrap(), "/filters/x%3Fy%23z");
        assert_eq!(filter_path("v1.2_a-b~").unwrap(), "/filters/v1.2_a-b~");
        assert_eq!(filter_path("ü").unwrap(), "/filters/%C3%BC");
    }

    #[test]
    fn rejects_ids_that_leave_the_collection() {
        for id in ["", ".", ".."] {
            assert!(matches!(
                filter_path(id),
                Err(ClientError::InvalidFilterId { .. })
            ));
        }
        assert_eq!(filter_path("../x").unwrap(), "/filters/..%2Fx");
    }
}
