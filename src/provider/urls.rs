//! URL building utilities for upstream API endpoints

/// Builds the URL for listing all available leagues.
///
/// # Arguments
/// * `api_base_url` - The base URL of the upstream API
///
/// # Returns
/// * `String` - The complete leagues URL
///
/// # Example
/// ```
/// use sports_proxy::provider::urls::build_leagues_url;
///
/// let url = build_leagues_url("https://api.openligadb.de");
/// assert_eq!(url, "https://api.openligadb.de/getavailableleagues");
/// ```
pub fn build_leagues_url(api_base_url: &str) -> String {
    format!("{}/getavailableleagues", api_base_url.trim_end_matches('/'))
}

/// Builds the URL for fetching the match data of a specific league.
///
/// # Arguments
/// * `api_base_url` - The base URL of the upstream API
/// * `league_id` - The league shortcut identifier (e.g. "bl1")
///
/// # Returns
/// * `String` - The complete match data URL
///
/// # Example
/// ```
/// use sports_proxy::provider::urls::build_match_data_url;
///
/// let url = build_match_data_url("https://api.openligadb.de", "bl1");
/// assert_eq!(url, "https://api.openligadb.de/getmatchdata/bl1");
/// ```
pub fn build_match_data_url(api_base_url: &str, league_id: &str) -> String {
    format!(
        "{}/getmatchdata/{league_id}",
        api_base_url.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_normalized() {
        assert_eq!(
            build_leagues_url("https://api.openligadb.de/"),
            "https://api.openligadb.de/getavailableleagues"
        );
        assert_eq!(
            build_match_data_url("https://api.openligadb.de/", "pl"),
            "https://api.openligadb.de/getmatchdata/pl"
        );
    }
}
