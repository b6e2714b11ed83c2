//! Places API request types and validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::PlacesError;

/// Fields requested from text search.
pub const SEARCH_FIELD_MASK: &str =
    "places.id,places.displayName,places.formattedAddress,places.rating,places.userRatingCount,nextPageToken";

/// Fields requested from place details.
pub const DETAIL_FIELD_MASK: &str = "id,displayName,formattedAddress,internationalPhoneNumber,nationalPhoneNumber,websiteUri,rating,userRatingCount";

static PLACE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("place id pattern is valid"));

/// Text search request body.
///
/// Based on the `places:searchText` endpoint of the Places API (New).
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchTextRequest {
    /// Free-text query, `"{category} in {city}"`.
    pub text_query: String,

    /// Token from the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

impl SearchTextRequest {
    pub fn for_query(city: &str, category: &str) -> Self {
        Self { text_query: format!("{} in {}", category.trim(), city.trim()), page_token: None }
    }

    pub fn with_page_token(mut self, token: Option<&str>) -> Self {
        self.page_token = token.map(str::to_string);
        self
    }

    /// Validate the search request parameters.
    pub fn validate(&self) -> Result<(), PlacesError> {
        if self.text_query.trim().is_empty() {
            return Err(PlacesError::InvalidQuery("query cannot be empty".to_string()));
        }

        if self.text_query.len() > 400 {
            return Err(PlacesError::InvalidQuery(format!(
                "query too long: {} chars (max 400)",
                self.text_query.len()
            )));
        }

        if let Some(token) = &self.page_token
            && token.is_empty()
        {
            return Err(PlacesError::InvalidQuery("page token cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Reject place ids that are not safe to splice into a URL path.
pub fn validate_place_id(place_id: &str) -> Result<(), PlacesError> {
    if PLACE_ID_PATTERN.is_match(place_id) { Ok(()) } else { Err(PlacesError::InvalidPlaceId(place_id.to_string())) }
}
