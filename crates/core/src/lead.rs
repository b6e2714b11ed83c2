//! Lead normalization and scoring.
//!
//! A lead is a place with each field resolved from the detail lookup first and
//! the search result second. The score is an additive heuristic used only to
//! rank leads within one run; its scale is deliberately left unnormalized.

use serde::{Deserialize, Serialize};

use crate::place::{PlaceDetail, RawPlace, non_blank};

/// A place with every field resolved to a value or `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    pub place_id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
}

/// A normalized record with its lead score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: NormalizedRecord,
    pub score: f64,
}

/// Merge a search result with its optional detail record.
///
/// Fields resolve independently: a lead may carry a detail-sourced phone next
/// to a search-sourced rating.
pub fn normalize(raw: &RawPlace, detail: Option<&PlaceDetail>) -> NormalizedRecord {
    let name = detail
        .and_then(|d| non_blank(d.name()))
        .or_else(|| non_blank(raw.name()))
        .map(str::to_string);
    let address = detail
        .and_then(|d| non_blank(d.formatted_address.as_deref()))
        .or_else(|| non_blank(raw.formatted_address.as_deref()))
        .map(str::to_string);

    NormalizedRecord {
        place_id: raw.id.clone(),
        name,
        address,
        phone: detail.and_then(PlaceDetail::phone).map(str::to_string),
        website: detail.and_then(PlaceDetail::website).map(str::to_string),
        rating: detail.and_then(|d| d.rating).or(raw.rating),
        user_ratings_total: detail.and_then(|d| d.user_rating_count).or(raw.user_rating_count),
    }
}

/// Lead score:
///
/// - +2 for a website
/// - +1 for a phone number
/// - + the rating value
/// - +2 for more than 100 ratings, +1 for more than 50
pub fn score(record: &NormalizedRecord) -> f64 {
    let mut total = 0.0;
    if record.website.is_some() {
        total += 2.0;
    }
    if record.phone.is_some() {
        total += 1.0;
    }
    if let Some(rating) = record.rating.filter(|r| r.is_finite()) {
        total += rating;
    }
    total += match record.user_ratings_total {
        Some(n) if n > 100 => 2.0,
        Some(n) if n > 50 => 1.0,
        _ => 0.0,
    };
    total
}

/// Attach the score to a record.
pub fn scored(record: NormalizedRecord) -> ScoredRecord {
    let score = score(&record);
    ScoredRecord { record, score }
}

/// Sort leads by descending score. Ties keep their input order.
pub fn rank(leads: &mut [ScoredRecord]) {
    leads.sort_by(|a, b| b.score.total_cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place::LocalizedText;

    fn raw(id: &str) -> RawPlace {
        RawPlace {
            id: id.into(),
            display_name: Some(LocalizedText::new("Search Name")),
            formatted_address: Some("1 Search Rd".into()),
            rating: Some(4.0),
            user_rating_count: Some(40),
        }
    }

    fn detail(id: &str) -> PlaceDetail {
        PlaceDetail {
            id: id.into(),
            display_name: None,
            formatted_address: None,
            international_phone_number: None,
            national_phone_number: None,
            website_uri: None,
            rating: None,
            user_rating_count: None,
        }
    }

    fn record() -> NormalizedRecord {
        NormalizedRecord { place_id: "p".into(), ..Default::default() }
    }

    #[test]
    fn test_normalize_prefers_detail_rating() {
        let d = PlaceDetail { rating: Some(4.2), ..detail("a") };
        let rec = normalize(&raw("a"), Some(&d));
        assert_eq!(rec.rating, Some(4.2));
    }

    #[test]
    fn test_normalize_without_detail_uses_search_fields() {
        let rec = normalize(&raw("a"), None);
        assert_eq!(rec.place_id, "a");
        assert_eq!(rec.name.as_deref(), Some("Search Name"));
        assert_eq!(rec.address.as_deref(), Some("1 Search Rd"));
        assert_eq!(rec.rating, Some(4.0));
        assert_eq!(rec.user_ratings_total, Some(40));
        assert!(rec.phone.is_none());
        assert!(rec.website.is_none());
    }

    #[test]
    fn test_normalize_resolves_fields_independently() {
        let d = PlaceDetail {
            international_phone_number: Some("+1 555-1212".into()),
            user_rating_count: Some(300),
            ..detail("a")
        };
        let rec = normalize(&raw("a"), Some(&d));
        assert_eq!(rec.phone.as_deref(), Some("+1 555-1212"));
        assert_eq!(rec.rating, Some(4.0));
        assert_eq!(rec.user_ratings_total, Some(300));
        assert_eq!(rec.name.as_deref(), Some("Search Name"));
    }

    #[test]
    fn test_normalize_blank_detail_values_fall_through() {
        let d = PlaceDetail {
            display_name: Some(LocalizedText::new("  ")),
            formatted_address: Some(String::new()),
            website_uri: Some(String::new()),
            ..detail("a")
        };
        let rec = normalize(&raw("a"), Some(&d));
        assert_eq!(rec.name.as_deref(), Some("Search Name"));
        assert_eq!(rec.address.as_deref(), Some("1 Search Rd"));
        assert!(rec.website.is_none());
    }

    #[test]
    fn test_score_example() {
        let rec = NormalizedRecord {
            phone: Some("+1 555-1212".into()),
            rating: Some(4.5),
            user_ratings_total: Some(120),
            ..record()
        };
        assert_eq!(score(&rec), 7.5);
    }

    #[test]
    fn test_score_empty_record_is_zero() {
        assert_eq!(score(&record()), 0.0);
    }

    #[test]
    fn test_score_count_tiers() {
        let with = |n| score(&NormalizedRecord { user_ratings_total: Some(n), ..record() });
        assert_eq!(with(50), 0.0);
        assert_eq!(with(51), 1.0);
        assert_eq!(with(100), 1.0);
        assert_eq!(with(101), 2.0);
    }

    #[test]
    fn test_score_monotonic_in_each_factor() {
        let base = NormalizedRecord { rating: Some(3.0), user_ratings_total: Some(40), ..record() };
        let s = score(&base);

        assert!(score(&NormalizedRecord { website: Some("https://x.test".into()), ..base.clone() }) >= s);
        assert!(score(&NormalizedRecord { phone: Some("555".into()), ..base.clone() }) >= s);
        assert!(score(&NormalizedRecord { rating: Some(3.5), ..base.clone() }) >= s);
        assert!(score(&NormalizedRecord { user_ratings_total: Some(60), ..base.clone() }) >= s);
    }

    #[test]
    fn test_score_is_deterministic() {
        let rec = NormalizedRecord { website: Some("w".into()), rating: Some(4.9), ..record() };
        assert_eq!(score(&rec), score(&rec));
        assert_eq!(score(&rec), 6.9);
    }

    #[test]
    fn test_rank_sorts_descending_and_keeps_ties_stable() {
        let mut leads = vec![
            scored(NormalizedRecord { place_id: "low".into(), ..Default::default() }),
            scored(NormalizedRecord { place_id: "tie-a".into(), rating: Some(3.0), ..Default::default() }),
            scored(NormalizedRecord { place_id: "high".into(), rating: Some(5.0), ..Default::default() }),
            scored(NormalizedRecord { place_id: "tie-b".into(), rating: Some(3.0), ..Default::default() }),
        ];
        rank(&mut leads);
        let ids: Vec<_> = leads.iter().map(|l| l.record.place_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "tie-a", "tie-b", "low"]);
    }

    #[test]
    fn test_scored_record_serializes_flat() {
        let lead = scored(NormalizedRecord { place_id: "p1".into(), rating: Some(4.0), ..Default::default() });
        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["placeId"], "p1");
        assert_eq!(json["score"], 4.0);
    }
}
