//! Read-only endpoints behind the marketing site. Database failures go through
//! the configured [`FallbackPolicy`](crate::services::fallback::FallbackPolicy).

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::database::entities::{media, navigation_items, news, pages};
use crate::errors::{CmsResult, ValidationErrors};
use crate::server::app::AppState;
use crate::services::apartment_service::{ApartmentDetail, ApartmentWithMedia};
use crate::services::content_service::PageContentMap;
use crate::services::fallback::{
    static_apartment_detail, static_apartments, static_navigation, static_pricing,
};
use crate::services::news_service::{NewsPage, PageRequest};
use crate::services::pricing_service::{PricingOverview, StayPrice};
use crate::services::validation::parse_iso_date;

pub async fn list_apartments(
    State(state): State<AppState>,
) -> CmsResult<Json<Vec<ApartmentWithMedia>>> {
    let result = state.apartments().list_public().await;
    state
        .fallback
        .resolve("apartments", result, || Some(static_apartments()))
        .map(Json)
}

pub async fn get_apartment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> CmsResult<Json<ApartmentDetail>> {
    let result = state.apartments().get_by_slug(&slug).await;
    state
        .fallback
        .resolve("apartment", result, || static_apartment_detail(&slug))
        .map(Json)
}

pub async fn get_page_content(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> CmsResult<Json<PageContentMap>> {
    let result = state.content().page(&page).await;
    state
        .fallback
        .resolve("content", result, || Some(PageContentMap::new()))
        .map(Json)
}

pub async fn get_pricing(State(state): State<AppState>) -> CmsResult<Json<PricingOverview>> {
    let result = state.pricing().overview().await;
    state
        .fallback
        .resolve("pricing", result, || Some(static_pricing()))
        .map(Json)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    pub apartment_id: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub extra_beds: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub apartment_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub extra_beds: u32,
}

impl QuoteQuery {
    pub fn parse(&self) -> Result<Quote, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let apartment_id = match self.apartment_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<i32>().ok().or_else(|| {
                errors.add("apartmentId", "apartmentId must be a number");
                None
            }),
            _ => {
                errors.add("apartmentId", "apartmentId is required");
                None
            }
        };

        let mut date = |field: &str, raw: Option<&str>| match raw {
            Some(raw) => parse_iso_date(raw.trim()).or_else(|| {
                errors.add(field, "Date must be in YYYY-MM-DD format");
                None
            }),
            None => {
                errors.add(field, format!("{} is required", field));
                None
            }
        };
        let check_in = date("checkIn", self.check_in.as_deref());
        let check_out = date("checkOut", self.check_out.as_deref());

        let extra_beds = match self.extra_beds.as_deref().map(str::trim) {
            None | Some("") => Some(0),
            Some(raw) => raw.parse::<u32>().ok().or_else(|| {
                errors.add("extraBeds", "extraBeds must be a non-negative number");
                None
            }),
        };

        match (apartment_id, check_in, check_out, extra_beds) {
            (Some(apartment_id), Some(check_in), Some(check_out), Some(extra_beds))
                if errors.is_empty() =>
            {
                Ok(Quote {
                    apartment_id,
                    check_in,
                    check_out,
                    extra_beds,
                })
            }
            _ => Err(errors),
        }
    }
}

pub async fn quote_stay(
    State(state): State<AppState>,
    Query(query): Query<QuoteQuery>,
) -> CmsResult<Json<StayPrice>> {
    let quote = query.parse()?;
    let price = state
        .pricing()
        .quote(
            quote.apartment_id,
            quote.check_in,
            quote.check_out,
            quote.extra_beds,
        )
        .await?;
    Ok(Json(price))
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> CmsResult<Json<NewsPage>> {
    let request = PageRequest::from_query(query.page.as_deref(), query.limit.as_deref());
    let result = state.news().list_published(request).await;
    state
        .fallback
        .resolve("news", result, || Some(NewsPage::empty(request)))
        .map(Json)
}

pub async fn get_news(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> CmsResult<Json<news::Model>> {
    Ok(Json(state.news().get_published(&slug).await?))
}

pub async fn get_gallery(State(state): State<AppState>) -> CmsResult<Json<Vec<media::Model>>> {
    Ok(Json(state.media().gallery().await?))
}

pub async fn get_navigation(
    State(state): State<AppState>,
) -> CmsResult<Json<Vec<navigation_items::Model>>> {
    let result = state.navigation().list_active().await;
    state
        .fallback
        .resolve("navigation", result, || Some(static_navigation()))
        .map(Json)
}

pub async fn get_settings(
    State(state): State<AppState>,
) -> CmsResult<Json<BTreeMap<String, String>>> {
    Ok(Json(state.settings().as_map().await?))
}

pub async fn get_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> CmsResult<Json<pages::Model>> {
    Ok(Json(state.pages().get_published(&slug).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(apartment_id: &str, check_in: &str, check_out: &str) -> QuoteQuery {
        QuoteQuery {
            apartment_id: Some(apartment_id.to_string()),
            check_in: Some(check_in.to_string()),
            check_out: Some(check_out.to_string()),
            extra_beds: None,
        }
    }

    #[test]
    fn quote_query_defaults_extra_beds() {
        let quote = query("3", "2025-07-01", "2025-07-04").parse().unwrap();
        assert_eq!(quote.apartment_id, 3);
        assert_eq!(quote.extra_beds, 0);
        assert_eq!(quote.check_in, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    }

    #[test]
    fn quote_query_reports_every_bad_field() {
        let mut bad = query("abc", "01-07-2025", "");
        bad.extra_beds = Some("-1".to_string());
        let fields = bad.parse().unwrap_err().into_field_map();
        assert!(fields.contains_key("apartmentId"));
        assert!(fields.contains_key("checkIn"));
        assert!(fields.contains_key("checkOut"));
        assert!(fields.contains_key("extraBeds"));

        let missing = QuoteQuery::default().parse().unwrap_err().into_field_map();
        assert_eq!(missing.len(), 3);
    }
}
