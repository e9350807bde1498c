//! Request bodies accepted by the HTTP API, with their field rules.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::database::entities::{ContentType, MediaCategory, PublishStatus, SeasonType};
use crate::errors::ValidationErrors;
use crate::server::middleware::validation::Validate;
use crate::services::validation::{
    check_length, check_max_length, check_not_blank, is_valid_email, is_valid_slug,
    is_valid_url, parse_iso_date,
};

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !is_valid_email(&self.email) {
            errors.add("email", "Enter a valid email address");
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApartmentRequest {
    pub name: String,
    pub description: String,
    pub amenities: Vec<String>,
}

impl Validate for ApartmentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_length(&mut errors, "name", &self.name, 1, 100, "Name is required");
        check_not_blank(&mut errors, "description", &self.description, "Description is required");
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRangeRequest {
    pub label: String,
    pub start_date: String,
    pub end_date: String,
}

impl SeasonRangeRequest {
    /// The parsed `(start, end)` pair; `None` until [`Validate::validate`] passes.
    pub fn dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((parse_iso_date(&self.start_date)?, parse_iso_date(&self.end_date)?))
    }
}

impl Validate for SeasonRangeRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_length(&mut errors, "label", &self.label, 1, 50, "Season label is required");

        let start = parse_iso_date(&self.start_date);
        let end = parse_iso_date(&self.end_date);
        if start.is_none() {
            errors.add("startDate", "Date format: YYYY-MM-DD");
        }
        if end.is_none() {
            errors.add("endDate", "Date format: YYYY-MM-DD");
        }
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                errors.add("endDate", "End date must not be before start date");
            }
        }
        errors.into_result()
    }
}

fn check_prices(
    errors: &mut ValidationErrors,
    price_per_night: f64,
    extra_bed_price: f64,
    min_stay_nights: i32,
) {
    if !price_per_night.is_finite() || price_per_night <= 0.0 {
        errors.add("pricePerNight", "Price must be greater than 0");
    }
    if !extra_bed_price.is_finite() || extra_bed_price < 0.0 {
        errors.add("extraBedPrice", "Price cannot be negative");
    }
    if min_stay_nights < 1 {
        errors.add("minStayNights", "Minimum 1 night");
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingUpdateRequest {
    pub price_per_night: f64,
    pub extra_bed_price: f64,
    pub min_stay_nights: i32,
}

impl Validate for PricingUpdateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_prices(
            &mut errors,
            self.price_per_night,
            self.extra_bed_price,
            self.min_stay_nights,
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCreateRequest {
    pub apartment_id: i32,
    pub season_type: SeasonType,
    pub price_per_night: f64,
    pub extra_bed_price: f64,
    pub min_stay_nights: i32,
}

impl Validate for PricingCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_prices(
            &mut errors,
            self.price_per_night,
            self.extra_bed_price,
            self.min_stay_nights,
        );
        errors.into_result()
    }
}

fn check_feature_image(errors: &mut ValidationErrors, feature_image: Option<&str>) {
    if let Some(url) = feature_image {
        if !is_valid_url(url) {
            errors.add("featureImage", "Invalid url");
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsCreateRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub feature_image: Option<String>,
    #[serde(default)]
    pub status: PublishStatus,
}

impl Validate for NewsCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_length(&mut errors, "title", &self.title, 1, 200, "Title is required");
        check_not_blank(&mut errors, "content", &self.content, "Content is required");
        if let Some(excerpt) = &self.excerpt {
            check_max_length(&mut errors, "excerpt", excerpt, 500);
        }
        check_feature_image(&mut errors, self.feature_image.as_deref());
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsUpdateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub feature_image: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<PublishStatus>,
}

impl Validate for NewsUpdateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            check_length(&mut errors, "title", title, 1, 200, "Title is required");
        }
        if let Some(content) = &self.content {
            check_not_blank(&mut errors, "content", content, "Content is required");
        }
        if let Some(excerpt) = &self.excerpt {
            check_max_length(&mut errors, "excerpt", excerpt, 500);
        }
        if let Some(feature_image) = &self.feature_image {
            check_feature_image(&mut errors, feature_image.as_deref());
        }
        errors.into_result()
    }
}

fn check_page_slug(errors: &mut ValidationErrors, slug: &str) {
    if slug.is_empty() || slug.chars().count() > 100 {
        errors.add("slug", "Slug must be between 1 and 100 characters");
    } else if !is_valid_slug(slug) {
        errors.add(
            "slug",
            "Slug may contain only lowercase letters, digits and hyphens",
        );
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCreateRequest {
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub status: PublishStatus,
    #[serde(default)]
    pub show_in_footer: bool,
}

impl Validate for PageCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_length(&mut errors, "title", &self.title, 1, 200, "Title is required");
        check_page_slug(&mut errors, &self.slug);
        check_not_blank(&mut errors, "content", &self.content, "Content is required");
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageUpdateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: Option<PublishStatus>,
    #[serde(default)]
    pub show_in_footer: Option<bool>,
}

impl Validate for PageUpdateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            check_length(&mut errors, "title", title, 1, 200, "Title is required");
        }
        if let Some(slug) = &self.slug {
            check_page_slug(&mut errors, slug);
        }
        if let Some(content) = &self.content {
            check_not_blank(&mut errors, "content", content, "Content is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUpdateRequest {
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub category: Option<MediaCategory>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub apartment_id: Option<Option<i32>>,
}

impl Validate for MediaUpdateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(alt) = &self.alt {
            check_max_length(&mut errors, "alt", alt, 200);
        }
        if matches!(self.order, Some(order) if order < 0) {
            errors.add("order", "Order cannot be negative");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReorderItem {
    pub id: i32,
    pub order: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReorderRequest {
    pub items: Vec<ReorderItem>,
}

impl ReorderRequest {
    /// Media positions are zero-based and never negative.
    pub fn ensure_non_negative(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (index, item) in self.items.iter().enumerate() {
            if item.order < 0 {
                errors.add(format!("items.{}.order", index), "Order cannot be negative");
            }
        }
        errors.into_result()
    }
}

impl Validate for ReorderRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettingRequest {
    pub key: String,
    pub value: String,
}

impl Validate for SettingRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.key.is_empty() || self.key.chars().count() > 50 {
            errors.add("key", "Key must be between 1 and 50 characters");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ContentItemRequest {
    pub page: String,
    pub section: String,
    pub key: String,
    pub value: String,
    #[serde(default, rename = "type")]
    pub content_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Validate for ContentItemRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (field, value) in [
            ("page", &self.page),
            ("section", &self.section),
            ("key", &self.key),
        ] {
            if value.is_empty() {
                errors.add(field, format!("{} is required", field));
            }
        }
        if matches!(&self.metadata, Some(metadata) if !metadata.is_object() && !metadata.is_null())
        {
            errors.add("metadata", "Metadata must be an object");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BulkContentRequest {
    pub items: Vec<ContentItemRequest>,
}

impl Validate for BulkContentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.items.is_empty() {
            errors.add("items", "At least one item is required");
        }
        for (index, item) in self.items.iter().enumerate() {
            if let Err(nested) = item.validate() {
                errors.merge_nested(&format!("items.{}", index), nested);
            }
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationCreateRequest {
    pub label: String,
    pub path: String,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Validate for NavigationCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.label.is_empty() {
            errors.add("label", "Label is required");
        }
        if self.path.is_empty() {
            errors.add("path", "Path is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationUpdateRequest {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Validate for NavigationUpdateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if matches!(&self.label, Some(label) if label.is_empty()) {
            errors.add("label", "Label is required");
        }
        if matches!(&self.path, Some(path) if path.is_empty()) {
            errors.add("path", "Path is required");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn season_end_before_start_is_reported_on_end_date() {
        let request = SeasonRangeRequest {
            label: "Wakacje".to_string(),
            start_date: "2025-08-31".to_string(),
            end_date: "2025-07-01".to_string(),
        };
        let fields = request.validate().unwrap_err().into_field_map();
        assert!(fields.contains_key("endDate"));
        assert!(!fields.contains_key("startDate"));
    }

    #[test]
    fn single_day_season_is_valid() {
        let request = SeasonRangeRequest {
            label: "Boże Ciało".to_string(),
            start_date: "2025-06-19".to_string(),
            end_date: "2025-06-19".to_string(),
        };
        assert!(request.validate().is_ok());
        assert!(request.dates().is_some());
    }

    #[test]
    fn bulk_errors_are_prefixed_by_index() {
        let request: BulkContentRequest = serde_json::from_value(json!({
            "items": [
                {"page": "home", "section": "hero", "key": "title", "value": "A"},
                {"page": "home", "section": "", "key": "title", "value": "B"}
            ]
        }))
        .unwrap();
        assert_eq!(request.items[0].content_type, ContentType::Text);

        let fields = request.validate().unwrap_err().into_field_map();
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["items.1.section"]);
    }

    #[test]
    fn empty_bulk_is_rejected() {
        let request = BulkContentRequest { items: vec![] };
        assert!(request.validate().is_err());
    }

    #[test]
    fn news_update_distinguishes_null_from_missing() {
        let cleared: NewsUpdateRequest =
            serde_json::from_value(json!({ "featureImage": null })).unwrap();
        assert_eq!(cleared.feature_image, Some(None));

        let untouched: NewsUpdateRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(untouched.feature_image, None);
    }

    #[test]
    fn news_feature_image_must_be_url() {
        let request: NewsCreateRequest = serde_json::from_value(json!({
            "title": "Otwarcie sezonu",
            "content": "Zapraszamy",
            "featureImage": "not a url"
        }))
        .unwrap();
        assert_eq!(request.status, PublishStatus::Draft);
        let fields = request.validate().unwrap_err().into_field_map();
        assert!(fields.contains_key("featureImage"));
    }

    #[test]
    fn pricing_rules() {
        let request = PricingUpdateRequest {
            price_per_night: 0.0,
            extra_bed_price: -1.0,
            min_stay_nights: 0,
        };
        let fields = request.validate().unwrap_err().into_field_map();
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn page_slug_pattern() {
        let mut request = PageCreateRequest {
            title: "Regulamin".to_string(),
            slug: "Regulamin!".to_string(),
            content: "...".to_string(),
            status: PublishStatus::Published,
            show_in_footer: true,
        };
        assert!(request.validate().is_err());
        request.slug = "regulamin".to_string();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn media_reorder_rejects_negative_positions() {
        let request = ReorderRequest {
            items: vec![ReorderItem { id: 1, order: 0 }, ReorderItem { id: 2, order: -1 }],
        };
        assert!(request.validate().is_ok());
        let fields = request.ensure_non_negative().unwrap_err().into_field_map();
        assert!(fields.contains_key("items.1.order"));
    }
}
