//! What public endpoints serve when the database cannot be reached.
//!
//! Under [`FallbackPolicy::Strict`] storage failures surface as 500s. Under
//! [`FallbackPolicy::StaticDefaults`] they are logged and replaced with the
//! built-in seed data, so the marketing site keeps rendering.

use chrono::Utc;
use clap::ValueEnum;
use serde_json::json;
use tracing::warn;

use crate::database::entities::{apartments, navigation_items, pricing, SeasonType};
use crate::database::seed_data::{
    default_season_dates, DEFAULT_APARTMENTS, DEFAULT_NAVIGATION, DEFAULT_PRICING,
};
use crate::errors::CmsResult;
use crate::services::apartment_service::{ApartmentDetail, ApartmentWithMedia};
use crate::services::pricing_service::{
    ApartmentPricing, PricingOverview, SeasonPricing, SeasonPricingPair, SeasonSummary,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FallbackPolicy {
    #[default]
    Strict,
    StaticDefaults,
}

impl FallbackPolicy {
    /// Passes `result` through unless it is a storage failure and static
    /// defaults are enabled, in which case `fallback` is served instead.
    pub fn resolve<T>(
        self,
        what: &str,
        result: CmsResult<T>,
        fallback: impl FnOnce() -> Option<T>,
    ) -> CmsResult<T> {
        match result {
            Err(err) if self == FallbackPolicy::StaticDefaults && err.is_storage_failure() => {
                match fallback() {
                    Some(value) => {
                        warn!("[{}] Database error, using fallback: {}", what, err);
                        Ok(value)
                    }
                    None => Err(err),
                }
            }
            other => other,
        }
    }
}

/// Synthetic ids start at -1 and count down so they never collide with rows.
fn static_apartment(index: usize) -> apartments::Model {
    let now = Utc::now();
    let seed = &DEFAULT_APARTMENTS[index];
    apartments::Model {
        id: -(index as i32) - 1,
        name: seed.name.to_string(),
        slug: seed.slug.to_string(),
        description: seed.description.to_string(),
        amenities: json!(seed.amenities),
        created_at: now,
        updated_at: now,
    }
}

pub fn static_apartments() -> Vec<ApartmentWithMedia> {
    (0..DEFAULT_APARTMENTS.len())
        .map(|index| ApartmentWithMedia {
            apartment: static_apartment(index),
            media: Vec::new(),
        })
        .collect()
}

pub fn static_apartment_detail(slug: &str) -> Option<ApartmentDetail> {
    let index = DEFAULT_APARTMENTS.iter().position(|a| a.slug == slug)?;
    let apartment = static_apartment(index);
    let now = Utc::now();
    let pricing = DEFAULT_PRICING
        .iter()
        .map(|rate| pricing::Model {
            id: 0,
            apartment_id: apartment.id,
            season_type: rate.season_type.as_str().to_string(),
            price_per_night: rate.price_per_night,
            extra_bed_price: rate.extra_bed_price,
            min_stay_nights: rate.min_stay_nights,
            created_at: now,
            updated_at: now,
        })
        .collect();

    Some(ApartmentDetail {
        apartment,
        pricing,
        media: Vec::new(),
    })
}

pub fn static_pricing() -> PricingOverview {
    let rate = |season| {
        DEFAULT_PRICING
            .iter()
            .find(|rate| rate.season_type == season)
            .map(|rate| SeasonPricing {
                price_per_night: rate.price_per_night,
                extra_bed_price: rate.extra_bed_price,
                min_stay_nights: rate.min_stay_nights,
            })
    };

    PricingOverview {
        apartments: (0..DEFAULT_APARTMENTS.len())
            .map(|index| {
                let apartment = static_apartment(index);
                ApartmentPricing {
                    id: apartment.id,
                    name: apartment.name,
                    slug: apartment.slug,
                    pricing: SeasonPricingPair {
                        high: rate(SeasonType::High),
                        low: rate(SeasonType::Low),
                    },
                }
            })
            .collect(),
        seasons: default_season_dates()
            .into_iter()
            .map(|(label, start_date, end_date)| SeasonSummary {
                label: label.to_string(),
                start_date,
                end_date,
            })
            .collect(),
    }
}

pub fn static_navigation() -> Vec<navigation_items::Model> {
    let now = Utc::now();
    DEFAULT_NAVIGATION
        .iter()
        .enumerate()
        .map(|(index, (label, path))| navigation_items::Model {
            id: -(index as i32) - 1,
            label: label.to_string(),
            path: path.to_string(),
            order: index as i32,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CmsError;

    #[test]
    fn strict_policy_surfaces_storage_failures() {
        let result: CmsResult<Vec<i32>> = Err(CmsError::unavailable("Database unavailable"));
        let resolved = FallbackPolicy::Strict.resolve("test", result, || Some(vec![1]));
        assert!(resolved.is_err());
    }

    #[test]
    fn static_policy_replaces_storage_failures_only() {
        let policy = FallbackPolicy::StaticDefaults;

        let failed: CmsResult<Vec<i32>> = Err(CmsError::internal("Database error"));
        assert_eq!(policy.resolve("test", failed, || Some(vec![1])).unwrap(), vec![1]);

        let missing: CmsResult<Vec<i32>> = Err(CmsError::not_found("Apartment not found"));
        assert!(policy.resolve("test", missing, || Some(vec![1])).is_err());

        let no_default: CmsResult<Vec<i32>> = Err(CmsError::internal("Database error"));
        assert!(policy.resolve("test", no_default, || None).is_err());
    }

    #[test]
    fn static_data_mirrors_seed() {
        assert_eq!(static_apartments().len(), 2);
        assert!(static_apartment_detail("czapla-wodna").is_some());
        assert!(static_apartment_detail("czapla-lesna").is_none());

        let pricing = static_pricing();
        assert_eq!(pricing.apartments[0].pricing.high.as_ref().unwrap().price_per_night, 450.0);
        assert_eq!(pricing.seasons.len(), 7);
        assert_eq!(static_navigation()[0].path, "/");
    }
}
