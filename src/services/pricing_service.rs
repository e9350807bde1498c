use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use serde::{Deserialize, Serialize};

use crate::database::entities::{apartments, pricing, season_ranges, SeasonType};
use crate::errors::{CmsError, CmsResult};
use crate::server::requests::{PricingCreateRequest, PricingUpdateRequest};

pub const MAX_QUOTE_NIGHTS: i64 = 365;

/// High season if `date` falls inside any range, bounds inclusive.
pub fn classify(ranges: &[season_ranges::Model], date: NaiveDate) -> SeasonType {
    if ranges.iter().any(|range| range.contains(date)) {
        SeasonType::High
    } else {
        SeasonType::Low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightPrice {
    pub date: NaiveDate,
    pub price: f64,
    pub season_type: SeasonType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayPrice {
    pub total_price: f64,
    pub nights: usize,
    pub breakdown: Vec<NightPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonPricing {
    pub price_per_night: f64,
    pub extra_bed_price: f64,
    pub min_stay_nights: i32,
}

impl From<&pricing::Model> for SeasonPricing {
    fn from(model: &pricing::Model) -> Self {
        Self {
            price_per_night: model.price_per_night,
            extra_bed_price: model.extra_bed_price,
            min_stay_nights: model.min_stay_nights,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonPricingPair {
    pub high: Option<SeasonPricing>,
    pub low: Option<SeasonPricing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentPricing {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub pricing: SeasonPricingPair,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonSummary {
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Public price list: every apartment with its two seasonal rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingOverview {
    pub apartments: Vec<ApartmentPricing>,
    pub seasons: Vec<SeasonSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentRef {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl From<&apartments::Model> for ApartmentRef {
    fn from(model: &apartments::Model) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            slug: model.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingWithApartment {
    #[serde(flatten)]
    pub pricing: pricing::Model,
    pub apartment: Option<ApartmentRef>,
}

#[derive(Clone)]
pub struct PricingService {
    db: DatabaseConnection,
}

impl PricingService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn season_type(&self, date: NaiveDate) -> CmsResult<SeasonType> {
        let ranges = season_ranges::Entity::find().all(&self.db).await?;
        Ok(classify(&ranges, date))
    }

    pub async fn price_for_apartment(
        &self,
        apartment_id: i32,
        season_type: SeasonType,
    ) -> CmsResult<pricing::Model> {
        pricing::Entity::find()
            .filter(pricing::Column::ApartmentId.eq(apartment_id))
            .filter(pricing::Column::SeasonType.eq(season_type.as_str()))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                CmsError::validation(format!(
                    "No pricing configured for apartment {} in {} season",
                    apartment_id, season_type
                ))
            })
    }

    /// Prices each night in `[check_in, check_out)`, resolving the season and
    /// rate for every night separately.
    pub async fn stay_price(
        &self,
        apartment_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
        extra_beds: u32,
    ) -> CmsResult<StayPrice> {
        let mut breakdown = Vec::new();
        let mut total_price = 0.0;

        let mut date = check_in;
        while date < check_out {
            let season_type = self.season_type(date).await?;
            let rate = self.price_for_apartment(apartment_id, season_type).await?;
            let price = rate.price_per_night + rate.extra_bed_price * f64::from(extra_beds);

            breakdown.push(NightPrice {
                date,
                price,
                season_type,
            });
            total_price += price;
            date += Duration::days(1);
        }

        Ok(StayPrice {
            total_price,
            nights: breakdown.len(),
            breakdown,
        })
    }

    pub async fn quote(
        &self,
        apartment_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
        extra_beds: u32,
    ) -> CmsResult<StayPrice> {
        if check_out <= check_in {
            return Err(CmsError::validation("checkOut must be after checkIn"));
        }
        if (check_out - check_in).num_days() > MAX_QUOTE_NIGHTS {
            return Err(CmsError::validation(format!(
                "Stays longer than {} nights cannot be quoted",
                MAX_QUOTE_NIGHTS
            )));
        }
        apartments::Entity::find_by_id(apartment_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CmsError::not_found("Apartment not found"))?;

        self.stay_price(apartment_id, check_in, check_out, extra_beds)
            .await
    }

    pub async fn overview(&self) -> CmsResult<PricingOverview> {
        let apartments = apartments::Entity::find()
            .find_with_related(pricing::Entity)
            .order_by_asc(apartments::Column::Name)
            .all(&self.db)
            .await?;
        let seasons = season_ranges::Entity::find()
            .order_by_asc(season_ranges::Column::StartDate)
            .all(&self.db)
            .await?;

        let rate = |rates: &[pricing::Model], season: SeasonType| {
            rates
                .iter()
                .find(|p| p.season_type == season.as_str())
                .map(SeasonPricing::from)
        };

        Ok(PricingOverview {
            apartments: apartments
                .iter()
                .map(|(apartment, rates)| ApartmentPricing {
                    id: apartment.id,
                    name: apartment.name.clone(),
                    slug: apartment.slug.clone(),
                    pricing: SeasonPricingPair {
                        high: rate(rates, SeasonType::High),
                        low: rate(rates, SeasonType::Low),
                    },
                })
                .collect(),
            seasons: seasons
                .into_iter()
                .map(|season| SeasonSummary {
                    label: season.label,
                    start_date: season.start_date,
                    end_date: season.end_date,
                })
                .collect(),
        })
    }

    pub async fn list_with_apartment(&self) -> CmsResult<Vec<PricingWithApartment>> {
        let rows = pricing::Entity::find()
            .find_also_related(apartments::Entity)
            .all(&self.db)
            .await?;

        let mut items: Vec<PricingWithApartment> = rows
            .into_iter()
            .map(|(pricing, apartment)| PricingWithApartment {
                pricing,
                apartment: apartment.as_ref().map(ApartmentRef::from),
            })
            .collect();
        items.sort_by(|a, b| {
            let name = |item: &PricingWithApartment| {
                item.apartment.as_ref().map(|a| a.name.clone()).unwrap_or_default()
            };
            name(a)
                .cmp(&name(b))
                .then_with(|| a.pricing.season_type.cmp(&b.pricing.season_type))
        });
        Ok(items)
    }

    async fn with_apartment(&self, model: pricing::Model) -> CmsResult<PricingWithApartment> {
        let apartment = model.find_related(apartments::Entity).one(&self.db).await?;
        Ok(PricingWithApartment {
            pricing: model,
            apartment: apartment.as_ref().map(ApartmentRef::from),
        })
    }

    pub async fn create(&self, request: PricingCreateRequest) -> CmsResult<PricingWithApartment> {
        apartments::Entity::find_by_id(request.apartment_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CmsError::not_found("Apartment not found"))?;

        let now = Utc::now();
        let model = pricing::ActiveModel {
            apartment_id: Set(request.apartment_id),
            season_type: Set(request.season_type.as_str().to_string()),
            price_per_night: Set(request.price_per_night),
            extra_bed_price: Set(request.extra_bed_price),
            min_stay_nights: Set(request.min_stay_nights),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => CmsError::validation(format!(
                "Pricing for apartment {} in {} season already exists",
                request.apartment_id, request.season_type
            )),
            _ => CmsError::from(e),
        })?;

        self.with_apartment(model).await
    }

    pub async fn update(
        &self,
        id: i32,
        request: PricingUpdateRequest,
    ) -> CmsResult<PricingWithApartment> {
        let existing = pricing::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CmsError::not_found("Pricing not found"))?;

        let mut active: pricing::ActiveModel = existing.into();
        active.price_per_night = Set(request.price_per_night);
        active.extra_bed_price = Set(request.extra_bed_price);
        active.min_stay_nights = Set(request.min_stay_nights);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;

        self.with_apartment(model).await
    }

    pub async fn delete(&self, id: i32) -> CmsResult<()> {
        let result = pricing::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(CmsError::not_found("Pricing not found"));
        }
        Ok(())
    }
}
