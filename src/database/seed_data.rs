//! Default data written on first boot.
//!
//! Every table is checked on its own and only filled when empty, so running the
//! seed repeatedly is harmless. The same constants back the static public
//! fallback in `services::fallback`.

use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use sea_orm::*;
use serde_json::json;
use tracing::{error, info, warn};

use crate::database::entities::{
    apartments, global_settings, navigation_items, page_content, pricing, season_ranges,
    ContentType, SeasonType,
};
use crate::services::validation::parse_iso_date;

pub struct DefaultApartment {
    pub name: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    pub amenities: &'static [&'static str],
}

pub struct DefaultPricing {
    pub season_type: SeasonType,
    pub price_per_night: f64,
    pub extra_bed_price: f64,
    pub min_stay_nights: i32,
}

pub const DEFAULT_APARTMENTS: &[DefaultApartment] = &[
    DefaultApartment {
        name: "Czapla Polna",
        slug: "czapla-polna",
        description: "Przytulny apartament z widokiem na łąki. Idealny dla par i rodzin z dziećmi.",
        amenities: &["WiFi", "TV", "Aneks kuchenny", "Łazienka", "Taras", "Przyjazny psom"],
    },
    DefaultApartment {
        name: "Czapla Wodna",
        slug: "czapla-wodna",
        description: "Przestronny apartament z widokiem na jezioro. Doskonały dla miłośników przyrody.",
        amenities: &[
            "WiFi",
            "TV",
            "Aneks kuchenny",
            "Łazienka",
            "Taras",
            "Przyjazny psom",
            "Widok na jezioro",
        ],
    },
];

/// Applied to every default apartment.
pub const DEFAULT_PRICING: &[DefaultPricing] = &[
    DefaultPricing {
        season_type: SeasonType::High,
        price_per_night: 450.0,
        extra_bed_price: 80.0,
        min_stay_nights: 4,
    },
    DefaultPricing {
        season_type: SeasonType::Low,
        price_per_night: 350.0,
        extra_bed_price: 60.0,
        min_stay_nights: 3,
    },
];

pub const DEFAULT_SEASONS: &[(&str, &str, &str)] = &[
    ("Sylwester / Nowy Rok", "2025-01-01", "2025-01-07"),
    ("Ferie zimowe", "2025-01-25", "2025-02-09"),
    ("Wielkanoc", "2025-04-18", "2025-04-21"),
    ("Majówka", "2025-05-01", "2025-05-04"),
    ("Boże Ciało", "2025-06-19", "2025-06-22"),
    ("Wakacje letnie", "2025-07-01", "2025-08-31"),
    ("Boże Narodzenie", "2025-12-23", "2025-12-31"),
];

pub const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    ("site_name", "Czaplisko Siedlisko"),
    ("phone", "+48 123 456 789"),
    ("email", "kontakt@czaplisko.pl"),
    ("address", "Mazury Zachodnie, Polska"),
    ("facebook_url", "https://facebook.com/czaplisko"),
    ("instagram_url", "https://instagram.com/czaplisko"),
];

pub const DEFAULT_NAVIGATION: &[(&str, &str)] = &[
    ("Start", "/"),
    ("Apartamenty", "/apartamenty"),
    ("Cennik", "/cennik"),
    ("Galeria", "/galeria"),
    ("FAQ", "/faq"),
    ("Kontakt", "/kontakt"),
];

/// `(page, section, key, value, type)`
pub const DEFAULT_PAGE_CONTENT: &[(&str, &str, &str, &str, ContentType)] = &[
    ("global", "header", "logo", "https://cdn.czapliskosiedlisko.pl/defaults/logo-czaplisko.png", ContentType::Image),
    ("global", "social", "facebook", "https://facebook.com/czaplisko", ContentType::Text),
    ("global", "social", "instagram", "https://instagram.com/czaplisko", ContentType::Text),
    ("home", "intro", "label", "Witamy w Czaplisku", ContentType::Text),
    ("home", "intro", "title", "Twoja oaza spokoju w sercu Mazur Zachodnich", ContentType::Text),
    ("home", "intro", "description", "Przeżyj prawdziwą harmonię z naturą. Nasz ekologiczny pensjonat oferuje unikalne połączenie nowoczesnego komfortu i wiejskiego uroku, gdzie każdy gość, również ten czworonożny, jest traktowany z królewską troską.", ContentType::Text),
    ("home", "hero", "label", "ODKRYJ SPOKÓJ", ContentType::Text),
    ("home", "hero", "title", "Relaksujące Wakacje", ContentType::Text),
    ("home", "hero", "description", "Przeżyj niezapomniane chwile na Mazurach Zachodnich. Nasz ekologiczny pensjonat to idealne miejsce na wypoczynek w otoczeniu dziewiczej natury i absolutnego spokoju.", ContentType::Text),
    ("home", "hero", "button_text", "Zobacz Apartamenty", ContentType::Text),
    ("home", "features", "title", "Najlepszy wypoczynek nad jeziorem na Mazurach Zachodnich", ContentType::Text),
    ("home", "hero_cards", "card1_title", "Komfortowe Pokoje", ContentType::Text),
    ("home", "hero_cards", "card1_description", "Przestronne apartamenty z widokiem na jezioro i las. Idealne dla rodzin z psami.", ContentType::Text),
    ("home", "hero_cards", "card2_title", "Idealne Wakacje", ContentType::Text),
    ("home", "hero_cards", "card2_description", "Cisza, spokój i kontakt z naturą. Wypoczynek jakiego szukasz.", ContentType::Text),
    ("home", "hero_cards", "card3_title", "Ekologia i Natura", ContentType::Text),
    ("home", "hero_cards", "card3_description", "Certyfikowany ekologiczny pensjonat. Dbamy o środowisko.", ContentType::Text),
    ("home", "features_cards", "card1_title", "Taras", ContentType::Text),
    ("home", "features_cards", "card1_subtitle", "Z widokiem", ContentType::Text),
    ("home", "features_cards", "card2_title", "Pomost", ContentType::Text),
    ("home", "features_cards", "card2_subtitle", "Nad jeziorem", ContentType::Text),
    ("home", "features_list", "paw_description", "Pensjonat przyjazny psom. Twój czworonożny przyjaciel jest u nas mile widziany i może korzystać z całego terenu.", ContentType::Text),
    ("home", "features_list", "leaf_description", "Certyfikowany ekologiczny obiekt. Korzystamy z energii odnawialnej i dbamy o minimalizację naszego wpływu na środowisko.", ContentType::Text),
    ("home", "features_list", "water_description", "Bezpośredni dostęp do jeziora z własnym pomostem. Idealne miejsce na poranne pływanie lub wieczorny relaks.", ContentType::Text),
    ("home", "features_list", "kitchen_description", "W pełni wyposażona kuchnia w każdym apartamencie. Lokalne produkty dostępne na zamówienie.", ContentType::Text),
    ("home", "location", "label", "Mazury Zachodnie", ContentType::Text),
    ("home", "location", "title", "Odkryj naszą lokalizację", ContentType::Text),
    ("home", "location", "description_1", "Czaplisko Siedlisko znajduje się w malowniczej wsi Skitławki, w samym sercu Mazur Zachodnich. Otoczeni lasami i jeziorami, oferujemy ucieczkę od zgiełku miasta.", ContentType::Text),
    ("home", "location", "description_2", "Zaledwie 15 minut jazdy od Zalewa i 40 minut od Ostródy. Idealna baza wypadowa do odkrywania regionu.", ContentType::Text),
    ("apartments", "hero", "title", "Apartamenty", ContentType::Text),
    ("apartments", "content", "subtitle", "Wybierz swój apartament", ContentType::Text),
    ("contact", "hero", "title", "Kontakt", ContentType::Text),
    ("contact", "form", "label", "Napisz do nas", ContentType::Text),
    ("contact", "form", "title", "Skontaktuj się", ContentType::Text),
    ("contact", "form", "description", "Masz pytania dotyczące rezerwacji lub pobytu? Napisz do nas, a odpowiemy najszybciej jak to możliwe.", ContentType::Text),
    ("contact", "info", "address_street", "Skitławki 2A", ContentType::Text),
    ("contact", "info", "address_city", "14-230 Zalewo", ContentType::Text),
    ("contact", "info", "phone", "+48 123 456 789", ContentType::Text),
    ("contact", "info", "email", "kontakt@czaplisko.pl", ContentType::Text),
    ("contact", "info", "region", "Mazury Zachodnie", ContentType::Text),
    ("contact", "info", "checkin", "15:00 - 20:00", ContentType::Text),
    ("contact", "info", "checkout", "do 11:00", ContentType::Text),
    ("faq", "header", "label", "Pytania i odpowiedzi", ContentType::Text),
    ("faq", "header", "title", "FAQ", ContentType::Text),
    ("faq", "cta", "title", "Masz więcej pytań?", ContentType::Text),
    ("faq", "cta", "description", "Nasz zespół jest gotowy, aby pomóc Ci zaplanować idealny pobyt.", ContentType::Text),
    ("faq", "cta", "button_text", "Skontaktuj się", ContentType::Text),
    ("faq", "items", "q1_question", "Czy przyjmujecie zwierzęta?", ContentType::Text),
    ("faq", "items", "q1_answer", "Tak! Jesteśmy obiektem \"Dog Friendly\". Twoi czworonożni przyjaciele są u nas zawsze mile widziani bez dodatkowych opłat.", ContentType::Text),
    ("faq", "items", "q2_question", "Jakie są godziny zameldowania?", ContentType::Text),
    ("faq", "items", "q2_answer", "Doba hotelowa zaczyna się o godzinie 15:00, a kończy o 11:00 następnego dnia.", ContentType::Text),
    ("faq", "items", "q3_question", "Czy jest dostępny parking na miejscu?", ContentType::Text),
    ("faq", "items", "q3_answer", "Oczywiście. Zapewniamy bezpłatny parking dla wszystkich naszych gości bezpośrednio przy pensjonacie.", ContentType::Text),
    ("faq", "items", "q4_question", "Czy apartamenty mają pełne wyposażenie kuchni?", ContentType::Text),
    ("faq", "items", "q4_answer", "Tak, każdy apartament posiada w pełni wyposażony aneks kuchenny z lodówką, kuchenką, czajnikiem i podstawowymi naczyniami.", ContentType::Text),
    ("gallery", "hero", "title", "Galeria", ContentType::Text),
    ("gallery", "intro", "title", "Odkryj piękno Czaplisko Siedlisko", ContentType::Text),
    ("gallery", "intro", "description", "Przeglądaj zdjęcia naszych apartamentów, otaczającej natury i udogodnień.", ContentType::Text),
    ("gallery", "cta", "title", "Zarezerwuj swój pobyt", ContentType::Text),
    ("gallery", "cta", "button_text", "Kontakt", ContentType::Text),
    ("pricing", "header", "title", "Cennik", ContentType::Text),
    ("pricing", "header", "subtitle", "Sezonowe ceny apartamentów", ContentType::Text),
    ("pricing", "high_season", "description", "Przeżyj energię Mazur Zachodnich w pełnym rozkwicie. Długie dni, krystalicznie czysta woda i absolutny spokój.", ContentType::Text),
    ("pricing", "low_season", "description", "Przytul się w naszym ekologicznym pensjonacie. Korzystaj ze specjalnych cen poza sezonem i ciesz się spokojem.", ContentType::Text),
    ("pricing", "cta", "title", "Gotowy zarezerwować wypoczynek?", ContentType::Text),
    ("pricing", "cta", "button_text", "Skontaktuj się z nami", ContentType::Text),
    ("footer", "visit", "title", "Odwiedź nas", ContentType::Text),
    ("footer", "social", "title", "Social media", ContentType::Text),
    ("footer", "address", "line1", "Czaplisko Siedlisko", ContentType::Text),
    ("footer", "address", "line2", "Dog Friendly & Eco Guesthouse", ContentType::Text),
    ("footer", "address", "street", "Skitławki 2A", ContentType::Text),
    ("footer", "address", "city", "14-230 Zalewo", ContentType::Text),
    ("footer", "social", "facebook", "https://facebook.com/czaplisko", ContentType::Text),
    ("footer", "social", "instagram", "https://instagram.com/czaplisko", ContentType::Text),
];

/// Default high-season ranges as calendar dates.
pub fn default_season_dates() -> Vec<(&'static str, NaiveDate, NaiveDate)> {
    DEFAULT_SEASONS
        .iter()
        .filter_map(|(label, start, end)| {
            Some((*label, parse_iso_date(start)?, parse_iso_date(end)?))
        })
        .collect()
}

/// Tables that were empty and got filled by [`seed_defaults`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub apartments: bool,
    pub settings: bool,
    pub seasons: bool,
    pub navigation: bool,
    pub page_content: bool,
}

pub async fn seed_defaults(db: &DatabaseConnection) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    let apartment_count = apartments::Entity::find().count(db).await?;
    if apartment_count == 0 {
        info!("No apartments found, seeding apartments and pricing");
        seed_apartments(db).await?;
        report.apartments = true;
    } else {
        info!("Database already has {} apartments, skipping", apartment_count);
    }

    if global_settings::Entity::find().count(db).await? == 0 {
        info!("No global settings found, creating defaults");
        let now = Utc::now();
        let models = DEFAULT_SETTINGS.iter().map(|(key, value)| global_settings::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        });
        global_settings::Entity::insert_many(models).exec(db).await?;
        report.settings = true;
    }

    if season_ranges::Entity::find().count(db).await? == 0 {
        info!("No season ranges found, creating defaults");
        let now = Utc::now();
        let mut models = Vec::new();
        for (label, start, end) in DEFAULT_SEASONS {
            let start_date =
                parse_iso_date(start).ok_or_else(|| anyhow!("invalid seed date {}", start))?;
            let end_date = parse_iso_date(end).ok_or_else(|| anyhow!("invalid seed date {}", end))?;
            models.push(season_ranges::ActiveModel {
                label: Set(label.to_string()),
                start_date: Set(start_date),
                end_date: Set(end_date),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            });
        }
        season_ranges::Entity::insert_many(models).exec(db).await?;
        report.seasons = true;
    }

    if navigation_items::Entity::find().count(db).await? == 0 {
        info!("No navigation items found, creating defaults");
        let now = Utc::now();
        let models = DEFAULT_NAVIGATION
            .iter()
            .enumerate()
            .map(|(order, (label, path))| navigation_items::ActiveModel {
                label: Set(label.to_string()),
                path: Set(path.to_string()),
                order: Set(order as i32),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            });
        navigation_items::Entity::insert_many(models).exec(db).await?;
        report.navigation = true;
    }

    if page_content::Entity::find().count(db).await? == 0 {
        info!("No page content found, creating defaults");
        let now = Utc::now();
        let models = DEFAULT_PAGE_CONTENT
            .iter()
            .map(|(page, section, key, value, content_type)| page_content::ActiveModel {
                page: Set(page.to_string()),
                section: Set(section.to_string()),
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                content_type: Set(content_type.as_str().to_string()),
                metadata: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            });
        page_content::Entity::insert_many(models).exec(db).await?;
        report.page_content = true;
    }

    info!("Database initialization complete");
    Ok(report)
}

async fn seed_apartments(db: &DatabaseConnection) -> Result<()> {
    let txn = db.begin().await?;
    let now = Utc::now();

    for apartment in DEFAULT_APARTMENTS {
        let created = apartments::ActiveModel {
            name: Set(apartment.name.to_string()),
            slug: Set(apartment.slug.to_string()),
            description: Set(apartment.description.to_string()),
            amenities: Set(json!(apartment.amenities)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for price in DEFAULT_PRICING {
            pricing::ActiveModel {
                apartment_id: Set(created.id),
                season_type: Set(price.season_type.as_str().to_string()),
                price_per_night: Set(price.price_per_night),
                extra_bed_price: Set(price.extra_bed_price),
                min_stay_nights: Set(price.min_stay_nights),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        info!("Created apartment {} with default pricing", apartment.name);
    }

    txn.commit().await?;
    Ok(())
}

/// Backoff schedule for the startup seed: wait `initial_delay`, then try up to
/// `max_attempts` times, sleeping `step * attempt` after each failure.
#[derive(Debug, Clone, Copy)]
pub struct SeedRetry {
    pub initial_delay: Duration,
    pub step: Duration,
    pub max_attempts: u32,
}

impl Default for SeedRetry {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(3),
            step: Duration::from_secs(2),
            max_attempts: 5,
        }
    }
}

impl SeedRetry {
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            initial_delay: Duration::ZERO,
            step: Duration::ZERO,
            max_attempts,
        }
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.step * attempt
    }
}

/// Runs [`seed_defaults`] with backoff. Gives up after the last attempt and
/// returns `None`; the caller keeps serving either way.
pub async fn seed_with_retry(db: &DatabaseConnection, retry: SeedRetry) -> Option<SeedReport> {
    tokio::time::sleep(retry.initial_delay).await;

    for attempt in 1..=retry.max_attempts {
        info!(
            "Checking database initialization (attempt {}/{})",
            attempt, retry.max_attempts
        );
        match seed_defaults(db).await {
            Ok(report) => return Some(report),
            Err(e) => {
                warn!("Database initialization failed (attempt {}): {:#}", attempt, e);
                if attempt < retry.max_attempts {
                    let delay = retry.delay_after(attempt);
                    info!("Retrying in {} seconds", delay.as_secs());
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    error!("Max attempts reached. Database initialization failed.");
    None
}
