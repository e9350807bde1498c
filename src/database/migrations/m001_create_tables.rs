use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn timestamps(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Alias::new("created_at"))
                .timestamp_with_time_zone()
                .default(Expr::current_timestamp())
                .not_null(),
        )
        .col(
            ColumnDef::new(Alias::new("updated_at"))
                .timestamp_with_time_zone()
                .default(Expr::current_timestamp())
                .not_null(),
        )
}

fn id_column<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create apartments table
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Apartments::Table)
                        .if_not_exists()
                        .col(&mut id_column(Apartments::Id))
                        .col(ColumnDef::new(Apartments::Name).string_len(100).not_null())
                        .col(
                            ColumnDef::new(Apartments::Slug)
                                .string_len(120)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Apartments::Description).text().not_null())
                        .col(ColumnDef::new(Apartments::Amenities).json().not_null()),
                )
                .to_owned(),
            )
            .await?;

        // Create pricing table
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Pricing::Table)
                        .if_not_exists()
                        .col(&mut id_column(Pricing::Id))
                        .col(ColumnDef::new(Pricing::ApartmentId).integer().not_null())
                        .col(ColumnDef::new(Pricing::SeasonType).string_len(8).not_null())
                        .col(ColumnDef::new(Pricing::PricePerNight).double().not_null())
                        .col(
                            ColumnDef::new(Pricing::ExtraBedPrice)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Pricing::MinStayNights)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_pricing_apartment_id")
                                .from(Pricing::Table, Pricing::ApartmentId)
                                .to(Apartments::Table, Apartments::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pricing_apartment_season")
                    .table(Pricing::Table)
                    .col(Pricing::ApartmentId)
                    .col(Pricing::SeasonType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create media table
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Media::Table)
                        .if_not_exists()
                        .col(&mut id_column(Media::Id))
                        .col(ColumnDef::new(Media::UrlOriginal).text().not_null())
                        .col(ColumnDef::new(Media::UrlCompressed).text().not_null())
                        .col(ColumnDef::new(Media::Alt).string_len(200))
                        .col(ColumnDef::new(Media::Order).integer().not_null().default(0))
                        .col(
                            ColumnDef::new(Media::Category)
                                .string_len(16)
                                .not_null()
                                .default("gallery"),
                        )
                        .col(ColumnDef::new(Media::ApartmentId).integer())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_media_apartment_id")
                                .from(Media::Table, Media::ApartmentId)
                                .to(Apartments::Table, Apartments::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        ),
                )
                .to_owned(),
            )
            .await?;

        // Create season_ranges table
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(SeasonRanges::Table)
                        .if_not_exists()
                        .col(&mut id_column(SeasonRanges::Id))
                        .col(ColumnDef::new(SeasonRanges::Label).string_len(50).not_null())
                        .col(ColumnDef::new(SeasonRanges::StartDate).date().not_null())
                        .col(ColumnDef::new(SeasonRanges::EndDate).date().not_null()),
                )
                .to_owned(),
            )
            .await?;

        // Create page_content table
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(PageContent::Table)
                        .if_not_exists()
                        .col(&mut id_column(PageContent::Id))
                        .col(ColumnDef::new(PageContent::Page).string_len(50).not_null())
                        .col(ColumnDef::new(PageContent::Section).string_len(50).not_null())
                        .col(ColumnDef::new(PageContent::Key).string_len(100).not_null())
                        .col(ColumnDef::new(PageContent::Value).text().not_null())
                        .col(
                            ColumnDef::new(PageContent::Type)
                                .string_len(16)
                                .not_null()
                                .default("text"),
                        )
                        .col(ColumnDef::new(PageContent::Metadata).json()),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_page_content_page_section_key")
                    .table(PageContent::Table)
                    .col(PageContent::Page)
                    .col(PageContent::Section)
                    .col(PageContent::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create navigation_items table
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(NavigationItems::Table)
                        .if_not_exists()
                        .col(&mut id_column(NavigationItems::Id))
                        .col(ColumnDef::new(NavigationItems::Label).string_len(50).not_null())
                        .col(ColumnDef::new(NavigationItems::Path).string_len(200).not_null())
                        .col(
                            ColumnDef::new(NavigationItems::Order)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(NavigationItems::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        ),
                )
                .to_owned(),
            )
            .await?;

        // Create news table
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(News::Table)
                        .if_not_exists()
                        .col(&mut id_column(News::Id))
                        .col(ColumnDef::new(News::Title).string_len(200).not_null())
                        .col(
                            ColumnDef::new(News::Slug)
                                .string_len(220)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(News::Content).text().not_null())
                        .col(ColumnDef::new(News::Excerpt).string_len(500))
                        .col(ColumnDef::new(News::FeatureImage).text())
                        .col(
                            ColumnDef::new(News::Status)
                                .string_len(16)
                                .not_null()
                                .default("draft"),
                        )
                        .col(ColumnDef::new(News::PublishedAt).timestamp_with_time_zone()),
                )
                .to_owned(),
            )
            .await?;

        // Create global_settings table
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(GlobalSettings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(GlobalSettings::Key)
                                .string_len(50)
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(GlobalSettings::Value).text().not_null()),
                )
                .to_owned(),
            )
            .await?;

        // Create pages table
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Pages::Table)
                        .if_not_exists()
                        .col(&mut id_column(Pages::Id))
                        .col(ColumnDef::new(Pages::Title).string_len(200).not_null())
                        .col(
                            ColumnDef::new(Pages::Slug)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Pages::Content).text().not_null())
                        .col(
                            ColumnDef::new(Pages::Status)
                                .string_len(16)
                                .not_null()
                                .default("draft"),
                        )
                        .col(
                            ColumnDef::new(Pages::ShowInFooter)
                                .boolean()
                                .not_null()
                                .default(false),
                        ),
                )
                .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GlobalSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(News::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NavigationItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PageContent::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SeasonRanges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Media::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pricing::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Apartments::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Apartments {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Amenities,
}

#[derive(Iden)]
enum Pricing {
    Table,
    Id,
    ApartmentId,
    SeasonType,
    PricePerNight,
    ExtraBedPrice,
    MinStayNights,
}

#[derive(Iden)]
enum Media {
    Table,
    Id,
    UrlOriginal,
    UrlCompressed,
    Alt,
    Order,
    Category,
    ApartmentId,
}

#[derive(Iden)]
enum SeasonRanges {
    Table,
    Id,
    Label,
    StartDate,
    EndDate,
}

#[derive(Iden)]
enum PageContent {
    Table,
    Id,
    Page,
    Section,
    Key,
    Value,
    Type,
    Metadata,
}

#[derive(Iden)]
enum NavigationItems {
    Table,
    Id,
    Label,
    Path,
    Order,
    IsActive,
}

#[derive(Iden)]
enum News {
    Table,
    Id,
    Title,
    Slug,
    Content,
    Excerpt,
    FeatureImage,
    Status,
    PublishedAt,
}

#[derive(Iden)]
enum GlobalSettings {
    Table,
    Key,
    Value,
}

#[derive(Iden)]
enum Pages {
    Table,
    Id,
    Title,
    Slug,
    Content,
    Status,
    ShowInFooter,
}
