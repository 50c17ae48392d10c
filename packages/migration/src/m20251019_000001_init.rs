use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    PasswordHash,
    Role,
    IsActive,
    LastLoginAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum News {
    Table,
    Id,
    Title,
    Slug,
    Excerpt,
    Content,
    ImageUrl,
    Category,
    IsPublished,
    PublishedAt,
    ViewCount,
    AuthorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DonationPrograms {
    Table,
    Id,
    Title,
    Slug,
    Description,
    ImageUrl,
    TargetAmount,
    CollectedAmount,
    IsActive,
    StartsOn,
    EndsOn,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Donations {
    Table,
    Id,
    ProgramId,
    DonorName,
    DonorEmail,
    DonorPhone,
    Amount,
    PaymentMethod,
    Status,
    IsAnonymous,
    Message,
    VerifiedBy,
    VerifiedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    Kind,
    Category,
    Amount,
    Description,
    TransactionDate,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CarouselSlides {
    Table,
    Id,
    Title,
    Subtitle,
    ImageUrl,
    LinkUrl,
    SortOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ActivityLogs {
    Table,
    Id,
    UserId,
    Action,
    Entity,
    EntityId,
    Detail,
    CreatedAt,
}

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

fn timestamp_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_col(Users::Id))
                    .col(ColumnDef::new(Users::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Users::Name).string_len(120).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(20)
                            .not_null()
                            .default("ADMIN"),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::LastLoginAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_col(Users::CreatedAt))
                    .col(timestamp_col(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // news
        manager
            .create_table(
                Table::create()
                    .table(News::Table)
                    .if_not_exists()
                    .col(id_col(News::Id))
                    .col(ColumnDef::new(News::Title).string_len(200).not_null())
                    .col(ColumnDef::new(News::Slug).string_len(120).not_null())
                    .col(ColumnDef::new(News::Excerpt).text().null())
                    .col(ColumnDef::new(News::Content).text().not_null())
                    .col(ColumnDef::new(News::ImageUrl).text().null())
                    .col(ColumnDef::new(News::Category).string_len(50).null())
                    .col(
                        ColumnDef::new(News::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(News::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(News::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(News::AuthorId).big_integer().null())
                    .col(timestamp_col(News::CreatedAt))
                    .col(timestamp_col(News::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_news_author_id")
                            .from(News::Table, News::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_news_slug")
                    .table(News::Table)
                    .col(News::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_news_published")
                    .table(News::Table)
                    .col(News::IsPublished)
                    .col(News::PublishedAt)
                    .to_owned(),
            )
            .await?;

        // donation_programs
        manager
            .create_table(
                Table::create()
                    .table(DonationPrograms::Table)
                    .if_not_exists()
                    .col(id_col(DonationPrograms::Id))
                    .col(
                        ColumnDef::new(DonationPrograms::Title)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationPrograms::Slug)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DonationPrograms::Description).text().null())
                    .col(ColumnDef::new(DonationPrograms::ImageUrl).text().null())
                    .col(
                        ColumnDef::new(DonationPrograms::TargetAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DonationPrograms::CollectedAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DonationPrograms::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(DonationPrograms::StartsOn).date().null())
                    .col(ColumnDef::new(DonationPrograms::EndsOn).date().null())
                    .col(timestamp_col(DonationPrograms::CreatedAt))
                    .col(timestamp_col(DonationPrograms::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_donation_programs_slug")
                    .table(DonationPrograms::Table)
                    .col(DonationPrograms::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // donations
        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .if_not_exists()
                    .col(id_col(Donations::Id))
                    .col(ColumnDef::new(Donations::ProgramId).big_integer().null())
                    .col(
                        ColumnDef::new(Donations::DonorName)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Donations::DonorEmail).string_len(255).null())
                    .col(ColumnDef::new(Donations::DonorPhone).string_len(30).null())
                    .col(ColumnDef::new(Donations::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Donations::PaymentMethod)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Donations::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(Donations::IsAnonymous)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Donations::Message).text().null())
                    .col(ColumnDef::new(Donations::VerifiedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Donations::VerifiedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_col(Donations::CreatedAt))
                    .col(timestamp_col(Donations::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donations_program_id")
                            .from(Donations::Table, Donations::ProgramId)
                            .to(DonationPrograms::Table, DonationPrograms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donations_verified_by")
                            .from(Donations::Table, Donations::VerifiedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_donations_status")
                    .table(Donations::Table)
                    .col(Donations::Status)
                    .to_owned(),
            )
            .await?;

        // transactions
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(id_col(Transactions::Id))
                    .col(ColumnDef::new(Transactions::Kind).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Transactions::Category)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Description).text().null())
                    .col(
                        ColumnDef::new(Transactions::TransactionDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::CreatedBy).big_integer().null())
                    .col(timestamp_col(Transactions::CreatedAt))
                    .col(timestamp_col(Transactions::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_created_by")
                            .from(Transactions::Table, Transactions::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_transactions_date")
                    .table(Transactions::Table)
                    .col(Transactions::TransactionDate)
                    .to_owned(),
            )
            .await?;

        // carousel_slides
        manager
            .create_table(
                Table::create()
                    .table(CarouselSlides::Table)
                    .if_not_exists()
                    .col(id_col(CarouselSlides::Id))
                    .col(
                        ColumnDef::new(CarouselSlides::Title)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CarouselSlides::Subtitle).text().null())
                    .col(ColumnDef::new(CarouselSlides::ImageUrl).text().not_null())
                    .col(ColumnDef::new(CarouselSlides::LinkUrl).text().null())
                    .col(
                        ColumnDef::new(CarouselSlides::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CarouselSlides::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp_col(CarouselSlides::CreatedAt))
                    .col(timestamp_col(CarouselSlides::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // activity_logs
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(id_col(ActivityLogs::Id))
                    .col(ColumnDef::new(ActivityLogs::UserId).big_integer().null())
                    .col(
                        ColumnDef::new(ActivityLogs::Action)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ActivityLogs::Entity)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ActivityLogs::EntityId).big_integer().null())
                    .col(ColumnDef::new(ActivityLogs::Detail).text().null())
                    .col(timestamp_col(ActivityLogs::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_logs_user_id")
                            .from(ActivityLogs::Table, ActivityLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_activity_logs_created_at")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse dependency order; indexes go with their tables.
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CarouselSlides::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DonationPrograms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(News::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}
