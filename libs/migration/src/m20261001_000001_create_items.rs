use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(ItemType::Enum)
                    .values([ItemType::Lost, ItemType::Found])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(pk_uuid(Items::Id))
                    .col(string_len(Items::Title, 200))
                    .col(text(Items::Description))
                    .col(string_len(Items::Location, 200))
                    .col(date(Items::Date))
                    .col(
                        ColumnDef::new(Items::ItemType)
                            .enumeration(ItemType::Enum, [ItemType::Lost, ItemType::Found])
                            .not_null(),
                    )
                    // '' means the report has no photo
                    .col(text(Items::ImageUrl).default(""))
                    .col(json_binary(Items::ClaimRequirements).default("[]"))
                    .col(string_null(Items::Reward))
                    .col(string(Items::UserEmail))
                    .col(json_binary_null(Items::ContactInfo))
                    .col(
                        timestamp_with_time_zone(Items::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing order is (created_at DESC, id DESC)
        manager
            .create_index(
                Index::create()
                    .name("idx_items_created_at_id")
                    .table(Items::Table)
                    .col((Items::CreatedAt, IndexOrder::Desc))
                    .col((Items::Id, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_items_item_type")
                    .table(Items::Table)
                    .col(Items::ItemType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_items_user_email")
                    .table(Items::Table)
                    .col(Items::UserEmail)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ItemType::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Title,
    Description,
    Location,
    Date,
    #[sea_orm(iden = "type")]
    ItemType,
    ImageUrl,
    ClaimRequirements,
    Reward,
    UserEmail,
    ContactInfo,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ItemType {
    #[sea_orm(iden = "item_type")]
    Enum,
    #[sea_orm(iden = "lost")]
    Lost,
    #[sea_orm(iden = "found")]
    Found,
}
