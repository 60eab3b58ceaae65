use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(string(Documents::Username))
                    .col(string(Documents::Document))
                    .col(string(Documents::Progress))
                    .col(double(Documents::Percentage))
                    .col(string(Documents::Device))
                    .col(string(Documents::DeviceId))
                    .col(big_integer(Documents::Timestamp))
                    // One reading position per (user, document) pair
                    .primary_key(
                        Index::create()
                            .name("pk_documents")
                            .col(Documents::Username)
                            .col(Documents::Document),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Username,
    Document,
    Progress,
    Percentage,
    Device,
    DeviceId,
    Timestamp,
}
