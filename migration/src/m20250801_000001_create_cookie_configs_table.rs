use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // cookie_configsテーブル作成
        manager
            .create_table(
                Table::create()
                    .table(CookieConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CookieConfigs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CookieConfigs::Language)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CookieConfigs::Country)
                            .string_len(10)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CookieConfigs::Region)
                            .string_len(50)
                            .null(),
                    )
                    .col(ColumnDef::new(CookieConfigs::Texts).json().not_null())
                    .col(ColumnDef::new(CookieConfigs::Categories).json().not_null())
                    .col(ColumnDef::new(CookieConfigs::Ui).json().not_null())
                    .col(
                        ColumnDef::new(CookieConfigs::CookieSettings)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CookieConfigs::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CookieConfigs::Version)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CookieConfigs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CookieConfigs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CookieConfigs::UpdatedBy)
                            .string_len(100)
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 言語での検索用インデックス（enabledとの複合）
        manager
            .create_index(
                Index::create()
                    .name("idx_cookie_configs_language_enabled")
                    .table(CookieConfigs::Table)
                    .col(CookieConfigs::Language)
                    .col(CookieConfigs::Enabled)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CookieConfigs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CookieConfigs {
    Table,
    Id,
    Language,
    Country,
    Region,
    Texts,
    Categories,
    Ui,
    CookieSettings,
    Enabled,
    Version,
    CreatedAt,
    UpdatedAt,
    UpdatedBy,
}
