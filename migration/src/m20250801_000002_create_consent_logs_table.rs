use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // consent_logsテーブル作成（追記専用）
        manager
            .create_table(
                Table::create()
                    .table(ConsentLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConsentLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ConsentLogs::SessionId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConsentLogs::Language)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConsentLogs::Action)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ConsentLogs::ConsentData).json().not_null())
                    .col(
                        ColumnDef::new(ConsentLogs::IpAddress)
                            .string_len(45)
                            .null(),
                    )
                    .col(ColumnDef::new(ConsentLogs::UserAgent).text().null())
                    .col(ColumnDef::new(ConsentLogs::Referrer).text().null())
                    .col(
                        ColumnDef::new(ConsentLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 集計クエリ用インデックス
        manager
            .create_index(
                Index::create()
                    .name("idx_consent_logs_language")
                    .table(ConsentLogs::Table)
                    .col(ConsentLogs::Language)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_consent_logs_created_at")
                    .table(ConsentLogs::Table)
                    .col(ConsentLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_consent_logs_action")
                    .table(ConsentLogs::Table)
                    .col(ConsentLogs::Action)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ConsentLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ConsentLogs {
    Table,
    Id,
    SessionId,
    Language,
    Action,
    ConsentData,
    IpAddress,
    UserAgent,
    Referrer,
    CreatedAt,
}
