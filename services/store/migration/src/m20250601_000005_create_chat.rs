use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChatSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatSessions::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChatSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ChatSessions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ChatSessions::Table, ChatSessions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChatTurns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatTurns::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChatTurns::UserId).uuid().not_null())
                    .col(ColumnDef::new(ChatTurns::Role).string_len(16).not_null())
                    .col(ColumnDef::new(ChatTurns::Content).text().not_null())
                    .col(
                        ColumnDef::new(ChatTurns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ChatTurns::Table, ChatTurns::UserId)
                            .to(ChatSessions::Table, ChatSessions::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ChatTurns::Table)
                    .col(ChatTurns::UserId)
                    .col(ChatTurns::Id)
                    .name("idx_chat_turns_user_id_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatTurns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChatSessions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ChatSessions {
    Table,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ChatTurns {
    Table,
    Id,
    UserId,
    Role,
    Content,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
