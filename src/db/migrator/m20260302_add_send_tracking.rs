use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserTemplates::UserTemplateId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserTemplates::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(UserTemplates::TemplateId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserTemplates::FirstSentAt)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserTemplates::LastSentAt)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_templates_user")
                            .from(UserTemplates::Table, UserTemplates::UserId)
                            .to(Users::Table, Users::UserId)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_templates_template")
                            .from(UserTemplates::Table, UserTemplates::TemplateId)
                            .to(Templates::Table, Templates::TemplateId)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Upserts target this pair
        manager
            .create_index(
                Index::create()
                    .name("idx_user_templates_pair")
                    .table(UserTemplates::Table)
                    .col(UserTemplates::UserId)
                    .col(UserTemplates::TemplateId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SentEmails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SentEmails::EmailId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SentEmails::TemplateId).integer().not_null())
                    .col(ColumnDef::new(SentEmails::TemplateName).string().not_null())
                    .col(
                        ColumnDef::new(SentEmails::RecipientsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SentEmails::SuccessCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SentEmails::FailedCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SentEmails::SentAt).string().not_null())
                    .col(ColumnDef::new(SentEmails::CompletedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sent_emails_sent_at")
                    .table(SentEmails::Table)
                    .col(SentEmails::SentAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SentEmails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserTemplates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserTemplates {
    Table,
    UserTemplateId,
    UserId,
    TemplateId,
    FirstSentAt,
    LastSentAt,
}

#[derive(Iden)]
enum Users {
    Table,
    UserId,
}

#[derive(Iden)]
enum Templates {
    Table,
    TemplateId,
}

#[derive(Iden)]
enum SentEmails {
    Table,
    EmailId,
    TemplateId,
    TemplateName,
    RecipientsCount,
    SuccessCount,
    FailedCount,
    SentAt,
    CompletedAt,
}
