use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_tables::Programs;

const DEPARTMENT: &str = "College of Computer Studies";

const PROGRAMS: &[(&str, &str, &str)] = &[
    (
        "BSIT",
        "Bachelor of Science in Information Technology",
        "Focuses on the practical application of computing technologies for business and industry.",
    ),
    (
        "BSIS",
        "Bachelor of Science in Information Systems",
        "Focuses on the design and management of information systems within organizations.",
    ),
    (
        "BIT",
        "Bachelor in Industrial Technology",
        "Covers applied technology in computer and industrial settings.",
    ),
    (
        "BSCS",
        "Bachelor of Science in Computer Science",
        "Covers the theory of computation, algorithms and software development.",
    ),
    (
        "BSSE",
        "Bachelor of Science in Software Engineering",
        "Focuses on the systematic design, development and maintenance of software.",
    ),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(Programs::Table).columns([
            Programs::Code,
            Programs::Name,
            Programs::Description,
            Programs::Duration,
            Programs::Department,
            Programs::IsActive,
        ]);

        for (code, name, description) in PROGRAMS {
            insert.values_panic([
                (*code).into(),
                (*name).into(),
                (*description).into(),
                4.into(),
                DEPARTMENT.into(),
                true.into(),
            ]);
        }

        manager.exec_stmt(insert.to_owned()).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let codes: Vec<&str> = PROGRAMS.iter().map(|(code, _, _)| *code).collect();
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Programs::Table)
                    .and_where(Expr::col(Programs::Code).is_in(codes))
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
