use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建专业表
        manager
            .create_table(
                Table::create()
                    .table(Programs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Programs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Programs::Code)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Programs::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Programs::Description).text().null())
                    .col(
                        ColumnDef::new(Programs::Duration)
                            .integer()
                            .not_null()
                            .default(4),
                    )
                    .col(ColumnDef::new(Programs::Department).string().not_null())
                    .col(
                        ColumnDef::new(Programs::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建教师表
        manager
            .create_table(
                Table::create()
                    .table(Professors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Professors::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Professors::FirstName).string().not_null())
                    .col(ColumnDef::new(Professors::LastName).string().not_null())
                    .col(ColumnDef::new(Professors::Room).string().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建课程表（课程代码为主键）
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Code)
                            .string_len(50)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::ProfessorId).big_integer().null())
                    .col(ColumnDef::new(Courses::ProgramId).big_integer().null())
                    .col(ColumnDef::new(Courses::YearLevel).string().not_null())
                    .col(ColumnDef::new(Courses::Semester).string().not_null())
                    .col(ColumnDef::new(Courses::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Courses::Units).integer().not_null())
                    .col(ColumnDef::new(Courses::LecHours).integer().not_null())
                    .col(ColumnDef::new(Courses::LabHours).integer().not_null())
                    .col(ColumnDef::new(Courses::Remarks).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::ProfessorId)
                            .to(Professors::Table, Professors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::ProgramId)
                            .to(Programs::Table, Programs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建先修课程关联表（有向边，不检查环）
        manager
            .create_table(
                Table::create()
                    .table(CoursePrerequisites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoursePrerequisites::CourseCode)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePrerequisites::PrerequisiteCode)
                            .string_len(50)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CoursePrerequisites::CourseCode)
                            .col(CoursePrerequisites::PrerequisiteCode),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CoursePrerequisites::Table, CoursePrerequisites::CourseCode)
                            .to(Courses::Table, Courses::Code)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                CoursePrerequisites::Table,
                                CoursePrerequisites::PrerequisiteCode,
                            )
                            .to(Courses::Table, Courses::Code)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建班级（Section）表
        manager
            .create_table(
                Table::create()
                    .table(Sections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sections::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sections::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Sections::Capacity).integer().not_null())
                    .col(ColumnDef::new(Sections::ProgramId).big_integer().null())
                    .col(ColumnDef::new(Sections::YearLevel).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Sections::Table, Sections::ProgramId)
                            .to(Programs::Table, Programs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Students::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::ProgramId).big_integer().null())
                    .col(ColumnDef::new(Students::FirstName).string_len(50).not_null())
                    .col(ColumnDef::new(Students::LastName).string_len(50).not_null())
                    .col(ColumnDef::new(Students::MiddleName).string_len(50).null())
                    .col(ColumnDef::new(Students::Gender).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Students::ContactNumber)
                            .string_len(15)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Students::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(Students::Address).text().not_null())
                    .col(ColumnDef::new(Students::CityAddress).text().not_null())
                    .col(ColumnDef::new(Students::Email).string().not_null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::ProgramId)
                            .to(Programs::Table, Programs::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建管理员表（ID 由应用层分配，从 20001 开始）
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admins::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Admins::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Admins::FirstName).string_len(50).not_null())
                    .col(ColumnDef::new(Admins::LastName).string_len(50).not_null())
                    .col(ColumnDef::new(Admins::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(Admins::Email).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Admins::Table, Admins::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学年表
        manager
            .create_table(
                Table::create()
                    .table(AcademicYears::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AcademicYears::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AcademicYears::Label)
                            .string_len(9)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课表时段表（MIS 码为主键）
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::MisCode)
                            .string_len(10)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedules::SectionId).big_integer().not_null())
                    .col(ColumnDef::new(Schedules::CourseCode).string_len(50).not_null())
                    .col(ColumnDef::new(Schedules::Day).string_len(10).not_null())
                    .col(ColumnDef::new(Schedules::StartTime).time().not_null())
                    .col(ColumnDef::new(Schedules::EndTime).time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Schedules::Table, Schedules::SectionId)
                            .to(Sections::Table, Sections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Schedules::Table, Schedules::CourseCode)
                            .to(Courses::Table, Courses::Code)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建选课记录表
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::SectionId).big_integer().null())
                    .col(
                        ColumnDef::new(Enrollments::AcademicYearId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollments::YearLevel).string().not_null())
                    .col(ColumnDef::new(Enrollments::Semester).string().not_null())
                    .col(ColumnDef::new(Enrollments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Enrollments::IsRegular)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::SectionId)
                            .to(Sections::Table, Sections::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::AcademicYearId)
                            .to(AcademicYears::Table, AcademicYears::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建选课明细表
        manager
            .create_table(
                Table::create()
                    .table(EnrollDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnrollDetails::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnrollDetails::EnrollmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EnrollDetails::MisCode).string_len(10).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(EnrollDetails::Table, EnrollDetails::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EnrollDetails::Table, EnrollDetails::MisCode)
                            .to(Schedules::Table, Schedules::MisCode)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学业记录表
        manager
            .create_table(
                Table::create()
                    .table(AcademicHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AcademicHistories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AcademicHistories::CourseCode)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicHistories::EnrollmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicHistories::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AcademicHistories::Remark).string_len(20).null())
                    .col(
                        ColumnDef::new(AcademicHistories::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AcademicHistories::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AcademicHistories::Table, AcademicHistories::CourseCode)
                            .to(Courses::Table, Courses::Code)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AcademicHistories::Table, AcademicHistories::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AcademicHistories::Table, AcademicHistories::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 每门课每次选课只允许一条成绩备注（upsert 依赖此索引）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_academic_histories_enrollment_course_student")
                    .table(AcademicHistories::Table)
                    .col(AcademicHistories::EnrollmentId)
                    .col(AcademicHistories::CourseCode)
                    .col(AcademicHistories::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_year_level_semester")
                    .table(Courses::Table)
                    .col(Courses::YearLevel)
                    .col(Courses::Semester)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_schedules_section_id")
                    .table(Schedules::Table)
                    .col(Schedules::SectionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_schedules_course_code")
                    .table(Schedules::Table)
                    .col(Schedules::CourseCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_student_year")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::AcademicYearId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enroll_details_enrollment_id")
                    .table(EnrollDetails::Table)
                    .col(EnrollDetails::EnrollmentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(AcademicHistories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EnrollDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicYears::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sections::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CoursePrerequisites::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Professors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Programs::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Programs {
    #[sea_orm(iden = "programs")]
    Table,
    Id,
    Code,
    Name,
    Description,
    Duration,
    Department,
    IsActive,
}

#[derive(DeriveIden)]
enum Professors {
    #[sea_orm(iden = "professors")]
    Table,
    Id,
    FirstName,
    LastName,
    Room,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Code,
    ProfessorId,
    ProgramId,
    YearLevel,
    Semester,
    Name,
    Units,
    LecHours,
    LabHours,
    Remarks,
}

#[derive(DeriveIden)]
enum CoursePrerequisites {
    #[sea_orm(iden = "course_prerequisites")]
    Table,
    CourseCode,
    PrerequisiteCode,
}

#[derive(DeriveIden)]
enum Sections {
    #[sea_orm(iden = "sections")]
    Table,
    Id,
    Name,
    Capacity,
    ProgramId,
    YearLevel,
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    UserId,
    ProgramId,
    FirstName,
    LastName,
    MiddleName,
    Gender,
    ContactNumber,
    DateOfBirth,
    Address,
    CityAddress,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Admins {
    #[sea_orm(iden = "admins")]
    Table,
    Id,
    UserId,
    FirstName,
    LastName,
    DateOfBirth,
    Email,
}

#[derive(DeriveIden)]
enum AcademicYears {
    #[sea_orm(iden = "academic_years")]
    Table,
    Id,
    Label,
}

#[derive(DeriveIden)]
enum Schedules {
    #[sea_orm(iden = "schedules")]
    Table,
    MisCode,
    SectionId,
    CourseCode,
    Day,
    StartTime,
    EndTime,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    StudentId,
    SectionId,
    AcademicYearId,
    YearLevel,
    Semester,
    Status,
    IsRegular,
    EnrolledAt,
}

#[derive(DeriveIden)]
enum EnrollDetails {
    #[sea_orm(iden = "enroll_details")]
    Table,
    Id,
    EnrollmentId,
    MisCode,
}

#[derive(DeriveIden)]
enum AcademicHistories {
    #[sea_orm(iden = "academic_histories")]
    Table,
    Id,
    CourseCode,
    EnrollmentId,
    StudentId,
    Remark,
    CreatedAt,
    UpdatedAt,
}
