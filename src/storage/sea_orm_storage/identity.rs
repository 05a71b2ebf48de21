//! 用户、学生与管理员存储操作

use super::SeaOrmStorage;
use crate::entity::admins::{
    ActiveModel as AdminActiveModel, Column as AdminColumn, Entity as Admins,
};
use crate::entity::students::{
    ActiveModel as StudentActiveModel, Column as StudentColumn, Entity as Students,
};
use crate::entity::users::ActiveModel as UserActiveModel;
use crate::errors::{EnrollSysError, Result};
use crate::models::{
    PageRequest, PaginationInfo,
    users::{
        entities::{Admin, Identity, Student, UserRole},
        requests::{CreateAdminRequest, NewStudent, StudentListQuery},
        responses::StudentListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 注册学生：用户与学生资料在同一事务内创建
    pub async fn create_student_impl(&self, req: NewStudent) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("开启事务失败: {e}")))?;

        let user = UserActiveModel {
            role: Set(UserRole::Student.to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| EnrollSysError::database_operation(format!("创建用户失败: {e}")))?;

        let student = StudentActiveModel {
            user_id: Set(user.id),
            program_id: Set(req.program_id),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            middle_name: Set(req.middle_name),
            gender: Set(req.gender.to_string()),
            contact_number: Set(req.contact_number),
            date_of_birth: Set(req.date_of_birth),
            address: Set(req.address),
            city_address: Set(req.city_address),
            email: Set(req.email),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| EnrollSysError::database_operation(format!("创建学生失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(student.into_student())
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 通过登录用户 ID 获取学生
    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(StudentColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生（性别筛选 + 姓名/ID 搜索）
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let window = PageRequest::new(query.page, query.size);

        let mut select = Students::find();

        if let Some(gender) = query.gender {
            select = select.filter(StudentColumn::Gender.eq(gender.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let trimmed = search.trim();
            let escaped = escape_like_pattern(trimmed);
            let mut condition = Condition::any()
                .add(StudentColumn::FirstName.contains(&escaped))
                .add(StudentColumn::LastName.contains(&escaped));
            if let Ok(id) = trimmed.parse::<i64>() {
                condition = condition.add(StudentColumn::Id.eq(id));
            }
            select = select.filter(condition);
        }

        select = select.order_by_asc(StudentColumn::Id);

        let paginator = select.paginate(&self.db, window.size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学生总数失败: {e}")))?;

        let students = paginator
            .fetch_page(window.zero_based())
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::from_total(window, total),
        })
    }

    /// 创建管理员，ID 取现有最大值 + 1，且不低于起始值
    pub async fn create_admin_impl(&self, req: CreateAdminRequest) -> Result<Admin> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("开启事务失败: {e}")))?;

        let last = Admins::find()
            .order_by_desc(AdminColumn::Id)
            .one(&txn)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询管理员失败: {e}")))?;
        let admin_id = last
            .map(|m| m.id + 1)
            .unwrap_or(self.settings.admin_id_start)
            .max(self.settings.admin_id_start);

        let user = UserActiveModel {
            role: Set(UserRole::Admin.to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| EnrollSysError::database_operation(format!("创建用户失败: {e}")))?;

        let admin = AdminActiveModel {
            id: Set(admin_id),
            user_id: Set(user.id),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            date_of_birth: Set(req.date_of_birth),
            email: Set(req.email),
        }
        .insert(&txn)
        .await
        .map_err(|e| EnrollSysError::database_operation(format!("创建管理员失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(admin.into_admin())
    }

    /// 通过 ID 获取管理员
    pub async fn get_admin_by_id_impl(&self, id: i64) -> Result<Option<Admin>> {
        let result = Admins::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询管理员失败: {e}")))?;

        Ok(result.map(|m| m.into_admin()))
    }

    /// 通过登录用户 ID 获取管理员
    pub async fn get_admin_by_user_id_impl(&self, user_id: i64) -> Result<Option<Admin>> {
        let result = Admins::find()
            .filter(AdminColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询管理员失败: {e}")))?;

        Ok(result.map(|m| m.into_admin()))
    }

    /// 管理员数量
    pub async fn count_admins_impl(&self) -> Result<u64> {
        Admins::find()
            .count(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询管理员数量失败: {e}")))
    }

    /// 登录身份查找：先匹配学生，再匹配管理员
    pub async fn find_identity_impl(
        &self,
        id: i64,
        date_of_birth: chrono::NaiveDate,
    ) -> Result<Option<Identity>> {
        let student = Students::find_by_id(id)
            .filter(StudentColumn::DateOfBirth.eq(date_of_birth))
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询学生失败: {e}")))?;
        if let Some(student) = student {
            return Ok(Some(Identity::Student(student.into_student())));
        }

        let admin = Admins::find_by_id(id)
            .filter(AdminColumn::DateOfBirth.eq(date_of_birth))
            .one(&self.db)
            .await
            .map_err(|e| EnrollSysError::database_operation(format!("查询管理员失败: {e}")))?;

        Ok(admin.map(|m| Identity::Admin(m.into_admin())))
    }
}
