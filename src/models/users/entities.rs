use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Student, // 学生
    Admin,   // 管理员
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const ADMIN: &'static str = "admin";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn student_roles() -> &'static [&'static UserRole] {
        &[&Self::Student]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Student, &Self::Admin]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::ADMIN => Ok(UserRole::Admin),
            _ => Err(serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, admin"
            ))),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::ADMIN => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

define_label_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub enum Gender {
        Male => "Male",
        Female => "Female",
    }
}

// 学生实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct Student {
    pub id: i64,
    pub user_id: i64,
    pub program_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub gender: Gender,
    pub contact_number: String,
    pub date_of_birth: chrono::NaiveDate,
    pub address: String,
    pub city_address: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) if !middle.is_empty() => {
                format!("{} {} {}", self.first_name, middle, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

// 管理员实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct Admin {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: chrono::NaiveDate,
    pub email: String,
}

/// 已认证的调用方
///
/// 由 RequireJWT 解析后放入请求扩展，并显式传入各业务调用。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct Principal {
    pub user_id: i64,
    pub role: UserRole,
    /// 学生或管理员 ID，取决于 role
    pub account_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Principal {
    pub fn from_student(student: &Student) -> Self {
        Self {
            user_id: student.user_id,
            role: UserRole::Student,
            account_id: student.id,
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
        }
    }

    pub fn from_admin(admin: &Admin) -> Self {
        Self {
            user_id: admin.user_id,
            role: UserRole::Admin,
            account_id: admin.id,
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            email: admin.email.clone(),
        }
    }

    /// 学生 ID（非学生返回 None）
    pub fn student_id(&self) -> Option<i64> {
        (self.role == UserRole::Student).then_some(self.account_id)
    }
}

// 登录身份
#[derive(Debug, Clone)]
pub enum Identity {
    Student(Student),
    Admin(Admin),
}

impl Identity {
    pub fn principal(&self) -> Principal {
        match self {
            Identity::Student(student) => Principal::from_student(student),
            Identity::Admin(admin) => Principal::from_admin(admin),
        }
    }
}
