//! EnrollSys：学校选课管理后端
//!
//! 学生与管理员凭 ID 与出生日期登录，系统根据学业记录判定其为新生、常规生或非常规生，
//! 再按学年、学期分配班级或逐门课程选课，由管理员审核后生效。
//!
//! 请求路径：`routes` → `middlewares`（JWT、角色、限流）→ `services` → `engine`
//! （资格判定与分配）→ `storage`（SeaORM，实体见 `entity`）。`cache` 提供
//! Moka / Redis 两种对象缓存，`runtime` 负责启动与关停。

pub mod cache;
pub mod config;
pub mod engine;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
