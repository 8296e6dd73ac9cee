//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounts;
pub mod categories;
pub mod expenses;
pub mod sea_orm_active_enums;
pub mod users;
