//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.
//!
//! Contains: the user aggregate, age calculation and input validation.
//! Nothing here touches HTTP or the database.

pub mod age;
pub mod user;
pub mod validation;

pub use age::calculate_age;
pub use user::{CreateUser, NewUser, UpdateUser, User, UserResponse};
pub use validation::{parse_date, UserValidator, ValidationError, ValidationErrors};
