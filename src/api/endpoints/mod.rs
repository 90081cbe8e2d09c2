pub mod auth;
pub mod patients;
pub mod treatments;
pub mod users;
pub mod visits;
