// Domain logic. Everything with SQL in it lives under `db`.
pub mod competition;
pub mod game;
pub mod rating;
pub mod standings;
pub mod team;
pub mod types;
