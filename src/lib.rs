//! Movie recommendation API
//!
//! Users register, rate a set of onboarding movies, and receive
//! genre-diversified recommendations sourced from the TMDB catalog and
//! cached in Postgres.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
