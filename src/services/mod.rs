pub mod catalog;
pub mod credentials;
pub mod genre_cache;
pub mod random;
pub mod recommendations;
pub mod seeder;

pub use catalog::{CatalogProvider, TmdbCatalog};
pub use credentials::CredentialService;
pub use genre_cache::{Clock, GenreCache, SystemClock};
pub use random::{Randomness, ThreadRandomness};
pub use recommendations::RecommendationEngine;
pub use seeder::{MovieSeeder, SeedPlan};
