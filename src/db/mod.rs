pub mod movies;
pub mod postgres;
pub mod ratings;
pub mod users;

pub use movies::{MovieStore, PgMovieStore, RecommendationQuery};
pub use postgres::create_pool;
pub use ratings::{PgRatingStore, RatingStore};
pub use users::UserStore;
