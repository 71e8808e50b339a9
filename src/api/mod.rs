pub mod football;

pub use football::FootballApiClient;
