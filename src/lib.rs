pub mod cli;
pub mod config;
pub mod distance;
pub mod error;
pub mod export;
pub mod observer;
pub mod ranker;
pub mod ranking_db;
pub mod search;
pub mod sensor;
pub mod space;
pub mod utils;

pub use config::Opts;
pub use error::{SenseError, ValidationError};
pub use ranker::{RankingVector, rank_file, rank_image};
pub use ranking_db::RankingDatabase;
pub use sensor::{Sensor, SensorBuilder};
pub use space::{ColorSpace, Feature, KeywordImpression};
