mod dataset;
mod load;
mod review;

pub use dataset::{DatasetStats, PlaceAliases, ReviewDataset};
pub use load::{
    load_reviews, load_reviews_from_reader, DatasetError, CITY_COLUMN, PLACE_NAME_COLUMN,
    PLACE_TYPE_COLUMN, REGION_COLUMN,
};
pub use review::{Review, SentimentLabel};
