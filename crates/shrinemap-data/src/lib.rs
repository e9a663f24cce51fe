pub mod error;
pub mod fetch;
pub mod normalize;
pub mod sample;
pub mod types;

pub use error::{DataFetchError, ExclusionReason};
pub use fetch::{build_client, load_features, load_records, DataLoad};
pub use normalize::{compute_center, normalize, normalize_feature};
pub use sample::placeholder_collection;
pub use types::{parse_feature_collection, DisplayRecord, RawFeature};
