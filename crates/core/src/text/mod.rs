pub mod distance;
pub mod fields;
pub mod normalize;

pub use distance::EditDistanceMatcher;
pub use fields::FieldMatcher;
pub use normalize::TextNormalizer;
