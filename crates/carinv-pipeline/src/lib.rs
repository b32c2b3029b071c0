pub mod collector;
pub mod error;
pub mod normalize;
pub mod packages;
pub mod price;
pub mod reconcile;
pub mod report;
pub mod source;
pub mod text;
pub mod timestamp;

pub use collector::{Collector, Completion};
pub use error::{CollectorError, PipelineError};
pub use normalize::ListingNormalizer;
pub use packages::{ClassifiedPackages, PackageClassifier};
pub use report::InventoryReport;
pub use source::{JsonFileSource, ListingSource};
pub use text::DrivetrainAliases;
pub use timestamp::capture_time;
