pub mod error;
pub mod extract;
pub mod harvester;
pub mod models;
pub mod random;
pub mod sequential;
pub mod slug;
pub mod store;
#[cfg(test)]
pub mod testutil;
pub mod traits;

pub use error::AppError;
pub use harvester::{HarvestEvent, HarvestReporter, Harvester, NullReporter, TracingHarvestReporter};
pub use models::{Alphabet, Enumeration, FetchedContent, HarvestSummary, HarvesterConfig};
pub use random::RandomHarvester;
pub use sequential::SequentialHarvester;
pub use store::FsContentStore;
pub use traits::{ContentStore, Fetcher, ResourceLocator};
