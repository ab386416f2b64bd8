pub mod company_scraper;
pub mod fetcher;
pub mod glassdoor_extractor;
pub mod google_scraper;
pub mod normalizer;
pub mod tsv_export;

pub use company_scraper::*;
pub use fetcher::*;
pub use glassdoor_extractor::*;
pub use google_scraper::*;
pub use normalizer::*;
pub use tsv_export::*;
