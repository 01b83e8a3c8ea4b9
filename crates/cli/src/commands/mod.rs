pub mod crawl;
pub mod generate;
pub mod serve;
