pub mod fetcher;
pub mod session;

pub use fetcher::HttpPageFetcher;
pub use session::HttpSessionProvider;
