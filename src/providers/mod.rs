pub mod caching;
pub mod frankfurter;
pub mod util;
