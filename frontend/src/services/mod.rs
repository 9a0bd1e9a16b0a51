pub mod date_utils;
pub mod dom;
pub mod logging;
pub mod page_ready;

pub use logging::Logger;
pub use page_ready::PageReady;
