pub mod constants;
pub mod cursor;
pub mod data_handle;
pub mod error;
pub mod format;
pub mod header;
pub mod reader;
pub mod record;
pub mod table;

#[doc(hidden)]
pub mod test_support;
