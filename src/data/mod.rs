pub mod loader;
pub mod table;

pub use loader::load;
pub use table::{RecordTable, Value};
