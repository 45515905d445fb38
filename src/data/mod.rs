pub mod historical;
pub mod synthetic;
mod table;

pub use table::PriceTable;
