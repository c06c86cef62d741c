//! Chemical inventory records.

pub mod model;
pub mod stock;

pub use model::ChemicalRecord;
pub use stock::StockLevel;
