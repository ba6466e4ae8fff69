pub mod errors;
pub mod product;

pub use product::{fields_from_value, next_id, parse_id, DeleteAck, Product, ProductFields, ID_KEY};
