use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// Name of the identifier key inside a serialized product.
pub const ID_KEY: &str = "id";

/// Caller-supplied product data. Keys and values are opaque to the store.
pub type ProductFields = Map<String, Value>;

/// A stored product: a store-assigned `id` plus whatever fields the caller
/// provided (title, price, stock, ...), flattened next to it on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    #[serde(flatten)]
    pub fields: ProductFields,
}

impl Product {
    /// Build a record from caller fields. Any `id` key among the fields is
    /// dropped so the assigned one always wins.
    pub fn new(id: u64, fields: ProductFields) -> Self {
        let fields = fields.into_iter().filter(|(key, _)| key != ID_KEY).collect();
        Self { id, fields }
    }

    /// Overwrite the fields present in `fields`, keep the rest. `id` is never touched.
    pub fn merge(&mut self, fields: ProductFields) {
        for (key, value) in fields {
            if key == ID_KEY {
                continue;
            }
            self.fields.insert(key, value);
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Next identifier for a collection: highest existing id plus one, or 1 when empty.
/// Fails once the highest id is `u64::MAX`.
pub fn next_id(products: &[Product]) -> Result<u64, ModelError> {
    match products.iter().map(|p| p.id).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(ModelError::IdSpaceExhausted(max)),
    }
}

/// Convert an arbitrary JSON value into product fields.
pub fn fields_from_value(value: Value) -> Result<ProductFields, ModelError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ModelError::NotAnObject(kind_of(&other).to_string())),
    }
}

/// Parse a positive product id from text.
pub fn parse_id(raw: &str) -> Result<u64, ModelError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ModelError::InvalidId(raw.to_string())),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Acknowledgment returned by a successful delete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub success: bool,
    pub message: String,
}

impl DeleteAck {
    pub fn deleted() -> Self {
        Self { success: true, message: "Product deleted".into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> ProductFields {
        fields_from_value(value).expect("object")
    }

    #[test]
    fn new_drops_caller_supplied_id() {
        let p = Product::new(7, fields(json!({"id": 99, "title": "Zapatilla"})));
        assert_eq!(p.id, 7);
        assert!(p.field(ID_KEY).is_none());
        assert_eq!(p.field("title"), Some(&json!("Zapatilla")));
    }

    #[test]
    fn merge_overwrites_only_given_fields() {
        let mut p = Product::new(1, fields(json!({"title": "A", "price": 10, "stock": 5})));
        p.merge(fields(json!({"price": 500, "id": 42, "code": "a-1"})));
        assert_eq!(p.id, 1);
        assert_eq!(p.field("title"), Some(&json!("A")));
        assert_eq!(p.field("price"), Some(&json!(500)));
        assert_eq!(p.field("stock"), Some(&json!(5)));
        assert_eq!(p.field("code"), Some(&json!("a-1")));
    }

    #[test]
    fn next_id_uses_max_not_len() {
        assert_eq!(next_id(&[]).unwrap(), 1);
        let products = vec![
            Product::new(3, ProductFields::new()),
            Product::new(1, ProductFields::new()),
        ];
        assert_eq!(next_id(&products).unwrap(), 4);
    }

    #[test]
    fn next_id_refuses_to_wrap() {
        let products = vec![Product::new(u64::MAX, ProductFields::new())];
        assert!(matches!(next_id(&products), Err(ModelError::IdSpaceExhausted(u64::MAX))));
    }

    #[test]
    fn serializes_flat_with_id_first() {
        let p = Product::new(2, fields(json!({"title": "B", "price": 20})));
        let text = serde_json::to_string(&p).unwrap();
        assert_eq!(text, r#"{"id":2,"title":"B","price":20}"#);

        let back: Product = serde_json::from_str(&text).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn rejects_non_object_fields_and_bad_ids() {
        assert!(matches!(fields_from_value(json!([1, 2])), Err(ModelError::NotAnObject(k)) if k == "an array"));
        assert_eq!(parse_id(" 12 ").unwrap(), 12);
        assert!(matches!(parse_id("0"), Err(ModelError::InvalidId(_))));
        assert!(matches!(parse_id("abc"), Err(ModelError::InvalidId(_))));
    }
}
