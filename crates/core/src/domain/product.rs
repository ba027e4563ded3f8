use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// Store-assigned identifier, unique across every category of a catalog.
///
/// Ids start at 1. `ProductId(0)` marks a stored record without a usable id.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl ProductId {
    pub fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub name: String,
    /// Styling hint passed through untouched to the storefront.
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductVariant {
    fn into_value(self) -> Value {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(self.name));
        fields.insert("class".to_string(), Value::String(self.class));
        if let Some(image) = self.image {
            fields.insert("image".to_string(), Value::String(image));
        }
        Value::Object(fields)
    }
}

/// A stored catalog record: the store-assigned id plus every other field exactly as
/// it was submitted or found on disk.
///
/// Stored records are decoded leniently. A `price` saved as a number or a variant
/// without `class` stays in `fields` verbatim, and an `id` that is not a positive
/// integer (`null`, `"3"`, `2.5`) stays there too while `id` reads as `ProductId(0)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Product {
    pub id: ProductId,
    /// Never holds `"id"` while `id` is assigned.
    pub fields: Map<String, Value>,
}

impl Product {
    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn price(&self) -> Option<&str> {
        self.text("price")
    }

    pub fn image(&self) -> Option<&str> {
        self.text("image")
    }

    pub fn rating(&self) -> Option<f64> {
        self.fields.get("rating").and_then(Value::as_f64)
    }

    pub fn sizes(&self) -> Option<Vec<&str>> {
        self.fields.get("sizes")?.as_array()?.iter().map(Value::as_str).collect()
    }

    pub fn variants(&self) -> Option<Vec<ProductVariant>> {
        serde_json::from_value(self.fields.get("variants")?.clone()).ok()
    }

    /// Highest id this record may already be known by. Counts ids stored in a
    /// non-integer form, so `"3"` or `2.5` keep new ids above them.
    pub fn claimed_id(&self) -> u64 {
        if self.id.is_assigned() {
            return self.id.0;
        }

        let raw = match self.fields.get("id") {
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        raw.filter(|value| value.is_finite() && *value >= 1.0)
            .map(|value| value.ceil() as u64)
            .unwrap_or(0)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let assigned = self.id.is_assigned();
        let mut map = serializer.serialize_map(Some(self.fields.len() + usize::from(assigned)))?;
        if assigned {
            map.serialize_entry("id", &self.id)?;
        }
        for (key, value) in &self.fields {
            if assigned && key == "id" {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Product {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;

        let id = match fields.get("id").and_then(Value::as_u64) {
            Some(id) if id > 0 => {
                fields.remove("id");
                ProductId(id)
            }
            _ => ProductId::default(),
        };

        Ok(Self { id, fields })
    }
}

/// Caller-supplied product payload. Any `id` the caller sends is read and dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default, skip_serializing)]
    pub id: Option<Value>,
    pub name: String,
    pub price: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<ProductVariant>>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ProductInput {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            price: price.into(),
            image: image.into(),
            rating: None,
            sizes: None,
            variants: None,
            attributes: Map::new(),
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Returns the name of the first required field left blank, if any.
    pub fn first_blank_field(&self) -> Option<&'static str> {
        [("name", &self.name), ("price", &self.price), ("image", &self.image)]
            .into_iter()
            .find_map(|(field, value)| value.trim().is_empty().then_some(field))
    }

    pub fn into_product(self, id: ProductId) -> Product {
        let mut fields = self.attributes;
        fields.remove("id");
        fields.insert("name".to_string(), Value::String(self.name));
        fields.insert("price".to_string(), Value::String(self.price));
        fields.insert("image".to_string(), Value::String(self.image));
        if let Some(rating) = self.rating.and_then(Number::from_f64) {
            fields.insert("rating".to_string(), Value::Number(rating));
        }
        if let Some(sizes) = self.sizes {
            fields.insert("sizes".to_string(), Value::from(sizes));
        }
        if let Some(variants) = self.variants {
            let variants = variants.into_iter().map(ProductVariant::into_value).collect();
            fields.insert("variants".to_string(), Value::Array(variants));
        }

        Product { id, fields }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Product, ProductId, ProductInput};

    #[test]
    fn caller_supplied_id_is_discarded() {
        let input: ProductInput = serde_json::from_value(json!({
            "id": 999,
            "name": "Sandales",
            "price": "7 500",
            "image": "/img/sandales.jpg",
        }))
        .expect("input should decode");

        let product = input.into_product(ProductId(3));
        let encoded = serde_json::to_value(&product).expect("product should encode");

        assert_eq!(encoded["id"], json!(3));
        assert!(!product.fields.contains_key("id"));
    }

    #[test]
    fn unknown_fields_survive_in_stored_record() {
        let input: ProductInput = serde_json::from_value(json!({
            "name": "Montre",
            "price": "25 000",
            "image": "x",
            "badge": "nouveau",
        }))
        .expect("input should decode");

        let product = input.into_product(ProductId(1));
        let encoded = serde_json::to_value(&product).expect("product should encode");

        assert_eq!(encoded["badge"], json!("nouveau"));
        assert!(encoded.get("rating").is_none());
        assert_eq!(product.name(), Some("Montre"));
    }

    #[test]
    fn stored_record_without_id_decodes_as_zero_and_stays_without_id() {
        let record = json!({ "name": "Pagne", "price": "5 000", "image": "x" });

        let product: Product = serde_json::from_value(record.clone()).expect("record decodes");

        assert_eq!(product.id, ProductId(0));
        assert_eq!(product.claimed_id(), 0);
        assert_eq!(serde_json::to_value(&product).expect("encode"), record);
    }

    #[test]
    fn mistyped_stored_fields_are_kept_verbatim() {
        let record = json!({
            "id": 3,
            "name": "Montre",
            "price": 7500,
            "image": "/m.jpg",
            "rating": "4,5",
            "variants": [{ "name": "Or" }],
        });

        let product: Product = serde_json::from_value(record.clone()).expect("record decodes");

        assert_eq!(product.id, ProductId(3));
        assert_eq!(product.price(), None);
        assert_eq!(product.rating(), None);
        assert_eq!(product.variants(), None);
        assert_eq!(serde_json::to_value(&product).expect("encode"), record);
    }

    #[test]
    fn non_integer_ids_are_kept_and_still_claimed() {
        for (raw, claimed) in [(json!("3"), 3), (json!(2.5), 3), (json!(null), 0), (json!(-4), 0)] {
            let record = json!({ "id": raw, "name": "A", "price": "1", "image": "x" });

            let product: Product = serde_json::from_value(record.clone()).expect("record decodes");

            assert_eq!(product.id, ProductId(0), "{raw}");
            assert_eq!(product.claimed_id(), claimed, "{raw}");
            assert_eq!(serde_json::to_value(&product).expect("encode"), record);
        }
    }

    #[test]
    fn typed_views_read_presentation_fields() {
        let mut input = ProductInput::new("Sandales", "15 000", "/s.jpg").with_rating(4.5);
        input.sizes = Some(vec!["38".to_string(), "39".to_string()]);

        let product = input.into_product(ProductId(1));

        assert_eq!(product.price(), Some("15 000"));
        assert_eq!(product.image(), Some("/s.jpg"));
        assert_eq!(product.rating(), Some(4.5));
        assert_eq!(product.sizes(), Some(vec!["38", "39"]));
    }

    #[test]
    fn first_blank_field_reports_missing_price() {
        let input = ProductInput::new("Robe", "  ", "x");
        assert_eq!(input.first_blank_field(), Some("price"));
        assert_eq!(ProductInput::new("Robe", "12 000", "x").first_blank_field(), None);
    }
}
