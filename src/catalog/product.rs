//! Best Buy 商品记录

use serde::{Deserialize, Deserializer, Serialize};

/// 单条商品记录，字段名与 API 返回一致
///
/// 缺失或为 null 的字段取默认值，单条脏数据不影响整页解析。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub online_availability: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub in_store_availability: bool,
    /// API 返回字符串（"Available" / "SoldOut" / ...），也兼容布尔值
    #[serde(default, deserialize_with = "deserialize_orderable")]
    pub orderable: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

impl Product {
    /// 名称包含片段且线上有货
    pub fn matches(&self, name_contains: &str) -> bool {
        self.name.contains(name_contains) && self.online_availability
    }
}

/// 商品列表响应
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_orderable<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => s.eq_ignore_ascii_case("available"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_record() {
        let json = r#"{
            "name": "NVIDIA GeForce RTX 3080 10GB GDDR6X",
            "onlineAvailability": true,
            "inStoreAvailability": false,
            "orderable": "Available",
            "url": "https://api.bestbuy.com/click/-/6429440/pdp"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.name, "NVIDIA GeForce RTX 3080 10GB GDDR6X");
        assert!(product.online_availability);
        assert!(!product.in_store_availability);
        assert!(product.orderable);
        assert_eq!(product.url, "https://api.bestbuy.com/click/-/6429440/pdp");
    }

    #[test]
    fn test_missing_fields_default() {
        let product: Product = serde_json::from_str(r#"{"orderable": "SoldOut"}"#).unwrap();
        assert!(product.name.is_empty());
        assert!(!product.online_availability);
        assert!(!product.orderable);
    }

    #[test]
    fn test_null_fields_default() {
        let json = r#"{"name": null, "onlineAvailability": null, "inStoreAvailability": null, "orderable": null, "url": null}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product, Product::default());
    }

    #[test]
    fn test_null_record_does_not_hide_other_matches() {
        let json = r#"{"products": [
            {"name": "Some Bundle", "onlineAvailability": null, "inStoreAvailability": true, "orderable": "SoldOut", "url": "https://www.bestbuy.com/site/bundle"},
            {"name": "NVIDIA RTX 3080", "onlineAvailability": true, "inStoreAvailability": null, "orderable": "Available", "url": "https://www.bestbuy.com/site/3080"}
        ]}"#;
        let response: ProductsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.products.len(), 2);

        let matches: Vec<&Product> = response
            .products
            .iter()
            .filter(|p| p.matches("RTX 3080"))
            .collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].url, "https://www.bestbuy.com/site/3080");
    }

    #[test]
    fn test_matches_requires_name_and_online() {
        let mut product = Product {
            name: "NVIDIA RTX 3080".to_string(),
            online_availability: true,
            ..Default::default()
        };
        assert!(product.matches("RTX 3080"));
        assert!(!product.matches("rtx 3080"));

        product.online_availability = false;
        assert!(!product.matches("RTX 3080"));

        product.name = "NVIDIA RTX 3070".to_string();
        product.online_availability = true;
        assert!(!product.matches("RTX 3080"));
    }

    #[test]
    fn test_response_without_products_key() {
        let response: ProductsResponse = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(response.products.is_empty());
        assert_eq!(response.total, Some(0));
    }
}
