use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PurchaseItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

impl PurchaseItem {
    /// Backend-computed line total when present, otherwise price × quantity.
    pub fn line_total(&self) -> f64 {
        self.total
            .unwrap_or_else(|| self.price * f64::from(self.quantity))
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Purchase {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub store: String,
    #[serde(default)]
    pub items: Vec<PurchaseItem>,
    #[serde(default)]
    pub admin_fee: f64,
    #[serde(default)]
    pub shipping_fee: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default, alias = "createdAt")]
    pub date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Sale {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub amount: f64,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub date: Option<String>,
}

/// Server-side aggregate of everything bought under one (fuzzy-matched) name.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Item {
    #[serde(rename = "id", alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub total_quantity: f64,
    #[serde(default)]
    pub total_spent: f64,
}

/// A receipt the backend parsed but nobody has saved yet.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ParsedReceipt {
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub items: Vec<ParsedReceiptItem>,
    #[serde(default)]
    pub admin_fee: Option<f64>,
    #[serde(default)]
    pub shipping_fee: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ParsedReceiptItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PurchasePayload {
    pub store: String,
    pub items: Vec<PurchaseItem>,
    pub admin_fee: f64,
    pub shipping_fee: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SalePayload {
    pub amount: f64,
    pub channel: String,
    pub note: String,
    pub date: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MatchingStatus {
    #[serde(default)]
    pub processed: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub done: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ResyncStatus {
    #[serde(default, rename = "inProgress")]
    pub in_progress: bool,
    #[serde(default)]
    pub processed: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub totals: Totals,
    #[serde(default)]
    pub top_item: Option<TopItem>,
    #[serde(default)]
    pub comparison: Option<Comparison>,
    #[serde(default)]
    pub trends: Trends,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Totals {
    pub spent: Option<f64>,
    pub gained: Option<f64>,
    pub net_gain: Option<f64>,
    pub shipping_fee: Option<f64>,
    pub admin_fee: Option<f64>,
    pub items_bought: Option<f64>,
    pub sales_count: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TopItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Comparison {
    #[serde(default)]
    pub this_month: MonthFigures,
    #[serde(default)]
    pub last_month: MonthFigures,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct MonthFigures {
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub gained: f64,
    #[serde(default)]
    pub net_gain: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Trends {
    #[serde(default)]
    pub data: Vec<TrendPoint>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub gained: f64,
    #[serde(default)]
    pub items: f64,
}

/// The receipt parser answers with either a single draft or a list of them.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
        Nothing(Option<()>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(list) => list,
        OneOrMany::One(single) => vec![single],
        OneOrMany::Nothing(_) => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct UploadShape {
        #[serde(default, deserialize_with = "one_or_many")]
        parsed: Vec<ParsedReceipt>,
    }

    #[test]
    fn purchase_accepts_mongo_identifiers() {
        let purchase: Purchase = serde_json::from_value(json!({
            "_id": "abc",
            "store": "Tokopedia",
            "items": [{ "name": "Cable", "price": 15000, "quantity": 2 }],
            "admin_fee": 1000,
            "shipping_fee": 9000,
            "total": 40000,
            "date": "2024-05-01T00:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(purchase.id, "abc");
        assert_eq!(purchase.items[0].line_total(), 30_000.0);
    }

    #[test]
    fn line_total_prefers_backend_value() {
        let item = PurchaseItem {
            name: "Bag".into(),
            price: 10.0,
            quantity: 3,
            total: Some(25.0),
        };
        assert_eq!(item.line_total(), 25.0);
    }

    #[test]
    fn parsed_receipts_accept_single_object_or_list() {
        let single: UploadShape =
            serde_json::from_value(json!({ "parsed": { "store": "Shopee", "items": [] } }))
                .unwrap();
        assert_eq!(single.parsed.len(), 1);

        let many: UploadShape =
            serde_json::from_value(json!({ "parsed": [{ "items": [] }, { "items": [] }] }))
                .unwrap();
        assert_eq!(many.parsed.len(), 2);

        let none: UploadShape = serde_json::from_value(json!({ "parsed": null })).unwrap();
        assert!(none.parsed.is_empty());
    }

    #[test]
    fn resync_status_reads_camel_case_flag() {
        let status: ResyncStatus =
            serde_json::from_value(json!({ "inProgress": true, "processed": 3, "total": 9 }))
                .unwrap();
        assert!(status.in_progress);
        assert_eq!(status.total, 9);
    }
}
