use chrono::NaiveDate;

use crate::error::FormError;
use crate::models::{ParsedReceipt, Purchase, PurchaseItem, PurchasePayload, Sale, SalePayload};

pub const DEFAULT_STORE: &str = "Shopee";
pub const DEFAULT_CHANNEL: &str = "Shopee";

/// One editable line of the purchase form. Fields stay as typed text until submit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemRow {
    pub name: String,
    pub price: String,
    pub quantity: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemField {
    Name,
    Price,
    Quantity,
}

impl ItemRow {
    fn parsed(&self) -> Option<PurchaseItem> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        let price = parse_amount(&self.price)?;
        let quantity = self.quantity.trim().parse::<u32>().ok()?;
        if price < 0.0 || quantity == 0 {
            return None;
        }
        Some(PurchaseItem {
            name: name.to_string(),
            price,
            quantity,
            total: None,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PurchaseForm {
    pub store: String,
    pub rows: Vec<ItemRow>,
    pub admin_fee: String,
    pub shipping_fee: String,
}

impl Default for PurchaseForm {
    fn default() -> Self {
        Self {
            store: DEFAULT_STORE.to_string(),
            rows: vec![ItemRow::default()],
            admin_fee: "0".to_string(),
            shipping_fee: "0".to_string(),
        }
    }
}

impl PurchaseForm {
    pub fn from_purchase(purchase: &Purchase) -> Self {
        let mut rows: Vec<ItemRow> = purchase
            .items
            .iter()
            .map(|item| ItemRow {
                name: item.name.clone(),
                price: format_number(item.price),
                quantity: item.quantity.to_string(),
            })
            .collect();
        if rows.is_empty() {
            rows.push(ItemRow::default());
        }
        Self {
            store: purchase.store.clone(),
            rows,
            admin_fee: format_number(purchase.admin_fee),
            shipping_fee: format_number(purchase.shipping_fee),
        }
    }

    pub fn from_receipt(receipt: &ParsedReceipt) -> Self {
        let mut rows: Vec<ItemRow> = receipt
            .items
            .iter()
            .map(|item| ItemRow {
                name: item.name.clone(),
                price: item.price.map(format_number).unwrap_or_default(),
                quantity: item.quantity.map(format_number).unwrap_or_default(),
            })
            .collect();
        if rows.is_empty() {
            rows.push(ItemRow::default());
        }
        Self {
            store: receipt
                .store
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STORE.to_string()),
            rows,
            admin_fee: format_number(receipt.admin_fee.unwrap_or(0.0)),
            shipping_fee: format_number(receipt.shipping_fee.unwrap_or(0.0)),
        }
    }

    pub fn add_row(&mut self) {
        self.rows.push(ItemRow::default());
    }

    /// The last remaining row can't be removed.
    pub fn remove_row(&mut self, index: usize) {
        if self.rows.len() > 1 && index < self.rows.len() {
            self.rows.remove(index);
        }
    }

    pub fn set_field(&mut self, index: usize, field: ItemField, value: String) {
        if let Some(row) = self.rows.get_mut(index) {
            match field {
                ItemField::Name => row.name = value,
                ItemField::Price => row.price = value,
                ItemField::Quantity => row.quantity = value,
            }
        }
    }

    /// Rows with every field filled in and parseable. Anything else is dropped on submit.
    pub fn valid_items(&self) -> Vec<PurchaseItem> {
        self.rows.iter().filter_map(ItemRow::parsed).collect()
    }

    /// Σ(price × quantity) over the valid rows plus both fees.
    pub fn total(&self) -> f64 {
        purchase_total(
            &self.valid_items(),
            parse_amount(&self.admin_fee).unwrap_or(0.0),
            parse_amount(&self.shipping_fee).unwrap_or(0.0),
        )
    }

    pub fn to_payload(&self) -> Result<PurchasePayload, FormError> {
        let store = self.store.trim();
        let items = self.valid_items();
        if store.is_empty() || items.is_empty() {
            return Err(FormError::MissingFields);
        }
        let admin_fee = parse_fee(&self.admin_fee, "Admin fee")?;
        let shipping_fee = parse_fee(&self.shipping_fee, "Shipping fee")?;
        Ok(PurchasePayload {
            store: store.to_string(),
            items,
            admin_fee,
            shipping_fee,
        })
    }
}

pub fn purchase_total(items: &[PurchaseItem], admin_fee: f64, shipping_fee: f64) -> f64 {
    let lines: f64 = items
        .iter()
        .map(|item| item.price * f64::from(item.quantity))
        .sum();
    lines + admin_fee + shipping_fee
}

#[derive(Clone, Debug, PartialEq)]
pub struct SaleForm {
    pub amount: String,
    pub channel: String,
    pub note: String,
    pub date: String,
}

impl SaleForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            amount: String::new(),
            channel: DEFAULT_CHANNEL.to_string(),
            note: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn from_sale(sale: &Sale, today: NaiveDate) -> Self {
        let date = sale
            .date
            .as_deref()
            .and_then(date_part)
            .unwrap_or(today);
        Self {
            amount: format_number(sale.amount),
            channel: if sale.channel.trim().is_empty() {
                DEFAULT_CHANNEL.to_string()
            } else {
                sale.channel.clone()
            },
            note: sale.note.clone(),
            date: date.format("%Y-%m-%d").to_string(),
        }
    }

    /// The amount as typed, when it parses. Feeds both the guard-rail and the payload.
    pub fn amount_value(&self) -> Option<f64> {
        parse_amount(&self.amount)
    }

    pub fn to_payload(&self) -> Result<SalePayload, FormError> {
        if self.amount.trim().is_empty() {
            return Err(FormError::MissingFields);
        }
        let amount = self
            .amount_value()
            .ok_or(FormError::InvalidNumber { field: "Amount" })?;
        if amount < 0.0 {
            return Err(FormError::Negative { field: "Amount" });
        }
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDate(self.date.clone()))?;
        Ok(SalePayload {
            amount,
            channel: self.channel.trim().to_string(),
            note: self.note.trim().to_string(),
            date: date.format("%Y-%m-%d").to_string(),
        })
    }
}

/// Leading `YYYY-MM-DD` of an ISO timestamp.
pub fn date_part(raw: &str) -> Option<NaiveDate> {
    let head = raw.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn parse_amount(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

fn parse_fee(raw: &str, field: &'static str) -> Result<f64, FormError> {
    if raw.trim().is_empty() {
        return Ok(0.0);
    }
    let value = parse_amount(raw).ok_or(FormError::InvalidNumber { field })?;
    if value < 0.0 {
        return Err(FormError::Negative { field });
    }
    Ok(value)
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParsedReceiptItem;

    fn row(name: &str, price: &str, quantity: &str) -> ItemRow {
        ItemRow {
            name: name.into(),
            price: price.into(),
            quantity: quantity.into(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn total_sums_lines_and_fees() {
        let form = PurchaseForm {
            store: "Shopee".into(),
            rows: vec![row("Cable", "15000", "2"), row("Case", "20000.5", "1")],
            admin_fee: "1000".into(),
            shipping_fee: "9000".into(),
        };
        assert_eq!(form.total(), 30_000.0 + 20_000.5 + 1_000.0 + 9_000.0);
    }

    #[test]
    fn incomplete_rows_are_filtered_before_totalling() {
        let form = PurchaseForm {
            store: "Shopee".into(),
            rows: vec![row("", "100", "1"), row("Pen", "", "2"), row("Ink", "50", "x")],
            admin_fee: "5".into(),
            shipping_fee: "".into(),
        };
        assert!(form.valid_items().is_empty());
        assert_eq!(form.total(), 5.0);
        assert_eq!(form.to_payload(), Err(FormError::MissingFields));
    }

    #[test]
    fn blank_store_is_refused() {
        let form = PurchaseForm {
            store: "   ".into(),
            rows: vec![row("Pen", "100", "1")],
            ..PurchaseForm::default()
        };
        assert_eq!(form.to_payload(), Err(FormError::MissingFields));
    }

    #[test]
    fn payload_keeps_only_valid_rows() {
        let form = PurchaseForm {
            store: " Tokopedia ".into(),
            rows: vec![row("Pen", "100", "3"), row("", "", "")],
            admin_fee: "".into(),
            shipping_fee: "2500".into(),
        };
        let payload = form.to_payload().unwrap();
        assert_eq!(payload.store, "Tokopedia");
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.admin_fee, 0.0);
        assert_eq!(payload.shipping_fee, 2500.0);
    }

    #[test]
    fn negative_fee_is_rejected() {
        let form = PurchaseForm {
            rows: vec![row("Pen", "100", "3")],
            admin_fee: "-1".into(),
            ..PurchaseForm::default()
        };
        assert_eq!(
            form.to_payload(),
            Err(FormError::Negative { field: "Admin fee" })
        );
    }

    #[test]
    fn last_row_cannot_be_removed() {
        let mut form = PurchaseForm::default();
        form.remove_row(0);
        assert_eq!(form.rows.len(), 1);
        form.add_row();
        form.set_field(1, ItemField::Name, "Tape".into());
        form.remove_row(0);
        assert_eq!(form.rows[0].name, "Tape");
    }

    #[test]
    fn receipt_prefill_falls_back_to_defaults() {
        let receipt = ParsedReceipt {
            store: None,
            items: vec![ParsedReceiptItem {
                name: "Soap".into(),
                price: Some(12000.0),
                quantity: Some(2.0),
            }],
            admin_fee: None,
            shipping_fee: Some(8000.0),
        };
        let form = PurchaseForm::from_receipt(&receipt);
        assert_eq!(form.store, DEFAULT_STORE);
        assert_eq!(form.rows[0].price, "12000");
        assert_eq!(form.rows[0].quantity, "2");
        assert_eq!(form.admin_fee, "0");
        assert_eq!(form.total(), 32_000.0);
    }

    #[test]
    fn sale_form_prefills_from_timestamp() {
        let sale = Sale {
            id: "s1".into(),
            amount: 75000.0,
            channel: String::new(),
            note: "bulk".into(),
            date: Some("2024-03-09T10:00:00.000Z".into()),
        };
        let form = SaleForm::from_sale(&sale, today());
        assert_eq!(form.date, "2024-03-09");
        assert_eq!(form.channel, DEFAULT_CHANNEL);
        assert_eq!(form.amount, "75000");
    }

    #[test]
    fn sale_payload_validates_amount_and_date() {
        let mut form = SaleForm::new(today());
        assert_eq!(form.to_payload(), Err(FormError::MissingFields));

        form.amount = "abc".into();
        assert_eq!(
            form.to_payload(),
            Err(FormError::InvalidNumber { field: "Amount" })
        );

        form.amount = "50000".into();
        form.date = "2024-13-01".into();
        assert!(matches!(form.to_payload(), Err(FormError::InvalidDate(_))));

        form.date = "2024-06-15".into();
        let payload = form.to_payload().unwrap();
        assert_eq!(payload.amount, 50_000.0);
        assert_eq!(payload.date, "2024-06-15");
    }
}
