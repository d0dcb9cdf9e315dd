//! Customer profile as returned by the commerce backend and kept in session.
//!
//! Field names follow the backend's camelCase JSON so the stored `customer`
//! value stays readable by every other storefront component.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trottperf_core::{Email, PhoneNumber, Price};

/// The authenticated customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    /// Backend customer ID.
    pub id: String,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<Email>,
    /// Phone number as entered.
    #[serde(default)]
    pub phone: Option<String>,
    /// Newsletter opt-in.
    #[serde(default)]
    pub accepts_marketing: bool,
    /// Default shipping address.
    #[serde(default)]
    pub default_address: Option<Address>,
    /// Most recent orders, newest first.
    #[serde(default)]
    pub orders: Vec<OrderReference>,
}

impl CustomerProfile {
    /// Create a profile with only an ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            accepts_marketing: false,
            default_address: None,
            orders: Vec::new(),
        }
    }

    /// Get the customer's full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (non_blank(self.first_name.as_deref()), non_blank(self.last_name.as_deref())) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.to_owned(),
            (None, None) => String::new(),
        }
    }

    /// Name shown in the account menu: full name, else email local part,
    /// else "Client".
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = self.full_name();
        if !full.is_empty() {
            return full;
        }
        self.email
            .as_ref()
            .map_or_else(|| "Client".to_string(), |e| e.local_part().to_owned())
    }

    /// Phone number formatted for display, if it parses.
    #[must_use]
    pub fn phone_display(&self) -> Option<String> {
        self.phone
            .as_deref()
            .and_then(|p| PhoneNumber::parse(p).ok())
            .map(|p| p.display_fr())
    }

    /// Number of orders known in the profile.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A customer address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// The address ID.
    pub id: String,
    /// Address line 1.
    #[serde(default)]
    pub address1: Option<String>,
    /// Address line 2.
    #[serde(default)]
    pub address2: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub zip: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
    /// Country code.
    #[serde(default)]
    pub country_code: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

impl Address {
    /// Format the address on one line, French order: street, postcode city,
    /// country.
    #[must_use]
    pub fn formatted_single_line(&self) -> String {
        let town = [self.zip.as_deref(), self.city.as_deref()]
            .into_iter()
            .filter_map(non_blank)
            .collect::<Vec<_>>()
            .join(" ");

        [
            non_blank(self.address1.as_deref()),
            non_blank(self.address2.as_deref()),
            non_blank(Some(town.as_str())),
            non_blank(self.country.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Reference to a past order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReference {
    /// Backend order ID.
    pub id: String,
    /// Human-facing order number.
    pub order_number: i64,
    /// When the order was placed.
    pub processed_at: DateTime<Utc>,
    /// Order total.
    #[serde(default)]
    pub total_price: Option<Price>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_minimal_profile_deserializes() {
        let customer: CustomerProfile = serde_json::from_value(json!({
            "id": "c1",
            "firstName": "A",
            "lastName": "B",
            "email": "a@b.com"
        }))
        .unwrap();

        assert_eq!(customer.id, "c1");
        assert_eq!(customer.full_name(), "A B");
        assert!(!customer.accepts_marketing);
        assert!(customer.orders.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let customer: CustomerProfile = serde_json::from_value(json!({
            "id": "c1",
            "tags": ["vip"],
            "numberOfOrders": "3"
        }))
        .unwrap();
        assert_eq!(customer, CustomerProfile::new("c1"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut customer = CustomerProfile::new("c1");
        customer.first_name = Some("Léa".to_string());
        customer.accepts_marketing = true;

        let value = serde_json::to_value(&customer).unwrap();
        assert_eq!(value["firstName"], "Léa");
        assert_eq!(value["acceptsMarketing"], true);
        assert!(value.get("first_name").is_none());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut customer = CustomerProfile::new("c1");
        assert_eq!(customer.display_name(), "Client");

        customer.email = Some(Email::parse("lea@trottperf.fr").unwrap());
        assert_eq!(customer.display_name(), "lea");

        customer.last_name = Some("Martin".to_string());
        customer.first_name = Some("  ".to_string());
        assert_eq!(customer.display_name(), "Martin");
    }

    #[test]
    fn test_phone_display() {
        let mut customer = CustomerProfile::new("c1");
        customer.phone = Some("+33612345678".to_string());
        assert_eq!(customer.phone_display().as_deref(), Some("+33 6 12 34 56 78"));

        customer.phone = Some("n/a".to_string());
        assert_eq!(customer.phone_display(), None);
    }

    #[test]
    fn test_orders_with_totals() {
        let customer: CustomerProfile = serde_json::from_value(json!({
            "id": "c1",
            "orders": [{
                "id": "gid://order/1",
                "orderNumber": 1042,
                "processedAt": "2026-03-14T10:30:00Z",
                "totalPrice": {"amount": "1299.00", "currencyCode": "EUR"}
            }]
        }))
        .unwrap();

        assert_eq!(customer.order_count(), 1);
        let order = customer.orders.first().unwrap();
        assert_eq!(order.order_number, 1042);
        assert_eq!(
            order.total_price.unwrap().display_fr(),
            "1\u{202F}299,00\u{A0}€"
        );
    }

    #[test]
    fn test_address_single_line() {
        let address = Address {
            id: "a1".to_string(),
            address1: Some("12 rue des Lilas".to_string()),
            address2: None,
            city: Some("Lyon".to_string()),
            zip: Some("69003".to_string()),
            country: Some("France".to_string()),
            country_code: Some("FR".to_string()),
            phone: None,
        };
        assert_eq!(
            address.formatted_single_line(),
            "12 rue des Lilas, 69003 Lyon, France"
        );
    }
}
