//! Customer reference data: customers and their addresses.

use chrono::{DateTime, Utc};
use common::{AddressId, CustomerId};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, optional_text, require_text};

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Partial update of a customer; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Customer {
    pub fn create(new: NewCustomer, now: DateTime<Utc>) -> Result<Self, DomainError> {
        require_text("firstName", &new.first_name)?;
        require_text("lastName", &new.last_name)?;
        let email = normalize_email(&new.email)?;

        Ok(Self {
            id: CustomerId::new(),
            first_name: new.first_name.trim().to_string(),
            last_name: new.last_name.trim().to_string(),
            email,
            phone: optional_text(new.phone),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update. Nothing changes if validation fails.
    pub fn apply(&mut self, patch: CustomerPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(first_name) = &patch.first_name {
            require_text("firstName", first_name)?;
        }
        if let Some(last_name) = &patch.last_name {
            require_text("lastName", last_name)?;
        }
        let email = patch.email.as_deref().map(normalize_email).transpose()?;

        if let Some(first_name) = patch.first_name {
            self.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name.trim().to_string();
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = optional_text(Some(phone));
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive match on name or email.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.full_name().to_lowercase().contains(&needle) || self.email.contains(&needle)
    }
}

/// Lowercases and checks the email address has a local part and a domain.
pub fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(DomainError::validation("email", "must be a valid email address")),
    }
}

/// A postal address belonging to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub customer_id: CustomerId,
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for adding an address to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    pub fn create(
        customer_id: CustomerId,
        new: NewAddress,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        require_text("street", &new.street)?;
        require_text("city", &new.city)?;
        require_text("postalCode", &new.postal_code)?;
        require_text("country", &new.country)?;

        Ok(Self {
            id: AddressId::new(),
            customer_id,
            street: new.street.trim().to_string(),
            city: new.city.trim().to_string(),
            state: optional_text(new.state),
            postal_code: new.postal_code.trim().to_string(),
            country: new.country.trim().to_string(),
            is_default: new.is_default,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn new_customer() -> NewCustomer {
        NewCustomer {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: " Ada@Example.COM ".to_string(),
            phone: None,
        }
    }

    #[test]
    fn create_normalizes_email() {
        let customer = Customer::create(new_customer(), now()).unwrap();
        assert_eq!(customer.email, "ada@example.com");
        assert_eq!(customer.full_name(), "Ada Lovelace");
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["", "ada", "@example.com", "ada@localhost"] {
            let result = Customer::create(
                NewCustomer {
                    email: email.to_string(),
                    ..new_customer()
                },
                now(),
            );
            assert!(
                matches!(result, Err(DomainError::Validation { field: "email", .. })),
                "{email}"
            );
        }
    }

    #[test]
    fn apply_leaves_customer_untouched_on_bad_email() {
        let mut customer = Customer::create(new_customer(), now()).unwrap();
        let before = customer.clone();
        let result = customer.apply(
            CustomerPatch {
                first_name: Some("Grace".to_string()),
                email: Some("broken".to_string()),
                ..CustomerPatch::default()
            },
            now(),
        );
        assert!(result.is_err());
        assert_eq!(customer, before);
    }

    #[test]
    fn search_matches_name_and_email() {
        let customer = Customer::create(new_customer(), now()).unwrap();
        assert!(customer.matches_search("lovelace"));
        assert!(customer.matches_search("EXAMPLE.com"));
        assert!(!customer.matches_search("hopper"));
    }

    #[test]
    fn address_requires_postal_fields() {
        let result = Address::create(
            CustomerId::new(),
            NewAddress {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: None,
                postal_code: " ".to_string(),
                country: "US".to_string(),
                is_default: false,
            },
            now(),
        );
        assert!(matches!(
            result,
            Err(DomainError::Validation {
                field: "postalCode",
                ..
            })
        ));
    }
}
