//! Products Data

use crate::{domain::products::records::ProductUuid, validation::Violations};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub title: String,
    pub description: String,
    pub code: String,
    pub price: u64,
    pub stock: u32,
    pub category: String,
    pub status: bool,
}

impl NewProduct {
    /// Check every field, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns the violations when any field is blank, the price is zero, or
    /// price or stock exceed what storage holds.
    pub fn validate(&self) -> Result<(), Violations> {
        let mut violations = Violations::new();

        violations.require_text("title", &self.title);
        violations.require_text("description", &self.description);
        violations.require_text("code", &self.code);
        violations.require_text("category", &self.category);

        if self.price == 0 {
            violations.push("price", "el precio debe ser mayor a 0");
        }

        violations.check_amount("price", self.price);
        violations.check_count("stock", self.stock);

        violations.into_result()
    }
}

/// Product Update Data
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price: Option<u64>,
    pub stock: Option<u32>,
    pub category: Option<String>,
    pub status: Option<bool>,
}

impl ProductUpdate {
    /// Apply the creation rules to the fields present in the update.
    ///
    /// # Errors
    ///
    /// Returns the violations for every present field that is invalid.
    pub fn validate(&self) -> Result<(), Violations> {
        let mut violations = Violations::new();

        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("code", &self.code),
            ("category", &self.category),
        ] {
            if let Some(value) = value {
                violations.require_text(field, value);
            }
        }

        if self.price == Some(0) {
            violations.push("price", "el precio debe ser mayor a 0");
        }

        if let Some(price) = self.price {
            violations.check_amount("price", price);
        }

        if let Some(stock) = self.stock {
            violations.check_count("stock", stock);
        }

        violations.into_result()
    }
}

/// Price ordering for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSort {
    Asc,
    Desc,
}

impl PriceSort {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Result of deleting one product in a bulk request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductDeletion {
    Deleted,
    NotFound,
    Failed,
}

#[cfg(test)]
mod tests {
    use crate::validation::MAX_COUNT;

    use super::*;

    fn new_product() -> NewProduct {
        NewProduct {
            uuid: ProductUuid::new(),
            title: "Mate".to_string(),
            description: "Calabaza".to_string(),
            code: "MATE-01".to_string(),
            price: 1_500,
            stock: 4,
            category: "bazar".to_string(),
            status: true,
        }
    }

    #[test]
    fn valid_product_passes() {
        assert!(new_product().validate().is_ok());
    }

    #[test]
    fn new_product_reports_all_violations() {
        let product = NewProduct {
            title: String::new(),
            code: " ".to_string(),
            price: 0,
            ..new_product()
        };

        let violations = product.validate().unwrap_err();
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();

        assert_eq!(fields, ["title", "code", "price"]);
    }

    #[test]
    fn update_only_checks_present_fields() {
        assert!(ProductUpdate::default().validate().is_ok());

        let update = ProductUpdate {
            title: Some(String::new()),
            price: Some(0),
            ..ProductUpdate::default()
        };

        assert_eq!(update.validate().unwrap_err().len(), 2);
    }

    #[test]
    fn stock_beyond_integer_column_is_rejected() {
        let product = NewProduct {
            stock: u32::MAX,
            ..new_product()
        };

        let violations = product.validate().unwrap_err();

        assert_eq!(violations.iter().next().unwrap().field, "stock");

        let update = ProductUpdate {
            stock: Some(MAX_COUNT + 1),
            ..ProductUpdate::default()
        };

        assert_eq!(update.validate().unwrap_err().len(), 1);

        let update = ProductUpdate {
            stock: Some(MAX_COUNT),
            ..ProductUpdate::default()
        };

        assert!(update.validate().is_ok());
    }

    #[test]
    fn price_beyond_bigint_column_is_rejected() {
        let product = NewProduct {
            price: u64::MAX,
            ..new_product()
        };

        let violations = product.validate().unwrap_err();

        assert_eq!(violations.iter().next().unwrap().field, "price");
    }
}
