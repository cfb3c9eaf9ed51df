//! Districts and their dropping points.

use super::{DomainError, Fare};

/// A named stop within a destination district, with its price.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppingPoint {
    pub name: String,
    pub price: Fare,
}

impl DroppingPoint {
    /// Create a dropping point. The name must not be blank.
    pub fn new(name: impl Into<String>, price: Fare) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName("dropping point"));
        }
        Ok(Self { name, price })
    }

    /// Selector label, e.g. `Gabtoli - ৳50`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.price)
    }
}

/// A city/region node in the route network.
///
/// Owns its dropping points in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct District {
    name: String,
    dropping_points: Vec<DroppingPoint>,
}

impl District {
    /// Create a district. The name must not be blank.
    pub fn new(
        name: impl Into<String>,
        dropping_points: Vec<DroppingPoint>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName("district"));
        }
        Ok(Self {
            name,
            dropping_points,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dropping_points(&self) -> &[DroppingPoint] {
        &self.dropping_points
    }
}
