//! Reference data: districts and carriers.
//!
//! Loaded once per session and immutable afterwards. A reload builds a
//! fresh value and swaps it in, so controllers holding the old `Arc` keep a
//! consistent snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Carrier, District, DroppingPoint};

/// Error returned when the server sends two entries with the same name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate {kind}: {name}")]
pub struct DuplicateName {
    pub kind: &'static str,
    pub name: String,
}

/// Build a name → position index, rejecting duplicates.
fn index_by_name<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, usize>, DuplicateName> {
    let mut index = HashMap::new();
    for (i, name) in names.enumerate() {
        if index.insert(name.to_string(), i).is_some() {
            return Err(DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(index)
}

/// Districts in server order, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct Districts {
    list: Vec<District>,
    by_name: HashMap<String, usize>,
}

impl Districts {
    /// Build the set, failing on duplicate names.
    pub fn new(list: Vec<District>) -> Result<Self, DuplicateName> {
        let by_name = index_by_name("district", list.iter().map(District::name))?;
        Ok(Self { list, by_name })
    }

    pub fn get(&self, name: &str) -> Option<&District> {
        self.by_name.get(name).map(|&i| &self.list[i])
    }

    /// Dropping points of a district; empty when the district is unknown.
    pub fn dropping_points(&self, name: &str) -> &[DroppingPoint] {
        self.get(name)
            .map(District::dropping_points)
            .unwrap_or(&[])
    }

    /// Selector options in server order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.list.iter().map(District::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &District> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Carriers in server order, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct Carriers {
    list: Vec<Carrier>,
    by_name: HashMap<String, usize>,
}

impl Carriers {
    /// Build the set, failing on duplicate names.
    pub fn new(list: Vec<Carrier>) -> Result<Self, DuplicateName> {
        let by_name = index_by_name("carrier", list.iter().map(|c| c.name.as_str()))?;
        Ok(Self { list, by_name })
    }

    pub fn get(&self, name: &str) -> Option<&Carrier> {
        self.by_name.get(name).map(|&i| &self.list[i])
    }

    /// Selector labels in server order, e.g. `Hanif (Rating: 4.0⭐)`.
    pub fn labels(&self) -> Vec<String> {
        self.list.iter().map(Carrier::label).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Carrier> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Session-wide reference data.
///
/// Districts and carriers are loaded independently; either may be empty
/// if its load failed.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCache {
    districts: Arc<Districts>,
    carriers: Arc<Carriers>,
}

impl ReferenceCache {
    pub fn new(districts: Districts, carriers: Carriers) -> Self {
        Self {
            districts: Arc::new(districts),
            carriers: Arc::new(carriers),
        }
    }

    pub fn districts(&self) -> &Districts {
        &self.districts
    }

    pub fn carriers(&self) -> &Carriers {
        &self.carriers
    }

    /// Replace the district set. On error the current set is kept.
    pub fn replace_districts(&mut self, list: Vec<District>) -> Result<usize, DuplicateName> {
        let districts = Districts::new(list)?;
        let count = districts.len();
        self.districts = Arc::new(districts);
        Ok(count)
    }

    /// Replace the carrier set. On error the current set is kept.
    pub fn replace_carriers(&mut self, list: Vec<Carrier>) -> Result<usize, DuplicateName> {
        let carriers = Carriers::new(list)?;
        let count = carriers.len();
        self.carriers = Arc::new(carriers);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_RATING, Fare};

    fn district(name: &str, points: &[(&str, f64)]) -> District {
        District::new(
            name,
            points
                .iter()
                .map(|(n, p)| DroppingPoint::new(*n, Fare::new(*p).unwrap()).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn lookup_by_name() {
        let districts = Districts::new(vec![
            district("Dhaka", &[("Gabtoli", 50.0), ("Kamalapur", 30.0)]),
            district("Chittagong", &[]),
        ])
        .unwrap();

        assert_eq!(districts.len(), 2);
        assert_eq!(districts.dropping_points("Dhaka").len(), 2);
        assert!(districts.dropping_points("Chittagong").is_empty());
        assert!(districts.dropping_points("Atlantis").is_empty());
        assert_eq!(districts.names().collect::<Vec<_>>(), ["Dhaka", "Chittagong"]);
    }

    #[test]
    fn duplicate_district_rejected() {
        let err = Districts::new(vec![district("Dhaka", &[]), district("Dhaka", &[])]).unwrap_err();
        assert_eq!(err.to_string(), "duplicate district: Dhaka");
    }

    #[test]
    fn duplicate_carrier_rejected() {
        let err = Carriers::new(vec![
            Carrier::new("Hanif", DEFAULT_RATING),
            Carrier::new("Hanif", DEFAULT_RATING),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "duplicate carrier: Hanif");
    }

    #[test]
    fn failed_replace_keeps_previous_set() {
        let mut cache = ReferenceCache::default();
        assert_eq!(cache.replace_districts(vec![district("Dhaka", &[])]), Ok(1));

        let result = cache.replace_districts(vec![district("Sylhet", &[]), district("Sylhet", &[])]);
        assert!(result.is_err());
        assert!(cache.districts().get("Dhaka").is_some());
        assert!(cache.districts().get("Sylhet").is_none());
    }

    #[test]
    fn sets_replace_independently() {
        let mut cache = ReferenceCache::default();
        cache
            .replace_carriers(vec![Carrier::new("Hanif", DEFAULT_RATING)])
            .unwrap();
        assert!(cache.districts().is_empty());
        assert_eq!(cache.carriers().labels(), ["Hanif (Rating: 4.0⭐)"]);
    }
}
