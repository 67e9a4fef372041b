//! Cargo model.

use serde::{Deserialize, Serialize};

/// Cargo priority. Ordered so that `High < Medium < Low`, which is the
/// order items are packed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CargoPriority {
    High,
    Medium,
    Low,
}

/// Cargo classification. Affects which flights are a good fit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CargoType {
    #[default]
    General,
    /// Needs a temperature-controlled hold.
    Perishable,
    /// Needs a hazmat-certified flight.
    Hazardous,
    /// Any other tag, carried as its bare string.
    #[serde(untagged)]
    Custom(String),
}

/// A cargo item to be loaded onto at most one flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cargo {
    /// Unique cargo identifier.
    pub id: String,
    /// Weight (kg).
    pub weight: f64,
    /// Packing priority.
    pub priority: CargoPriority,
    /// Handling type.
    #[serde(rename = "type", default)]
    pub cargo_type: CargoType,
    /// Flight carrying this item, if any.
    #[serde(default)]
    pub assigned_flight: Option<String>,
    /// Utilization of the carrying flight at assignment time (%).
    #[serde(default)]
    pub efficiency: Option<f64>,
}

impl Cargo {
    /// Creates an unassigned general cargo item.
    pub fn new(id: impl Into<String>, weight: f64, priority: CargoPriority) -> Self {
        Self {
            id: id.into(),
            weight,
            priority,
            cargo_type: CargoType::General,
            assigned_flight: None,
            efficiency: None,
        }
    }

    /// Sets the cargo type.
    pub fn with_type(mut self, cargo_type: CargoType) -> Self {
        self.cargo_type = cargo_type;
        self
    }

    /// Whether the item is currently loaded on a flight.
    pub fn is_assigned(&self) -> bool {
        self.assigned_flight.is_some()
    }

    /// Clears any flight assignment.
    pub fn unassign(&mut self) {
        self.assigned_flight = None;
        self.efficiency = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let mut ps = vec![CargoPriority::Low, CargoPriority::High, CargoPriority::Medium];
        ps.sort();
        assert_eq!(ps, vec![CargoPriority::High, CargoPriority::Medium, CargoPriority::Low]);
    }

    #[test]
    fn test_cargo_builder_and_unassign() {
        let mut c = Cargo::new("C1", 1200.0, CargoPriority::High).with_type(CargoType::Perishable);
        assert_eq!(c.cargo_type, CargoType::Perishable);
        assert!(!c.is_assigned());

        c.assigned_flight = Some("F1".into());
        c.efficiency = Some(24.0);
        assert!(c.is_assigned());

        c.unassign();
        assert!(!c.is_assigned());
        assert_eq!(c.efficiency, None);
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{"id":"C2","weight":300,"priority":"Medium","type":"Hazardous"}"#;
        let c: Cargo = serde_json::from_str(json).unwrap();
        assert_eq!(c.priority, CargoPriority::Medium);
        assert_eq!(c.cargo_type, CargoType::Hazardous);
        assert_eq!(c.assigned_flight, None);
    }

    #[test]
    fn test_type_tags_round_trip_as_strings() {
        let tags = [
            ("General", CargoType::General),
            ("Perishable", CargoType::Perishable),
            ("Hazardous", CargoType::Hazardous),
            ("Fragile", CargoType::Custom("Fragile".into())),
        ];
        for (tag, expected) in tags {
            let json = format!(r#"{{"id":"C9","weight":10,"priority":"Low","type":"{tag}"}}"#);
            let c: Cargo = serde_json::from_str(&json).unwrap();
            assert_eq!(c.cargo_type, expected);
            let value = serde_json::to_value(&c).unwrap();
            assert_eq!(value["type"], tag);
        }
        let c: Cargo = serde_json::from_str(r#"{"id":"C0","weight":1,"priority":"High"}"#).unwrap();
        assert_eq!(c.cargo_type, CargoType::General);
    }
}
