use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Store-assigned person identifier. Always positive once assigned.
pub type PersonId = u64;

/// A stored person.
///
/// Field order here is the field order of the persisted JSON document.
/// The PascalCase aliases let files written by older deployments load as-is.
/// A body without `id` reads as id 0, which no store ever assigns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default, alias = "Id")]
    pub id: PersonId,
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Age")]
    pub age: i32,
}

/// Create payload. Carries no id: ids are only ever assigned by a store, so
/// an `id` sent by a client is dropped during deserialization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: i32,
}

impl PersonInput {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self { name: name.into(), age }
    }

    /// Attach a store-assigned id, producing an independent record.
    pub fn into_person(self, id: PersonId) -> Person {
        Person { id, name: self.name, age: self.age }
    }
}

impl Person {
    /// Reject an update whose body addresses a different record than the route.
    pub fn ensure_id_matches(&self, route_id: PersonId) -> Result<(), ModelError> {
        if self.id != route_id {
            return Err(ModelError::Validation("ID in route must match ID in body.".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_drops_client_supplied_id() {
        let input: PersonInput = serde_json::from_str(r#"{"id": 42, "name": "Alice", "age": 30}"#).unwrap();
        assert_eq!(input, PersonInput::new("Alice", 30));
        assert_eq!(input.into_person(1).id, 1);
    }

    #[test]
    fn person_serializes_in_stable_field_order() {
        let p = Person { id: 7, name: "Bob".into(), age: 40 };
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"id":7,"name":"Bob","age":40}"#);
    }

    #[test]
    fn person_accepts_pascal_case_documents() {
        let people: Vec<Person> = serde_json::from_str(r#"[{"Id": 3, "Name": "Carol", "Age": 51}]"#).unwrap();
        assert_eq!(people, vec![Person { id: 3, name: "Carol".into(), age: 51 }]);
    }

    #[test]
    fn id_mismatch_is_a_validation_error() {
        let p = Person { id: 2, name: "Dan".into(), age: 20 };
        assert!(p.ensure_id_matches(2).is_ok());
        assert!(matches!(p.ensure_id_matches(3), Err(ModelError::Validation(_))));
    }
}
