//! Domain records
//!
//! Entities owned by the persistence layer. The cache only ever holds
//! serialized copies of these.

use serde::{Deserialize, Serialize};

// == Role ==
/// Account role carried in issued tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

// == User ==
/// Stored account. `password_hash` never leaves the server.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Input for creating a user record.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// == Pet ==
/// Image stored for a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetImage {
    pub id: i64,
    pub url: String,
    pub pet_id: i64,
}

/// Pet record together with its images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub age: i64,
    pub breed: String,
    #[serde(default)]
    pub images: Vec<PetImage>,
}

/// Input for creating a pet record.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub name: String,
    pub kind: String,
    pub age: i64,
    pub breed: String,
    pub image_urls: Vec<String>,
}

/// Field replacement for an existing pet. Images are untouched.
#[derive(Debug, Clone)]
pub struct PetChanges {
    pub name: String,
    pub kind: String,
    pub age: i64,
    pub breed: String,
}

// == Filters ==
/// Query shape of a pet list read.
///
/// Every populated field is an exact-match predicate. Absent fields are
/// skipped on serialization so `{}` and "no filters" produce the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PetFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
}

impl PetFilters {
    /// Returns true when the pet satisfies every populated predicate.
    pub fn matches(&self, pet: &Pet) -> bool {
        self.name.as_ref().map_or(true, |v| *v == pet.name)
            && self.kind.as_ref().map_or(true, |v| *v == pet.kind)
            && self.age.map_or(true, |v| v == pet.age)
            && self.breed.as_ref().map_or(true, |v| *v == pet.breed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buddy() -> Pet {
        Pet {
            id: 1,
            name: "Buddy".to_string(),
            kind: "Dog".to_string(),
            age: 2,
            breed: "Beagle".to_string(),
            images: Vec::new(),
        }
    }

    #[test]
    fn test_pet_serializes_kind_as_type() {
        let json = serde_json::to_value(buddy()).unwrap();
        assert_eq!(json["type"], "Dog");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_image_uses_camel_case() {
        let image = PetImage {
            id: 1,
            url: "a.png".to_string(),
            pet_id: 7,
        };
        let json = serde_json::to_value(image).unwrap();
        assert_eq!(json["petId"], 7);
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        let role: Role = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, Role::User);
        assert!(serde_json::from_str::<Role>("\"ROOT\"").is_err());
    }

    #[test]
    fn test_filters_match() {
        let pet = buddy();
        assert!(PetFilters::default().matches(&pet));

        let dogs = PetFilters {
            kind: Some("Dog".to_string()),
            ..Default::default()
        };
        assert!(dogs.matches(&pet));

        let three = PetFilters {
            age: Some(3),
            ..Default::default()
        };
        assert!(!three.matches(&pet));
    }

    #[test]
    fn test_filters_reject_unknown_fields() {
        let result = serde_json::from_str::<PetFilters>(r#"{"color":"brown"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_filters_serialize_to_empty_object() {
        let json = serde_json::to_string(&PetFilters::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
