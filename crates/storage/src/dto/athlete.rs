use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Metrics;

/// Request payload for creating a new athlete
///
/// Every field is optional at the type level so that a missing field is
/// reported as a validation failure rather than a deserialization one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAthleteRequest {
    #[validate(
        required(message = "firstName is required"),
        length(min = 1, message = "firstName must not be empty")
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "lastName is required"),
        length(min = 1, message = "lastName must not be empty")
    )]
    pub last_name: Option<String>,

    #[validate(
        required(message = "sport is required"),
        length(min = 1, message = "sport must not be empty")
    )]
    pub sport: Option<String>,

    #[validate(
        required(message = "age is required"),
        range(min = 0, message = "age must be a non-negative integer")
    )]
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Option<i32>,

    pub avatar_url: Option<String>,
    pub video_url: Option<String>,
    pub team: Option<String>,
    pub metrics: Option<Metrics>,
}

/// Partial update. Omitted (or null) fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAthleteRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub sport: Option<String>,

    #[validate(range(min = 0, message = "age must be a non-negative integer"))]
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Option<i32>,

    pub avatar_url: Option<String>,
    pub video_url: Option<String>,
    pub team: Option<String>,
    pub metrics: Option<Metrics>,
}

/// Accepts any JSON number with no fractional part (`17` and `17.0` alike).
fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    struct AgeVisitor;

    impl<'de> de::Visitor<'de> for AgeVisitor {
        type Value = Option<i32>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("age as a whole number")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            i32::try_from(v)
                .map(Some)
                .map_err(|_| E::custom("age is out of range"))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i32::try_from(v)
                .map(Some)
                .map_err(|_| E::custom("age is out of range"))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
                return Err(E::custom("age must be a whole number"));
            }
            Ok(Some(v as i32))
        }
    }

    deserializer.deserialize_option(AgeVisitor)
}
