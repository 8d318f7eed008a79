//! Shared domain enumerations aligned with persisted database enums and the
//! wire-level reservation error codes.

use serde::{Deserialize, Serialize, Serializer, de};

/// Sentinel returned when a reservation batch arrives without any items.
pub const NO_PRODUCTS_CODE: &str = "PRODUCT.RESERVE.NO_PRODUCTS";

/// Per-item admission failure codes, in fixed evaluation order.
///
/// The string literals (including the `RESERVATION_TIME_TO_LONG` spelling) are
/// part of the public contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveErrorCode {
    ProductNoId,
    InvalidStartDate,
    InvalidEndDate,
    EndDateBeforeStartDate,
    StartDateInWeekend,
    EndDateInWeekend,
    ReservationTimeTooLong,
    AlreadyReservedInPeriod,
    ProductNotFound,
    ProductNotAvailable,
}

impl ReserveErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReserveErrorCode::ProductNoId => "PRODUCT.RESERVE.PRODUCT_NO_ID",
            ReserveErrorCode::InvalidStartDate => "PRODUCT.RESERVE.PRODUCT_INVALID_STARTDATE",
            ReserveErrorCode::InvalidEndDate => "PRODUCT.RESERVE.PRODUCT_INVALID_ENDDATE",
            ReserveErrorCode::EndDateBeforeStartDate => {
                "PRODUCT.RESERVE.PRODUCT_ENDDATE_BEFORE_STARTDATE"
            }
            ReserveErrorCode::StartDateInWeekend => "PRODUCT.RESERVE.STARTDATE_IN_WEEKEND",
            ReserveErrorCode::EndDateInWeekend => "PRODUCT.RESERVE.ENDDATE_IN_WEEKEND",
            ReserveErrorCode::ReservationTimeTooLong => "PRODUCT.RESERVE.RESERVATION_TIME_TO_LONG",
            ReserveErrorCode::AlreadyReservedInPeriod => {
                "PRODUCT.RESERVE.PRODUCT_ALREADY_RESERVED_IN_PERIOD"
            }
            ReserveErrorCode::ProductNotFound => "PRODUCT.RESERVE.PRODUCT_NOT_FOUND",
            ReserveErrorCode::ProductNotAvailable => "PRODUCT.RESERVE.PRODUCT_NOT_AVAILABLE",
        }
    }
}

impl Serialize for ReserveErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Availability state owned by the product directory.
///
/// The directory is not fully trustworthy: depending on its serializer version
/// it emits either string names or numeric discriminants, so deserialization
/// accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "product_state", rename_all = "snake_case")]
pub enum ProductState {
    Available,
    Unavailable,
    Archived,
}

impl ProductState {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductState::Available => "AVAILABLE",
            ProductState::Unavailable => "UNAVAILABLE",
            ProductState::Archived => "ARCHIVED",
        }
    }
}

impl Serialize for ProductState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProductState {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StateVisitor;

        impl de::Visitor<'_> for StateVisitor {
            type Value = ProductState;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("a product state name or discriminant")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                match value.to_ascii_uppercase().as_str() {
                    "AVAILABLE" => Ok(ProductState::Available),
                    "UNAVAILABLE" => Ok(ProductState::Unavailable),
                    "ARCHIVED" => Ok(ProductState::Archived),
                    other => Err(E::unknown_variant(
                        other,
                        &["AVAILABLE", "UNAVAILABLE", "ARCHIVED"],
                    )),
                }
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                match value {
                    0 => Ok(ProductState::Available),
                    1 => Ok(ProductState::Unavailable),
                    2 => Ok(ProductState::Archived),
                    other => Err(E::invalid_value(
                        de::Unexpected::Unsigned(other),
                        &"a discriminant in 0..=2",
                    )),
                }
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                u64::try_from(value)
                    .map_err(|_| {
                        E::invalid_value(de::Unexpected::Signed(value), &"a discriminant in 0..=2")
                    })
                    .and_then(|unsigned| self.visit_u64(unsigned))
            }
        }

        deserializer.deserialize_any(StateVisitor)
    }
}

/// Tri-state approval lifecycle of a reservation.
///
/// Replaces the nullable boolean the upstream system used; `NotRequired` and
/// `Pending` are distinct states, never conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "approval_state", rename_all = "snake_case")]
pub enum ApprovalState {
    NotRequired,
    Pending,
    Approved,
}

impl ApprovalState {
    /// Derive the admission-time approval state from a directory snapshot.
    pub fn from_requires_approval(requires_approval: bool) -> Self {
        if requires_approval {
            ApprovalState::Pending
        } else {
            ApprovalState::NotRequired
        }
    }
}

/// Entity kind an image blob is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "linked_table_type", rename_all = "snake_case")]
pub enum LinkedTableType {
    Product,
    Category,
}

/// Serde adapter for `YYYY-MM-DD` wire dates.
pub mod date_wire {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};
    use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

    const FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = date.format(FORMAT).map_err(S::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Date::parse(&raw, FORMAT).map_err(D::Error::custom)
    }
}

/// Serde adapter for optional `YYYY-MM-DD` wire dates.
pub mod date_wire_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(
        date: &Option<Date>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => super::date_wire::serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Date>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|value| {
            super::date_wire::deserialize(serde::de::value::StrDeserializer::<D::Error>::new(
                &value,
            ))
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_state_accepts_names_and_discriminants() {
        let by_name: ProductState = serde_json::from_str("\"UNAVAILABLE\"").expect("name");
        let by_number: ProductState = serde_json::from_str("1").expect("number");
        assert_eq!(by_name, ProductState::Unavailable);
        assert_eq!(by_number, ProductState::Unavailable);
    }

    #[test]
    fn product_state_rejects_unknown_discriminant() {
        assert!(serde_json::from_str::<ProductState>("7").is_err());
    }

    #[test]
    fn reserve_error_codes_keep_wire_literals() {
        assert_eq!(
            ReserveErrorCode::ReservationTimeTooLong.as_str(),
            "PRODUCT.RESERVE.RESERVATION_TIME_TO_LONG"
        );
        assert_eq!(
            serde_json::to_string(&ReserveErrorCode::ProductNoId).expect("serialize"),
            "\"PRODUCT.RESERVE.PRODUCT_NO_ID\""
        );
    }

    #[test]
    fn approval_state_derivation() {
        assert_eq!(
            ApprovalState::from_requires_approval(true),
            ApprovalState::Pending
        );
        assert_eq!(
            ApprovalState::from_requires_approval(false),
            ApprovalState::NotRequired
        );
    }
}
