//! Seat inventory validation.
//!
//! Builds (create) or merges (update) a requested seat configuration against
//! the flight's per-class capacity. Every resolved class satisfies
//! `0 <= booked <= total <= capacity` with a finite, non-negative price, and
//! economy always keeps at least one seat.

use serde::{Deserialize, Serialize};

use crate::models::{SeatCapacities, SeatClass, SeatClassState, SeatMap};

/// Requested values for one seat class. Every field is optional so the same
/// shape serves both creation and partial updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatClassRequest {
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub booked: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Requested seat configuration, one optional entry per class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatRequest {
    #[serde(default)]
    pub economy: Option<SeatClassRequest>,
    #[serde(default)]
    pub business: Option<SeatClassRequest>,
    #[serde(default)]
    pub first: Option<SeatClassRequest>,
}

impl SeatRequest {
    pub fn get(&self, class: SeatClass) -> Option<&SeatClassRequest> {
        match class {
            SeatClass::Economy => self.economy.as_ref(),
            SeatClass::Business => self.business.as_ref(),
            SeatClass::First => self.first.as_ref(),
        }
    }
}

/// Seat configuration failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeatInventoryError {
    #[error("{class} seats are required")]
    MissingRequiredClass { class: SeatClass },

    #[error("{class} total seats are required")]
    MissingTotal { class: SeatClass },

    #[error("{class} {field} cannot be negative (got {value})")]
    NegativeCount {
        class: SeatClass,
        field: &'static str,
        value: i64,
    },

    #[error("economy class must offer at least one seat")]
    EmptyEconomy,

    #[error("No {class} class is available on this flight")]
    ClassUnavailable { class: SeatClass },

    #[error("We only have {capacity} {class} seats available but {requested} were requested")]
    CapacityExceeded {
        class: SeatClass,
        requested: u64,
        capacity: u32,
    },

    #[error("{class} booked ({booked}) cannot exceed total ({total})")]
    OverbookedClass {
        class: SeatClass,
        booked: u64,
        total: u64,
    },

    #[error("{class} seat price is required and must be a non-negative number")]
    InvalidPrice { class: SeatClass, price: Option<f64> },
}

pub type SeatInventoryResult<T> = Result<T, SeatInventoryError>;

fn non_negative(class: SeatClass, field: &'static str, value: i64) -> SeatInventoryResult<u64> {
    u64::try_from(value).map_err(|_| SeatInventoryError::NegativeCount {
        class,
        field,
        value,
    })
}

/// Bound checks shared by both modes, in reporting order.
fn resolve_class(
    class: SeatClass,
    total: i64,
    booked: i64,
    price: Option<f64>,
    capacity: Option<u32>,
) -> SeatInventoryResult<SeatClassState> {
    let total = non_negative(class, "total", total)?;
    let booked = non_negative(class, "booked", booked)?;

    if booked > total {
        return Err(SeatInventoryError::OverbookedClass {
            class,
            booked,
            total,
        });
    }

    let capacity = capacity.ok_or(SeatInventoryError::ClassUnavailable { class })?;
    if total > u64::from(capacity) {
        return Err(SeatInventoryError::CapacityExceeded {
            class,
            requested: total,
            capacity,
        });
    }

    if class == SeatClass::Economy && total == 0 {
        return Err(SeatInventoryError::EmptyEconomy);
    }

    let price = match price {
        Some(p) if p.is_finite() && p >= 0.0 => p,
        other => return Err(SeatInventoryError::InvalidPrice { class, price: other }),
    };

    // total <= capacity and booked <= total, so both fit in u32.
    Ok(SeatClassState {
        total: total as u32,
        booked: booked as u32,
        price,
    })
}

fn build_class(
    class: SeatClass,
    request: &SeatClassRequest,
    capacities: &SeatCapacities,
) -> SeatInventoryResult<SeatClassState> {
    let total = request
        .total
        .ok_or(SeatInventoryError::MissingTotal { class })?;
    resolve_class(
        class,
        total,
        request.booked.unwrap_or(0),
        request.price,
        capacities.for_class(class),
    )
}

/// Resolve a seat configuration for a new schedule.
///
/// Economy is mandatory; business and first are skipped when absent.
pub fn build_seat_config(
    requested: &SeatRequest,
    capacities: &SeatCapacities,
) -> SeatInventoryResult<SeatMap> {
    let economy_request = requested
        .economy
        .as_ref()
        .ok_or(SeatInventoryError::MissingRequiredClass {
            class: SeatClass::Economy,
        })?;
    let economy = build_class(SeatClass::Economy, economy_request, capacities)?;

    let business = requested
        .business
        .as_ref()
        .map(|r| build_class(SeatClass::Business, r, capacities))
        .transpose()?;
    let first = requested
        .first
        .as_ref()
        .map(|r| build_class(SeatClass::First, r, capacities))
        .transpose()?;

    Ok(SeatMap {
        economy,
        business,
        first,
    })
}

/// Merge requested changes into an existing seat configuration.
///
/// Each class present in the request takes the requested value per field and
/// falls back to the stored one. Classes absent from the request are kept
/// as they are.
pub fn merge_seat_config(
    requested: &SeatRequest,
    capacities: &SeatCapacities,
    existing: &SeatMap,
) -> SeatInventoryResult<SeatMap> {
    let mut merged = *existing;

    for class in SeatClass::ALL {
        let Some(request) = requested.get(class) else {
            continue;
        };

        let capacity = capacities
            .for_class(class)
            .ok_or(SeatInventoryError::ClassUnavailable { class })?;
        let current = existing.get(class);

        let total = request
            .total
            .or_else(|| current.map(|c| i64::from(c.total)))
            .ok_or(SeatInventoryError::MissingTotal { class })?;
        let booked = request
            .booked
            .or_else(|| current.map(|c| i64::from(c.booked)))
            .unwrap_or(0);
        let price = request.price.or_else(|| current.map(|c| c.price));

        let state = resolve_class(class, total, booked, price, Some(capacity))?;
        merged.set(class, state);
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatCapacity;
    use proptest::prelude::*;

    fn capacities() -> SeatCapacities {
        SeatCapacities {
            economy: SeatCapacity { total: 80 },
            business: Some(SeatCapacity { total: 20 }),
            first: None,
        }
    }

    fn class_req(total: Option<i64>, booked: Option<i64>, price: Option<f64>) -> SeatClassRequest {
        SeatClassRequest {
            total,
            booked,
            price,
        }
    }

    fn economy_only(total: i64, price: f64) -> SeatRequest {
        SeatRequest {
            economy: Some(class_req(Some(total), None, Some(price))),
            ..Default::default()
        }
    }

    fn existing() -> SeatMap {
        SeatMap {
            economy: SeatClassState {
                total: 60,
                booked: 12,
                price: 99.0,
            },
            business: Some(SeatClassState {
                total: 10,
                booked: 4,
                price: 450.0,
            }),
            first: None,
        }
    }

    #[test]
    fn test_build_resolves_defaults() {
        let seats = build_seat_config(&economy_only(50, 120.0), &capacities()).unwrap();
        assert_eq!(
            seats.economy,
            SeatClassState {
                total: 50,
                booked: 0,
                price: 120.0
            }
        );
        assert!(seats.business.is_none());
        assert!(seats.first.is_none());
    }

    #[test]
    fn test_build_requires_economy() {
        let request = SeatRequest {
            business: Some(class_req(Some(5), None, Some(300.0))),
            ..Default::default()
        };
        assert_eq!(
            build_seat_config(&request, &capacities()),
            Err(SeatInventoryError::MissingRequiredClass {
                class: SeatClass::Economy
            })
        );
    }

    #[test]
    fn test_build_rejects_empty_economy() {
        assert_eq!(
            build_seat_config(&economy_only(0, 10.0), &capacities()),
            Err(SeatInventoryError::EmptyEconomy)
        );
    }

    #[test]
    fn test_build_rejects_capacity_overflow() {
        assert_eq!(
            build_seat_config(&economy_only(100, 50.0), &capacities()),
            Err(SeatInventoryError::CapacityExceeded {
                class: SeatClass::Economy,
                requested: 100,
                capacity: 80
            })
        );
    }

    #[test]
    fn test_build_rejects_unoffered_class() {
        let mut request = economy_only(50, 50.0);
        request.first = Some(class_req(Some(2), None, Some(2000.0)));
        assert_eq!(
            build_seat_config(&request, &capacities()),
            Err(SeatInventoryError::ClassUnavailable {
                class: SeatClass::First
            })
        );
    }

    #[test]
    fn test_build_rejects_overbooking_and_bad_values() {
        let overbooked = SeatRequest {
            economy: Some(class_req(Some(10), Some(11), Some(5.0))),
            ..Default::default()
        };
        assert!(matches!(
            build_seat_config(&overbooked, &capacities()),
            Err(SeatInventoryError::OverbookedClass {
                booked: 11,
                total: 10,
                ..
            })
        ));

        let negative = SeatRequest {
            economy: Some(class_req(Some(-1), None, Some(5.0))),
            ..Default::default()
        };
        assert!(matches!(
            build_seat_config(&negative, &capacities()),
            Err(SeatInventoryError::NegativeCount { field: "total", .. })
        ));

        let no_total = SeatRequest {
            economy: Some(class_req(None, None, Some(5.0))),
            ..Default::default()
        };
        assert_eq!(
            build_seat_config(&no_total, &capacities()),
            Err(SeatInventoryError::MissingTotal {
                class: SeatClass::Economy
            })
        );
    }

    #[test]
    fn test_build_rejects_invalid_price() {
        for price in [None, Some(-0.01), Some(f64::NAN), Some(f64::INFINITY)] {
            let request = SeatRequest {
                economy: Some(class_req(Some(10), None, price)),
                ..Default::default()
            };
            assert!(matches!(
                build_seat_config(&request, &capacities()),
                Err(SeatInventoryError::InvalidPrice { .. })
            ));
        }
    }

    #[test]
    fn test_merge_updates_only_requested_class() {
        let request = SeatRequest {
            business: Some(class_req(Some(18), None, None)),
            ..Default::default()
        };
        let merged = merge_seat_config(&request, &capacities(), &existing()).unwrap();

        assert_eq!(merged.economy, existing().economy);
        assert_eq!(
            merged.business,
            Some(SeatClassState {
                total: 18,
                booked: 4,
                price: 450.0
            })
        );
    }

    #[test]
    fn test_merge_cannot_shrink_below_bookings() {
        let request = SeatRequest {
            economy: Some(class_req(Some(11), None, None)),
            ..Default::default()
        };
        assert!(matches!(
            merge_seat_config(&request, &capacities(), &existing()),
            Err(SeatInventoryError::OverbookedClass {
                booked: 12,
                total: 11,
                ..
            })
        ));
    }

    #[test]
    fn test_merge_rejects_zero_economy() {
        let mut seats = existing();
        seats.economy.booked = 0;
        let request = SeatRequest {
            economy: Some(class_req(Some(0), None, None)),
            ..Default::default()
        };
        assert_eq!(
            merge_seat_config(&request, &capacities(), &seats),
            Err(SeatInventoryError::EmptyEconomy)
        );
    }

    #[test]
    fn test_merge_new_class_needs_total_and_price() {
        let caps = SeatCapacities {
            first: Some(SeatCapacity { total: 8 }),
            ..capacities()
        };

        let no_price = SeatRequest {
            first: Some(class_req(Some(4), None, None)),
            ..Default::default()
        };
        assert!(matches!(
            merge_seat_config(&no_price, &caps, &existing()),
            Err(SeatInventoryError::InvalidPrice { price: None, .. })
        ));

        let complete = SeatRequest {
            first: Some(class_req(Some(4), None, Some(2500.0))),
            ..Default::default()
        };
        let merged = merge_seat_config(&complete, &caps, &existing()).unwrap();
        assert_eq!(merged.first.map(|s| s.total), Some(4));
        assert_eq!(merged.business, existing().business);
    }

    #[test]
    fn test_merge_rejects_unoffered_class() {
        let request = SeatRequest {
            first: Some(class_req(Some(1), None, Some(1.0))),
            ..Default::default()
        };
        assert_eq!(
            merge_seat_config(&request, &capacities(), &existing()),
            Err(SeatInventoryError::ClassUnavailable {
                class: SeatClass::First
            })
        );
    }

    proptest! {
        #[test]
        fn prop_merge_preserves_untouched_classes(
            total in 0i64..=20,
            price in 0.0f64..10_000.0,
        ) {
            let request = SeatRequest {
                business: Some(class_req(Some(total), Some(0), Some(price))),
                ..Default::default()
            };
            let merged = merge_seat_config(&request, &capacities(), &existing()).unwrap();
            prop_assert_eq!(merged.economy, existing().economy);
            prop_assert_eq!(merged.first, existing().first);
        }

        #[test]
        fn prop_resolved_classes_respect_bounds(
            total in -5i64..120,
            booked in -5i64..120,
        ) {
            let request = SeatRequest {
                economy: Some(class_req(Some(total), Some(booked), Some(10.0))),
                ..Default::default()
            };
            if let Ok(seats) = build_seat_config(&request, &capacities()) {
                prop_assert!(seats.economy.booked <= seats.economy.total);
                prop_assert!(seats.economy.total <= 80);
                prop_assert!(seats.economy.total > 0);
            }
        }
    }
}
