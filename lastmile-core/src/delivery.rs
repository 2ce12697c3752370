//! Deliveries, their priority levels and their status state machine.
//!
//! Status changes go through an explicit transition table; an out-of-order
//! change is an error, never silently applied. Parsing a status or priority
//! from text likewise fails on unknown input instead of falling back to a
//! default.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::Coordinate;

/// Identifier for a [`Delivery`].
pub type DeliveryId = u64;

/// Urgency of a delivery, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    /// May be deferred behind everything else.
    Low,
    /// Default urgency.
    Normal,
    /// Preferred over normal traffic.
    High,
    /// Same-day commitment.
    Urgent,
    /// Contractual or medical; always first.
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "LOW",
            Self::Normal => "NORMAL",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
            Self::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

impl FromStr for Priority {
    type Err = DeliveryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "NORMAL" => Ok(Self::Normal),
            "HIGH" => Ok(Self::High),
            "URGENT" => Ok(Self::Urgent),
            "CRITICAL" => Ok(Self::Critical),
            other => Err(DeliveryParseError::UnknownPriority(other.to_owned())),
        }
    }
}

/// Lifecycle state of a delivery.
///
/// The legal transitions form a single forward path with three terminal
/// outcomes, plus cancellation before the parcel leaves the depot:
///
/// ```text
/// PENDING -> ASSIGNED -> IN_TRANSIT -> OUT_FOR_DELIVERY -> DELIVERED
///    |          |                            |           -> FAILED
///    v          v                            |           -> RETURNED
/// CANCELLED  CANCELLED / PENDING (released)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeliveryStatus {
    /// Created, not yet on any route.
    Pending,
    /// Placed on a planned route.
    Assigned,
    /// The owning route has started.
    InTransit,
    /// The driver is en route to this stop.
    OutForDelivery,
    /// Handed over successfully. Terminal.
    Delivered,
    /// Handover attempted and failed. Terminal.
    Failed,
    /// Sent back to the depot. Terminal.
    Returned,
    /// Withdrawn before transit. Terminal.
    Cancelled,
}

impl DeliveryStatus {
    /// Whether the state machine permits moving from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Assigned | Self::Cancelled)
                | (
                    Self::Assigned,
                    Self::InTransit | Self::Pending | Self::Cancelled
                )
                | (Self::InTransit, Self::OutForDelivery)
                | (
                    Self::OutForDelivery,
                    Self::Delivered | Self::Failed | Self::Returned
                )
        )
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Delivered | Self::Failed | Self::Returned | Self::Cancelled
        )
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "PENDING",
            Self::Assigned => "ASSIGNED",
            Self::InTransit => "IN_TRANSIT",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Failed => "FAILED",
            Self::Returned => "RETURNED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

impl FromStr for DeliveryStatus {
    type Err = DeliveryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ASSIGNED" => Ok(Self::Assigned),
            "IN_TRANSIT" => Ok(Self::InTransit),
            "OUT_FOR_DELIVERY" => Ok(Self::OutForDelivery),
            "DELIVERED" => Ok(Self::Delivered),
            "FAILED" => Ok(Self::Failed),
            "RETURNED" => Ok(Self::Returned),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(DeliveryParseError::UnknownStatus(other.to_owned())),
        }
    }
}

/// Errors from parsing delivery statuses or priorities out of text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryParseError {
    /// The input named no known delivery status.
    #[error("unknown delivery status {0:?}")]
    UnknownStatus(String),
    /// The input named no known priority level.
    #[error("unknown priority level {0:?}")]
    UnknownPriority(String),
}

/// A rejected delivery status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid delivery status transition {from} -> {to}")]
pub struct InvalidDeliveryTransition {
    /// Status the delivery was in.
    pub from: DeliveryStatus,
    /// Status the caller attempted to move to.
    pub to: DeliveryStatus,
}

/// A parcel bound for a single destination.
///
/// Identity is the `id`; everything else may evolve. The destination is
/// optional because upstream address resolution can fail; such deliveries
/// are still routed, at a penalty distance. Missing weight or volume counts
/// as zero during capacity checks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delivery {
    /// Unique identifier, fixed at creation.
    pub id: DeliveryId,
    /// Resolved drop-off coordinate, if address resolution succeeded.
    pub destination: Option<Coordinate>,
    /// Package weight in kilograms.
    pub weight_kg: Option<f64>,
    /// Package volume in cubic metres.
    pub volume_m3: Option<f64>,
    /// Urgency level.
    pub priority: Priority,
    /// Current lifecycle state.
    pub status: DeliveryStatus,
}

impl Delivery {
    /// Create a pending delivery.
    #[must_use]
    pub const fn new(
        id: DeliveryId,
        destination: Option<Coordinate>,
        weight_kg: Option<f64>,
        volume_m3: Option<f64>,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            destination,
            weight_kg,
            volume_m3,
            priority,
            status: DeliveryStatus::Pending,
        }
    }

    /// Move the delivery to `next`, enforcing the transition table.
    ///
    /// # Errors
    /// Returns [`InvalidDeliveryTransition`] when the state machine forbids
    /// the change; the delivery is left untouched.
    pub fn advance_to(&mut self, next: DeliveryStatus) -> Result<(), InvalidDeliveryTransition> {
        if !self.status.can_transition_to(next) {
            return Err(InvalidDeliveryTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Whether the delivery may be marked delivered or failed right now.
    #[must_use]
    pub fn can_be_delivered(&self) -> bool {
        self.status == DeliveryStatus::OutForDelivery
    }
}
