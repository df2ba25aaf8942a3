//! Payment records owned one-to-one by a rental.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{LifecycleError, Money, PaymentId, PaymentStatus, RentalId};

/// Maximum length of a payment method label.
pub const PAYMENT_METHOD_MAX: usize = 64;

/// Validation errors for payment method labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentMethodError {
    /// Method was blank.
    #[error("payment method must not be empty")]
    Empty,
    /// Method exceeds the length limit.
    #[error("payment method must be at most {max} characters")]
    TooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

/// Free-form label for how a payment was made, e.g. `card`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PaymentMethod(String);

impl PaymentMethod {
    /// Trim and check a method label.
    pub fn new(value: impl AsRef<str>) -> Result<Self, PaymentMethodError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PaymentMethodError::Empty);
        }
        if trimmed.chars().count() > PAYMENT_METHOD_MAX {
            return Err(PaymentMethodError::TooLong {
                max: PAYMENT_METHOD_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PaymentMethod {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Payment for a rental.
///
/// Created as an unpaid placeholder alongside its rental and settled in
/// place; there is never more than one payment per rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    id: PaymentId,
    rental_id: RentalId,
    amount: Money,
    method: Option<PaymentMethod>,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
}

/// Stored payment fields used to rehydrate a [`Payment`].
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    /// Stable payment identifier.
    pub id: PaymentId,
    /// Owning rental.
    pub rental_id: RentalId,
    /// Amount due; equals the rental total.
    pub amount: Money,
    /// Set once settled.
    pub method: Option<PaymentMethod>,
    /// Settlement status.
    pub status: PaymentStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Settlement time.
    pub paid_at: Option<DateTime<Utc>>,
}

impl From<PaymentRecord> for Payment {
    fn from(record: PaymentRecord) -> Self {
        Self {
            id: record.id,
            rental_id: record.rental_id,
            amount: record.amount,
            method: record.method,
            status: record.status,
            created_at: record.created_at,
            paid_at: record.paid_at,
        }
    }
}

impl Payment {
    /// The unpaid placeholder created together with a rental.
    pub fn placeholder(
        id: PaymentId,
        rental_id: RentalId,
        amount: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            rental_id,
            amount,
            method: None,
            status: PaymentStatus::Unpaid,
            created_at,
            paid_at: None,
        }
    }

    /// Stable payment identifier.
    pub fn id(&self) -> PaymentId {
        self.id
    }

    /// The rental this payment settles.
    pub fn rental_id(&self) -> RentalId {
        self.rental_id
    }

    /// Amount due, tracking the rental total until paid.
    pub fn amount(&self) -> Money {
        self.amount
    }

    /// How the payment was made; `None` until settled.
    pub fn method(&self) -> Option<&PaymentMethod> {
        self.method.as_ref()
    }

    /// Settlement status.
    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    /// When the placeholder was created with its rental.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When settlement was recorded.
    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at
    }

    /// Whether settlement has been recorded.
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    /// Record settlement with the given method.
    pub fn settle(
        &mut self,
        method: PaymentMethod,
        paid_at: DateTime<Utc>,
    ) -> Result<(), LifecycleError> {
        if self.is_paid() {
            return Err(LifecycleError::AlreadyPaid);
        }
        self.method = Some(method);
        self.status = PaymentStatus::Paid;
        self.paid_at = Some(paid_at);
        Ok(())
    }

    /// Correct the method recorded on a settled payment.
    pub fn correct_method(&mut self, method: PaymentMethod) -> Result<(), LifecycleError> {
        if !self.is_paid() {
            return Err(LifecycleError::NotSettled);
        }
        self.method = Some(method);
        Ok(())
    }

    /// Track a rescheduled rental's new price.
    pub fn reprice(&mut self, amount: Money) -> Result<(), LifecycleError> {
        if self.is_paid() {
            return Err(LifecycleError::AlreadyPaid);
        }
        self.amount = amount;
        Ok(())
    }
}
