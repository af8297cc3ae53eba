//! Workflow of a payroll's `estado` column.
//!
//! ```text
//! Uninitiated(0) --submit--> Pending(1) --approve--> Approved(2)
//!                               |   ^
//!                         observe   resubmit
//!                               v   |
//!                             Observed(3)
//! ```
//!
//! Transitions are computed here as plain values and written by the caller
//! through the record store, so the same rules drive payrolls and additional
//! payrolls.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::entity::sea_orm_active_enums::PayrollStatus;

#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("cannot {action} a payroll in status {from}")]
    InvalidTransition { action: &'static str, from: PayrollStatus },

    #[error("review status must be 2 (approved) or 3 (observed), got {0}")]
    InvalidReviewStatus(i16),

    #[error("an observation note is required to observe a payroll")]
    MissingObservation,
}

/// Change to the `observaciones` column carried by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum ObservationChange {
    Keep,
    Set(String),
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub to: PayrollStatus,
    pub declared_at: Option<DateTime<FixedOffset>>,
    pub observation: ObservationChange,
}

/// Administrator decision on a pending payroll
#[derive(Debug, Clone, PartialEq)]
pub enum Review {
    Approve,
    Observe(String),
}

impl Review {
    /// Builds a decision from the raw status code sent by the caller.
    pub fn from_request(estado: i16, observaciones: Option<String>) -> Result<Self, TransitionError> {
        match PayrollStatus::from_code(estado) {
            Some(PayrollStatus::Approved) => Ok(Review::Approve),
            Some(PayrollStatus::Observed) => {
                let note = observaciones
                    .map(|n| n.trim().to_owned())
                    .filter(|n| !n.is_empty())
                    .ok_or(TransitionError::MissingObservation)?;

                Ok(Review::Observe(note))
            },
            _ => Err(TransitionError::InvalidReviewStatus(estado)),
        }
    }
}

/// `Uninitiated -> Pending`, stamping the declared date in fund time.
pub fn submit(
    from: PayrollStatus,
    declared_at: DateTime<FixedOffset>,
    tz: &FixedOffset,
) -> Result<Transition, TransitionError> {
    if from != PayrollStatus::Uninitiated {
        return Err(TransitionError::InvalidTransition { action: "submit", from });
    }

    Ok(Transition {
        to: PayrollStatus::Pending,
        declared_at: Some(declared_at.with_timezone(tz)),
        observation: ObservationChange::Keep,
    })
}

/// `Pending -> Approved | Observed`
pub fn review(from: PayrollStatus, decision: Review) -> Result<Transition, TransitionError> {
    if from != PayrollStatus::Pending {
        return Err(TransitionError::InvalidTransition { action: "review", from });
    }

    let transition = match decision {
        Review::Approve => Transition {
            to: PayrollStatus::Approved,
            declared_at: None,
            observation: ObservationChange::Keep,
        },
        Review::Observe(note) => Transition {
            to: PayrollStatus::Observed,
            declared_at: None,
            observation: ObservationChange::Set(note),
        },
    };

    Ok(transition)
}

/// `Observed -> Pending`. The caller must replace the detail set in the same
/// transaction and recompute the aggregates.
pub fn resubmit(from: PayrollStatus) -> Result<Transition, TransitionError> {
    if from != PayrollStatus::Observed {
        return Err(TransitionError::InvalidTransition { action: "correct", from });
    }

    Ok(Transition {
        to: PayrollStatus::Pending,
        declared_at: None,
        observation: ObservationChange::Clear,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn bolivia() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }

    #[test]
    fn test_submit_stamps_local_declared_date() {
        let utc = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 5, 1, 2, 0, 0).unwrap();

        let transition = submit(PayrollStatus::Uninitiated, utc, &bolivia()).unwrap();

        assert_eq!(transition.to, PayrollStatus::Pending);
        let declared = transition.declared_at.unwrap();
        assert_eq!(declared, utc);
        assert_eq!(declared.offset(), &bolivia());
        assert_eq!(declared.date_naive(), chrono::NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
    }

    #[test]
    fn test_submit_only_from_uninitiated() {
        let now = bolivia().with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();

        for from in [PayrollStatus::Pending, PayrollStatus::Approved, PayrollStatus::Observed] {
            assert_eq!(
                submit(from, now, &bolivia()),
                Err(TransitionError::InvalidTransition { action: "submit", from })
            );
        }
    }

    #[test]
    fn test_review_request_codes() {
        assert_eq!(Review::from_request(2, None), Ok(Review::Approve));
        assert_eq!(Review::from_request(3, Some(" missing rows ".into())), Ok(Review::Observe("missing rows".into())));
        assert_eq!(Review::from_request(3, Some("   ".into())), Err(TransitionError::MissingObservation));
        assert_eq!(Review::from_request(3, None), Err(TransitionError::MissingObservation));
        assert_eq!(Review::from_request(1, None), Err(TransitionError::InvalidReviewStatus(1)));
        assert_eq!(Review::from_request(7, None), Err(TransitionError::InvalidReviewStatus(7)));
    }

    #[test]
    fn test_review_from_pending() {
        let approved = review(PayrollStatus::Pending, Review::Approve).unwrap();
        assert_eq!(approved.to, PayrollStatus::Approved);
        assert_eq!(approved.observation, ObservationChange::Keep);

        let observed = review(PayrollStatus::Pending, Review::Observe("wrong CI".into())).unwrap();
        assert_eq!(observed.to, PayrollStatus::Observed);
        assert_eq!(observed.observation, ObservationChange::Set("wrong CI".into()));
    }

    #[test]
    fn test_approved_is_terminal() {
        assert!(review(PayrollStatus::Approved, Review::Observe("late".into())).is_err());
        assert!(resubmit(PayrollStatus::Approved).is_err());
    }

    #[test]
    fn test_resubmit_clears_observation() {
        let transition = resubmit(PayrollStatus::Observed).unwrap();
        assert_eq!(transition.to, PayrollStatus::Pending);
        assert_eq!(transition.observation, ObservationChange::Clear);

        assert_eq!(
            resubmit(PayrollStatus::Pending),
            Err(TransitionError::InvalidTransition { action: "correct", from: PayrollStatus::Pending })
        );
    }
}
