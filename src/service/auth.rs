// src/service/auth.rs

//! Authorization boundary in front of the service operations.

use std::fmt;

use crate::errors::{DayplanError, Result};
use crate::service::ScheduleId;

/// Identity of the caller, as established by whatever authenticated it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operation a principal asks to perform.
///
/// `owner` is `None` when no schedule with that id exists. Authorizers see
/// such requests too, so a denial looks the same whether or not the id is
/// in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    Create,
    Read {
        id: ScheduleId,
        owner: Option<&'a Principal>,
    },
    AttachDependencies {
        id: ScheduleId,
        owner: Option<&'a Principal>,
    },
}

impl fmt::Display for Action<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create => f.write_str("create schedules"),
            Action::Read { id, .. } => write!(f, "read schedule {id}"),
            Action::AttachDependencies { id, .. } => {
                write!(f, "edit dependencies of schedule {id}")
            }
        }
    }
}

/// Decides whether a principal may perform an action.
///
/// Called before the scheduler runs; the scheduler itself never checks
/// identities.
pub trait Authorizer: Send + Sync {
    fn authorize(&self, principal: &Principal, action: &Action<'_>) -> Result<()>;
}

/// Approves everything. Suitable for single-user tools and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn authorize(&self, _principal: &Principal, _action: &Action<'_>) -> Result<()> {
        Ok(())
    }
}

/// Anyone may create; only the owner may read or edit a schedule.
///
/// Ids with no schedule behind them have no owner and are denied like
/// anyone else's.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerOnly;

impl Authorizer for OwnerOnly {
    fn authorize(&self, principal: &Principal, action: &Action<'_>) -> Result<()> {
        match action {
            Action::Create => Ok(()),
            Action::Read { owner, .. } | Action::AttachDependencies { owner, .. } => {
                match owner {
                    Some(owner) if *owner == principal => Ok(()),
                    _ => Err(DayplanError::Unauthorized {
                        principal: principal.to_string(),
                        action: action.to_string(),
                    }),
                }
            }
        }
    }
}
