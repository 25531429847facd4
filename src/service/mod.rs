// src/service/mod.rs

//! In-memory schedule service.
//!
//! Wraps [`ScheduleBuilder`] with the operations callers need around it:
//! - create a schedule (title, horizon, strategy, tasks, optional dependencies)
//! - attach or replace the dependency map of an existing schedule
//! - read the current state, or every revision
//!
//! Each stored schedule keeps a list of [`Revision`]s so earlier assignments
//! stay auditable after dependencies change. Dependency edits for the same
//! schedule are serialized by a per-record lock; different schedules do not
//! contend.

pub mod auth;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info, warn};

use crate::errors::{DayplanError, Result};
use crate::schedule::{Schedule, ScheduleBuilder};
use crate::types::{DependencyMap, Task};

pub use auth::{Action, AllowAll, Authorizer, OwnerOnly, Principal};

/// Opaque identifier handed out by [`ScheduleService::create`].
pub type ScheduleId = u64;

/// Input for [`ScheduleService::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSchedule {
    pub title: String,
    pub num_days: i64,
    pub strategy: String,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub dependencies: DependencyMap,
}

/// One computed state of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Starts at 1 and increases by one per accepted dependency change.
    pub version: u64,
    pub dependencies: DependencyMap,
    pub schedule: Schedule,
}

/// Read view of a stored schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub id: ScheduleId,
    pub title: String,
    pub num_days: i64,
    pub strategy: String,
    pub tasks: Vec<Task>,
    pub dependencies: DependencyMap,
    pub schedule: Schedule,
    pub version: u64,
}

#[derive(Debug)]
struct ScheduleRecord {
    id: ScheduleId,
    owner: Principal,
    title: String,
    num_days: i64,
    strategy: String,
    tasks: Vec<Task>,
    /// Never empty: a record is only stored after its first successful build.
    revisions: Vec<Revision>,
}

impl ScheduleRecord {
    fn current(&self) -> Result<&Revision> {
        self.revisions.last().ok_or_else(|| {
            DayplanError::InternalConsistency(format!("schedule {} has no revisions", self.id))
        })
    }

    fn snapshot(&self) -> Result<ScheduleSnapshot> {
        let current = self.current()?;
        Ok(ScheduleSnapshot {
            id: self.id,
            title: self.title.clone(),
            num_days: self.num_days,
            strategy: self.strategy.clone(),
            tasks: self.tasks.clone(),
            dependencies: current.dependencies.clone(),
            schedule: current.schedule.clone(),
            version: current.version,
        })
    }
}

/// Schedule store plus authorization in front of the scheduling pipeline.
pub struct ScheduleService<A: Authorizer = AllowAll> {
    builder: ScheduleBuilder,
    authorizer: A,
    records: RwLock<HashMap<ScheduleId, Arc<Mutex<ScheduleRecord>>>>,
    next_id: AtomicU64,
}

impl ScheduleService<AllowAll> {
    pub fn new(builder: ScheduleBuilder) -> Self {
        Self::with_authorizer(builder, AllowAll)
    }
}

impl<A: Authorizer> ScheduleService<A> {
    pub fn with_authorizer(builder: ScheduleBuilder, authorizer: A) -> Self {
        Self {
            builder,
            authorizer,
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn builder(&self) -> &ScheduleBuilder {
        &self.builder
    }

    /// Build a new schedule and store it.
    ///
    /// Nothing is stored when the build fails.
    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateSchedule,
    ) -> Result<(ScheduleId, Schedule)> {
        self.authorizer.authorize(principal, &Action::Create)?;

        let schedule = self
            .builder
            .build(
                &request.tasks,
                &request.dependencies,
                request.num_days,
                &request.strategy,
            )
            .inspect_err(|e| {
                warn!(title = %request.title, error = %e, "schedule creation rejected");
            })?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = ScheduleRecord {
            id,
            owner: principal.clone(),
            title: request.title,
            num_days: request.num_days,
            strategy: request.strategy,
            tasks: request.tasks,
            revisions: vec![Revision {
                version: 1,
                dependencies: request.dependencies,
                schedule: schedule.clone(),
            }],
        };

        self.records
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(record)));

        info!(id, owner = %principal, "schedule created");
        Ok((id, schedule))
    }

    /// Replace the dependency map of schedule `id` and rebuild it.
    ///
    /// On success the new schedule becomes the current revision. Attaching the
    /// map that is already current is a no-op returning the current schedule.
    /// On failure the stored schedule is left untouched.
    pub async fn attach_dependencies(
        &self,
        principal: &Principal,
        id: ScheduleId,
        dependencies: DependencyMap,
    ) -> Result<Schedule> {
        let mut record = self.authorized_record(principal, id, Access::Edit).await?;

        let current = record.current()?;
        if current.dependencies == dependencies {
            debug!(id, version = current.version, "dependency map unchanged; keeping revision");
            return Ok(current.schedule.clone());
        }
        let next_version = current.version + 1;

        let schedule = self
            .builder
            .build(
                &record.tasks,
                &dependencies,
                record.num_days,
                &record.strategy,
            )
            .inspect_err(|e| {
                warn!(id, error = %e, "dependency update rejected; keeping previous schedule");
            })?;

        record.revisions.push(Revision {
            version: next_version,
            dependencies,
            schedule: schedule.clone(),
        });

        info!(id, version = next_version, "dependencies attached; schedule rebuilt");
        Ok(schedule)
    }

    /// Current state of schedule `id`.
    pub async fn get(&self, principal: &Principal, id: ScheduleId) -> Result<ScheduleSnapshot> {
        let record = self.authorized_record(principal, id, Access::Read).await?;
        record.snapshot()
    }

    /// Every revision of schedule `id`, oldest first.
    pub async fn history(&self, principal: &Principal, id: ScheduleId) -> Result<Vec<Revision>> {
        let record = self.authorized_record(principal, id, Access::Read).await?;
        Ok(record.revisions.clone())
    }

    /// Number of stored schedules.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Lock record `id` once `principal` is cleared for `access`.
    ///
    /// The authorizer runs before a missing id is reported, so a principal
    /// who is denied cannot tell unused ids from other people's schedules.
    async fn authorized_record(
        &self,
        principal: &Principal,
        id: ScheduleId,
        access: Access,
    ) -> Result<OwnedMutexGuard<ScheduleRecord>> {
        let found = self.records.read().await.get(&id).cloned();

        let Some(record) = found else {
            self.authorizer
                .authorize(principal, &access.action(id, None))?;
            return Err(DayplanError::ScheduleNotFound(id));
        };

        let record = record.lock_owned().await;
        self.authorizer
            .authorize(principal, &access.action(id, Some(&record.owner)))?;
        Ok(record)
    }
}

#[derive(Debug, Clone, Copy)]
enum Access {
    Read,
    Edit,
}

impl Access {
    fn action(self, id: ScheduleId, owner: Option<&Principal>) -> Action<'_> {
        match self {
            Access::Read => Action::Read { id, owner },
            Access::Edit => Action::AttachDependencies { id, owner },
        }
    }
}
