//! Session state machine.
//!
//! Flow: view(id) → Briefing → start() → Task → commit() → Reflection → done().
//! `back()` returns to the dashboard from anywhere.
//!
//! Locking rule: `inner` is only held for short synchronous sections, never
//! across an `.await`. Network transitions claim the session with an
//! `InFlight` marker first and apply their outcome only if nothing reset the
//! session in the meantime.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::catalog::{Attempt, Recommendation, SimulationApi, SimulationResult};
use crate::report::{export_report, render_report, ProfileDisplay, Report};
use crate::session::decisions::validate;
use crate::session::state::{
    ReflectionState, SessionSnapshot, SessionState, TaskState, Transition,
};
use crate::session::timer::{CountdownTicker, TICK_PERIOD};
use crate::session::SessionError;

/// The one live session owned by the host.
pub struct SimulationSession {
    api: Arc<dyn SimulationApi>,
    inner: Arc<Mutex<SessionInner>>,
}

#[derive(Default)]
struct SessionInner {
    state: SessionState,
    recommendation: Option<Recommendation>,
    in_flight: Option<Transition>,
    /// Bumped by every claim and every reset. A transition that settles under
    /// a different epoch has lost the session and must not touch it.
    epoch: u64,
    countdown: Option<CountdownTicker>,
}

impl SessionInner {
    fn ensure_idle(&self) -> Result<(), SessionError> {
        match self.in_flight {
            Some(current) => Err(SessionError::Busy(current)),
            None => Ok(()),
        }
    }

    fn stop_countdown(&mut self) {
        if let Some(ticker) = self.countdown.take() {
            ticker.stop();
        }
    }

    /// Back to the dashboard. Drops the attempt, decisions and any pending claim.
    fn reset(&mut self) {
        self.stop_countdown();
        self.in_flight = None;
        self.epoch = self.epoch.wrapping_add(1);
        self.state = SessionState::Dashboard;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn invalid(operation: &'static str, state: &SessionState) -> SessionError {
    SessionError::InvalidTransition {
        operation,
        step: state.step(),
    }
}

/// Claim on the session for one network transition.
///
/// Released by `settle`, or on drop if the caller's future is abandoned
/// mid-call.
struct InFlight<'a> {
    inner: &'a Mutex<SessionInner>,
    epoch: u64,
    transition: Transition,
    settled: bool,
}

impl<'a> InFlight<'a> {
    /// Re-locks the session. Fails with `Superseded` if it was reset while
    /// the call was outstanding.
    fn settle(mut self) -> Result<MutexGuard<'a, SessionInner>, SessionError> {
        self.settled = true;
        let mutex: &'a Mutex<SessionInner> = self.inner;
        let mut inner = lock(mutex);
        if inner.epoch != self.epoch {
            debug!(transition = %self.transition, "Discarding result of superseded transition");
            return Err(SessionError::Superseded(self.transition));
        }
        inner.in_flight = None;
        Ok(inner)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = lock(self.inner);
        if inner.epoch == self.epoch {
            inner.in_flight = None;
            debug!(transition = %self.transition, "Transition abandoned before completion");
        }
    }
}

impl SimulationSession {
    pub fn new(api: Arc<dyn SimulationApi>) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(SessionInner::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        lock(&*self.inner)
    }

    /// Checks preconditions and claims the session for `transition`.
    /// A second network transition is rejected while one is in flight.
    fn begin<T>(
        &self,
        transition: Transition,
        check: impl FnOnce(&SessionState) -> Result<T, SessionError>,
    ) -> Result<(InFlight<'_>, T), SessionError> {
        let mut inner = self.lock();
        inner.ensure_idle()?;
        let value = check(&inner.state)?;
        inner.epoch = inner.epoch.wrapping_add(1);
        inner.in_flight = Some(transition);
        let flight = InFlight {
            inner: &*self.inner,
            epoch: inner.epoch,
            transition,
            settled: false,
        };
        Ok((flight, value))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot {
            state: inner.state.clone(),
            in_flight: inner.in_flight,
            recommendation: inner.recommendation.clone(),
        }
    }

    /// Re-fetches the dashboard recommendation. Read-only: a failure is
    /// logged and the dashboard continues without one.
    pub async fn refresh_recommendation(&self) -> Option<Recommendation> {
        let outcome = self.api.recommendation().await;
        match outcome {
            Ok(recommendation) => {
                info!(
                    simulation_id = %recommendation.recommended_simulation.id,
                    readiness = recommendation.readiness_score,
                    "Recommendation refreshed"
                );
                self.lock().recommendation = Some(recommendation.clone());
                Some(recommendation)
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch recommendation; continuing without one");
                self.lock().recommendation = None;
                None
            }
        }
    }

    /// Dashboard → Briefing.
    pub async fn view(&self, simulation_id: &str) -> Result<(), SessionError> {
        let (flight, ()) = self.begin(Transition::View, |state| match state {
            SessionState::Dashboard => Ok(()),
            other => Err(invalid("view a simulation", other)),
        })?;

        let outcome = self.api.simulation(simulation_id).await;

        let mut inner = flight.settle()?;
        let detail = outcome.map_err(|e| {
            warn!(simulation_id, error = %e, "Failed to load simulation");
            SessionError::Api(e)
        })?;
        info!(simulation_id, title = %detail.title, "Briefing loaded");
        inner.state = SessionState::Briefing(detail);
        Ok(())
    }

    /// Briefing → Task. Starts the countdown.
    pub async fn start(&self) -> Result<Attempt, SessionError> {
        let (flight, simulation_id) = self.begin(Transition::Start, |state| match state {
            SessionState::Briefing(detail) => Ok(detail.id.clone()),
            SessionState::Task(_) => Err(SessionError::AttemptActive),
            other => Err(invalid("start an attempt", other)),
        })?;

        let outcome = self.api.start_attempt(&simulation_id).await;

        let mut inner = flight.settle()?;
        let attempt = outcome.map_err(|e| {
            warn!(simulation_id = %simulation_id, error = %e, "Failed to start attempt");
            SessionError::Api(e)
        })?;
        info!(
            simulation_id = %simulation_id,
            attempt_id = %attempt.attempt_id,
            "Attempt started"
        );

        inner.state = SessionState::Task(TaskState::new(attempt.clone()));
        inner.stop_countdown();
        inner.countdown = Some(self.spawn_countdown(attempt.attempt_id.clone()));
        Ok(attempt)
    }

    fn spawn_countdown(&self, attempt_id: String) -> CountdownTicker {
        let session = Arc::downgrade(&self.inner);
        CountdownTicker::start(TICK_PERIOD, move || {
            let Some(session) = session.upgrade() else {
                return false;
            };
            let mut inner = lock(&*session);
            match &mut inner.state {
                SessionState::Task(task) if task.attempt.attempt_id == attempt_id => {
                    task.countdown.tick();
                    if task.countdown.is_expired() {
                        info!(attempt_id = %attempt_id, "Task countdown reached zero");
                        return false;
                    }
                    true
                }
                _ => false,
            }
        })
    }

    /// Flips `action_id` in the task's selection. Returns whether it is now selected.
    pub fn toggle_action(&self, action_id: &str) -> Result<bool, SessionError> {
        let mut inner = self.lock();
        inner.ensure_idle()?;
        match &mut inner.state {
            SessionState::Task(task) => {
                let selected = task.decisions.toggle(action_id);
                let (count, available) = task.progress();
                debug!(action_id, selected, count, available, "Action toggled");
                Ok(selected)
            }
            other => Err(invalid("toggle an action", other)),
        }
    }

    pub fn set_justification(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let mut inner = self.lock();
        inner.ensure_idle()?;
        match &mut inner.state {
            SessionState::Task(task) => {
                task.decisions.set_justification(text);
                Ok(())
            }
            other => Err(invalid("edit the justification", other)),
        }
    }

    /// Task → Reflection.
    ///
    /// Validation runs first and never reaches the network. On a backend
    /// failure the task and its decisions are left exactly as they were.
    pub async fn commit(&self) -> Result<SimulationResult, SessionError> {
        let (flight, (attempt_id, submission)) =
            self.begin(Transition::Commit, |state| match state {
                SessionState::Task(task) => {
                    validate(&task.decisions)?;
                    Ok((
                        task.attempt.attempt_id.clone(),
                        task.decisions.to_submission(),
                    ))
                }
                other => Err(invalid("commit decisions", other)),
            })?;

        info!(
            attempt_id = %attempt_id,
            decisions = submission.decisions.len(),
            "Submitting decisions"
        );
        let outcome = self.api.submit_attempt(&attempt_id, &submission).await;

        let mut inner = flight.settle()?;
        let result = outcome.map_err(|e| {
            warn!(attempt_id = %attempt_id, error = %e, "Submission failed; decisions kept");
            SessionError::Api(e)
        })?;

        match std::mem::take(&mut inner.state) {
            SessionState::Task(task) => {
                inner.stop_countdown();
                info!(
                    attempt_id = %attempt_id,
                    before = result.before_score,
                    after = result.after_score,
                    "Attempt scored"
                );
                inner.state = SessionState::Reflection(ReflectionState {
                    result: result.clone(),
                    simulation: task.attempt.simulation,
                });
                Ok(result)
            }
            other => {
                inner.state = other;
                Err(SessionError::Superseded(Transition::Commit))
            }
        }
    }

    /// Any step → Dashboard. Abandons an active attempt without telling the
    /// backend; unsubmitted attempts simply expire there.
    pub fn back(&self) {
        let mut inner = self.lock();
        let from = inner.state.step();
        inner.reset();
        debug!(%from, "Returned to dashboard");
    }

    /// Reflection → Dashboard, then refreshes the recommendation since the
    /// readiness score may have moved.
    pub async fn done(&self) -> Result<Option<Recommendation>, SessionError> {
        {
            let mut inner = self.lock();
            if !matches!(inner.state, SessionState::Reflection(_)) {
                return Err(invalid("finish", &inner.state));
            }
            inner.reset();
        }
        Ok(self.refresh_recommendation().await)
    }

    pub fn report(&self, profile: &ProfileDisplay) -> Result<Report, SessionError> {
        let inner = self.lock();
        match &inner.state {
            SessionState::Reflection(reflection) => Ok(render_report(
                &reflection.result,
                &reflection.simulation,
                profile,
            )),
            other => Err(invalid("render a report", other)),
        }
    }

    /// Renders the reflection report and writes it under `dir`. Never
    /// changes the session state, whether or not the write succeeds.
    pub fn export_report(
        &self,
        profile: &ProfileDisplay,
        dir: &Path,
    ) -> Result<PathBuf, SessionError> {
        let report = self.report(profile)?;
        let path = export_report(&report, dir).map_err(|e| {
            warn!(dir = %dir.display(), error = %e, "Report export failed");
            SessionError::Export(e)
        })?;
        info!(path = %path.display(), "Report exported");
        Ok(path)
    }
}
