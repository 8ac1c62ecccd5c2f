//! Battle controller - runs every active session on the attack clock

use tracing::{debug, info, warn};

use crate::battle::exchange::{resolve_exchange, ExchangeReport};
use crate::battle::session::BattleSession;
use crate::core::error::{Result, SimError};
use crate::core::types::{GroupId, SessionId};
use crate::events::{BattleResult, EventSink, SimEvent};
use crate::presentation::{release_visuals, VisualSink};
use crate::units::group::GroupMode;
use crate::units::registry::GroupRegistry;

/// A session that reached a terminal outcome this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleEnded {
    pub session: SessionId,
    pub result: BattleResult,
    pub group_a: GroupId,
    pub group_b: GroupId,
}

/// Owns active battle sessions and publishes `BattleEnd` into its sink
#[derive(Debug)]
pub struct BattleController<S: EventSink> {
    sink: S,
    sessions: Vec<BattleSession>,
    attack_interval: f32,
    next_id: u32,
}

impl<S: EventSink> BattleController<S> {
    pub fn new(sink: S, attack_interval: f32) -> Self {
        Self {
            sink,
            sessions: Vec::new(),
            attack_interval,
            next_id: 0,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn attack_interval(&self) -> f32 {
        self.attack_interval
    }

    pub fn sessions(&self) -> &[BattleSession] {
        &self.sessions
    }

    pub fn session(&self, id: SessionId) -> Option<&BattleSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.sessions.iter().filter(|s| s.active).count()
    }

    /// Is the group fighting in an active session?
    pub fn is_engaged(&self, group: GroupId) -> bool {
        self.sessions.iter().any(|s| s.active && s.involves(group))
    }

    /// Open a session between two groups and put both into battle mode
    pub fn start(&mut self, groups: &mut GroupRegistry, a: GroupId, b: GroupId) -> Result<SessionId> {
        if a == b {
            return Err(SimError::SelfEngagement(a));
        }
        for id in [a, b] {
            if !groups.contains(id) {
                return Err(SimError::GroupNotFound(id));
            }
            if self.is_engaged(id) {
                return Err(SimError::AlreadyInBattle(id));
            }
        }

        let id = SessionId(self.next_id);
        self.next_id += 1;

        for group_id in [a, b] {
            if let Some(group) = groups.get_mut(group_id) {
                group.mode = GroupMode::InBattle;
            }
        }
        self.sessions.push(BattleSession::new(id, a, b));
        info!(session = %id, group_a = %a, group_b = %b, "battle started");
        Ok(id)
    }

    /// Advance every active session by `dt` seconds
    ///
    /// Each full attack interval runs one exchange; leftover time carries
    /// to the next call. Finished sessions are dropped after publishing
    /// `BattleEnd`. A session whose group has left the registry is an error,
    /// reported before any session runs an exchange.
    pub fn advance(
        &mut self,
        groups: &mut GroupRegistry,
        visuals: &mut dyn VisualSink,
        dt: f32,
    ) -> Result<Vec<BattleEnded>> {
        self.check_sessions(groups)?;

        let mut ended = Vec::new();
        let interval = self.attack_interval;

        for session in self.sessions.iter_mut().filter(|s| s.active) {
            session.accumulate(dt);
            while session.take_exchange(interval) {
                let report = groups
                    .with_pair_mut(session.group_a, session.group_b, resolve_exchange)
                    .ok_or(SimError::BattleGroupMissing {
                        session: session.id,
                        group: session.group_a,
                    })?;
                log_exchange(session, &report);

                release_visuals(
                    report.casualties_a.iter().chain(report.casualties_b.iter()),
                    visuals,
                );

                if let Some(result) = report.outcome {
                    session.finish(result);
                    info!(
                        session = %session.id,
                        result = result.as_str(),
                        exchanges = session.exchanges,
                        "battle ended"
                    );
                    ended.push(BattleEnded {
                        session: session.id,
                        result,
                        group_a: session.group_a,
                        group_b: session.group_b,
                    });
                    break;
                }
            }
        }

        for end in &ended {
            self.sink.publish(SimEvent::BattleEnd {
                result: end.result,
                group_a: end.group_a,
                group_b: end.group_b,
            });
        }
        self.sessions.retain(|s| s.active);
        Ok(ended)
    }

    /// Drop the first session that lost a group; its remaining group goes back to moving
    fn check_sessions(&mut self, groups: &mut GroupRegistry) -> Result<()> {
        let broken = self.sessions.iter().filter(|s| s.active).find_map(|s| {
            [s.group_a, s.group_b]
                .into_iter()
                .find(|g| !groups.contains(*g))
                .map(|missing| (s.id, missing))
        });
        let Some((session, missing)) = broken else {
            return Ok(());
        };

        if let Some(broken) = self.sessions.iter_mut().find(|s| s.id == session) {
            broken.active = false;
            for id in [broken.group_a, broken.group_b] {
                if let Some(group) = groups.get_mut(id) {
                    group.mode = GroupMode::Moving;
                }
            }
        }
        self.sessions.retain(|s| s.active);
        warn!(%session, group = %missing, "battle group vanished");
        Err(SimError::BattleGroupMissing {
            session,
            group: missing,
        })
    }
}

fn log_exchange(session: &BattleSession, report: &ExchangeReport) {
    debug!(
        session = %session.id,
        exchange = session.exchanges,
        damage_to_a = report.damage_to_a,
        damage_to_b = report.damage_to_b,
        fallen_a = report.casualties_a.len(),
        fallen_b = report.casualties_b.len(),
        "exchange resolved"
    );
}
