//! Combo tracking and the running damage timeline.

use xko_models::{
    Actor, CharacterProfile, Combo, ComboEnd, Event, EventKind, Leader, MoveOutcome,
};

/// Seconds without damage that separate rounds.
const ROUND_GAP_SECS: f64 = 10.0;
/// Damage a round needs before a lull can end it.
const ROUND_MIN_DAMAGE: u32 = 500;

/// Damage dealt by each player up to some point in the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageSnapshot {
    /// Indexed by [`Actor::index`].
    pub dealt: [u32; 2],
    pub round: u32,
}

impl Default for DamageSnapshot {
    fn default() -> Self {
        Self {
            dealt: [0; 2],
            round: 1,
        }
    }
}

impl DamageSnapshot {
    pub fn dealt_by(&self, actor: Actor) -> u32 {
        actor.index().map_or(0, |i| self.dealt[i])
    }

    /// Damage taken by `actor`, which is what the opponent dealt.
    pub fn taken_by(&self, actor: Actor) -> u32 {
        self.dealt_by(actor.opponent())
    }

    /// Player ahead on net damage (dealt minus taken).
    pub fn leader(&self) -> Leader {
        let net = |actor| i64::from(self.dealt_by(actor)) - i64::from(self.taken_by(actor));
        let (p1, p2) = (net(Actor::Player1), net(Actor::Player2));
        match p1.cmp(&p2) {
            std::cmp::Ordering::Greater => Leader::Player1,
            std::cmp::Ordering::Less => Leader::Player2,
            std::cmp::Ordering::Equal => Leader::Tied,
        }
    }
}

/// Running damage totals built from landed moves with known damage.
///
/// A new round starts when at least [`ROUND_GAP_SECS`] pass between two
/// damaging hits and the current round has seen at least
/// [`ROUND_MIN_DAMAGE`] damage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageTimeline {
    points: Vec<(f64, DamageSnapshot)>,
}

impl DamageTimeline {
    pub fn from_events(events: &[Event], profile: &CharacterProfile) -> Self {
        let mut points = Vec::new();
        let mut snapshot = DamageSnapshot::default();
        let mut round_damage = 0u32;
        let mut last_damage_at: Option<f64> = None;

        for event in events {
            let Some(slot) = event.actor.index() else {
                continue;
            };
            let Some(damage) = landed_damage(event, profile).filter(|d| *d > 0) else {
                continue;
            };

            if let Some(last) = last_damage_at {
                if event.timestamp - last >= ROUND_GAP_SECS && round_damage >= ROUND_MIN_DAMAGE {
                    snapshot.round += 1;
                    round_damage = 0;
                }
            }
            snapshot.dealt[slot] += damage;
            round_damage += damage;
            last_damage_at = Some(event.timestamp);
            points.push((event.timestamp, snapshot));
        }

        Self { points }
    }

    /// Totals as of `timestamp` (inclusive).
    pub fn at(&self, timestamp: f64) -> DamageSnapshot {
        let idx = self.points.partition_point(|(t, _)| *t <= timestamp);
        match idx {
            0 => DamageSnapshot::default(),
            n => self.points[n - 1].1,
        }
    }

    pub fn round_at(&self, timestamp: f64) -> u32 {
        self.at(timestamp).round
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Damage of a landed move whose damage is known.
fn landed_damage(event: &Event, profile: &CharacterProfile) -> Option<u32> {
    let observation = event.observation.as_ref()?;
    if observation.outcome != MoveOutcome::Hit {
        return None;
    }
    profile.move_data(&observation.notation)?.damage
}

#[derive(Debug)]
struct OpenCombo {
    actor: Actor,
    start_frame: u64,
    start_time: f64,
    last_frame: u64,
    last_time: f64,
    moves: Vec<String>,
    damage: u32,
}

impl OpenCombo {
    fn close(self, ended_by: ComboEnd, timeline: &DamageTimeline) -> Combo {
        Combo {
            actor: self.actor,
            round: timeline.round_at(self.start_time),
            start_frame: self.start_frame,
            end_frame: self.last_frame,
            start_time: self.start_time,
            end_time: self.last_time,
            hit_count: self.moves.len() as u32,
            moves_used: self.moves,
            damage: self.damage,
            ended_by,
        }
    }
}

/// Groups consecutive hits by one player into combos.
#[derive(Debug, Clone, Copy)]
pub struct ComboTracker {
    timeout_frames: u64,
    min_hits: u32,
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new(90)
    }
}

impl ComboTracker {
    pub fn new(timeout_frames: u64) -> Self {
        Self {
            timeout_frames,
            min_hits: 2,
        }
    }

    /// Find combos in an event log ordered by frame.
    ///
    /// Events with an observation count as hits when the move landed;
    /// events without one count as hits. A combo ends as `finished` on
    /// timeout or a non-landing move by the same player, and as `dropped`
    /// when the opponent acts. Combos end at their last hit.
    pub fn track(
        &self,
        events: &[Event],
        profile: &CharacterProfile,
        timeline: &DamageTimeline,
    ) -> Vec<Combo> {
        let mut combos = Vec::new();
        let mut current: Option<OpenCombo> = None;
        let mut close = |open: Option<OpenCombo>, ended_by: ComboEnd| {
            if let Some(open) = open {
                if open.moves.len() as u32 >= self.min_hits {
                    combos.push(open.close(ended_by, timeline));
                }
            }
        };

        for event in events {
            if event.kind != EventKind::HitOrBlock || !event.actor.is_player() {
                continue;
            }

            let ended = current.as_ref().and_then(|open| {
                if event.frame_index.saturating_sub(open.last_frame) > self.timeout_frames {
                    Some(ComboEnd::Finished)
                } else if open.actor != event.actor {
                    Some(ComboEnd::Dropped)
                } else {
                    None
                }
            });
            if let Some(ended_by) = ended {
                close(current.take(), ended_by);
            }

            let landed = event
                .observation
                .as_ref()
                .map_or(true, |o| o.outcome == MoveOutcome::Hit);
            if !landed {
                close(current.take(), ComboEnd::Finished);
                continue;
            }

            let label = event
                .observation
                .as_ref()
                .map_or_else(|| "unknown".to_string(), |o| o.notation.clone());
            let damage = landed_damage(event, profile).unwrap_or(0);
            match current.as_mut() {
                Some(open) => {
                    open.last_frame = event.frame_index;
                    open.last_time = event.timestamp;
                    open.moves.push(label);
                    open.damage += damage;
                }
                None => {
                    current = Some(OpenCombo {
                        actor: event.actor,
                        start_frame: event.frame_index,
                        start_time: event.timestamp,
                        last_frame: event.frame_index,
                        last_time: event.timestamp,
                        moves: vec![label],
                        damage,
                    });
                }
            }
        }
        close(current.take(), ComboEnd::Finished);

        combos
    }
}
