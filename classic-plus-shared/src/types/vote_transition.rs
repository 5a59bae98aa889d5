use crate::types::VoteDirection;

/// The change a vote request makes to the ledger entry of one (pin, voter) pair.
///
/// | existing | requested | transition |
/// |----------|-----------|------------|
/// | none     | d         | `Cast(d)`  |
/// | d        | d         | `Retract(d)` |
/// | d        | e != d    | `Switch { from: d, to: e }` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// No vote existed: a new ledger entry is created.
    Cast(VoteDirection),
    /// The same direction was requested again: the ledger entry is deleted.
    Retract(VoteDirection),
    /// The opposite direction was requested: the ledger entry is updated in place.
    Switch {
        from: VoteDirection,
        to: VoteDirection,
    },
}

impl VoteTransition {
    /// Decides the transition for a request given the voter's current vote.
    pub fn resolve(existing: Option<VoteDirection>, requested: VoteDirection) -> Self {
        match existing {
            None => VoteTransition::Cast(requested),
            Some(current) if current == requested => VoteTransition::Retract(requested),
            Some(current) => VoteTransition::Switch {
                from: current,
                to: requested,
            },
        }
    }

    /// The vote the voter holds once the transition is applied.
    pub fn resulting_vote(&self) -> Option<VoteDirection> {
        match self {
            VoteTransition::Cast(direction) => Some(*direction),
            VoteTransition::Retract(_) => None,
            VoteTransition::Switch { to, .. } => Some(*to),
        }
    }

    /// Counter deltas as `(upvotes, downvotes)`.
    pub fn deltas(&self) -> (i64, i64) {
        match self {
            VoteTransition::Cast(direction) => unit(*direction),
            VoteTransition::Retract(direction) => {
                let (up, down) = unit(*direction);
                (-up, -down)
            }
            VoteTransition::Switch { from, to } => {
                let (from_up, from_down) = unit(*from);
                let (to_up, to_down) = unit(*to);
                (to_up - from_up, to_down - from_down)
            }
        }
    }
}

fn unit(direction: VoteDirection) -> (i64, i64) {
    match direction {
        VoteDirection::Up => (1, 0),
        VoteDirection::Down => (0, 1),
    }
}
