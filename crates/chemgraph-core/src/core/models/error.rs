use super::ids::{AtomId, BondId, MoleculeId, RingId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Atom not found in model: {0:?}")]
    AtomNotFound(AtomId),

    #[error("Bond not found in model: {0:?}")]
    BondNotFound(BondId),

    #[error("Molecule not found in model: {0:?}")]
    MoleculeNotFound(MoleculeId),

    #[error("Ring not found in model: {0:?}")]
    RingNotFound(RingId),

    #[error("Cannot bond atom {0:?} to itself")]
    SelfLoop(AtomId),

    #[error("Atom {0:?} does not belong to any molecule")]
    DetachedAtom(AtomId),

    #[error("Molecule {child:?} cannot be nested inside its own descendant {parent:?}")]
    NestingCycle {
        parent: MoleculeId,
        child: MoleculeId,
    },
}
