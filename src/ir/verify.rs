//! Structural verification of blocks and functions.
//!
//! The verifier inspects one block at a time and reports every broken graph
//! invariant it finds as a [`Violation`]:
//!
//! - **CFG symmetry**: each successor lists the block as predecessor and vice
//!   versa; no edge is listed twice or points at a removed block
//! - **Terminator placement**: at most one terminator, and only in last position
//! - **Ownership**: every instruction of the block points back at it, appears
//!   once and has only live operands
//! - **Use lists**: for each instruction and each value it touches, the number
//!   of operand slots equals the number of use-list entries
//! - **Completeness** (strict only): the block ends in a terminator or a
//!   never-returning call
//! - **Phi arity** (strict only): phis in blocks with several predecessors
//!   have one operand per predecessor
//!
//! Which checks run is decided by the function's [`VerifyConfig`].
//!
//! [`Function::check_block`] returns the violations. [`Function::verify`] is
//! the fatal form used as a pass sanity check: in builds with debug
//! assertions it logs every violation at error level and panics, since no
//! later pass can reason about a broken graph. In release builds it does
//! nothing.

use std::collections::HashMap;

use bitflags::bitflags;
use log::error;
use thiserror::Error;

use crate::{
    ir::{BlockId, Function, InstrId, InstrKind, ValueId},
    Result,
};

bitflags! {
    /// Selects the invariant checks run by the verifier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Checks: u32 {
        /// Successor and predecessor lists mirror each other
        const CFG_SYMMETRY = 0x0001;
        /// At most one terminator, in last position
        const TERMINATOR = 0x0002;
        /// Back-references, single membership and live operands
        const OWNERSHIP = 0x0004;
        /// Operand slots and use-list entries agree
        const USE_LISTS = 0x0008;
        /// The block ends in a terminator or never-returning call
        const COMPLETENESS = 0x0010;
        /// Phi operand count matches predecessor count
        const PHI_ARITY = 0x0020;
    }
}

/// Configuration of the block verifier.
///
/// # Presets
///
/// - [`VerifyConfig::default`] - the invariants every graph must hold at all times
/// - [`VerifyConfig::disabled`] - no checks
/// - [`VerifyConfig::minimal`] - CFG symmetry and terminator placement only
/// - [`VerifyConfig::strict`] - everything, including completeness and phi arity,
///   for graphs that are fully built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyConfig {
    /// Checks to run
    pub checks: Checks,

    /// Maximum number of violations collected per block (default: 64)
    pub max_diagnostics: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            checks: Checks::CFG_SYMMETRY | Checks::TERMINATOR | Checks::OWNERSHIP | Checks::USE_LISTS,
            max_diagnostics: 64,
        }
    }
}

impl VerifyConfig {
    /// Creates a configuration that runs no checks.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            checks: Checks::empty(),
            ..Self::default()
        }
    }

    /// Creates a configuration checking only the CFG shape.
    ///
    /// Cheap enough to leave on between every pass.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            checks: Checks::CFG_SYMMETRY | Checks::TERMINATOR,
            ..Self::default()
        }
    }

    /// Creates a configuration running every check.
    ///
    /// Blocks still under construction fail the completeness and phi arity
    /// checks, so use this once the builder is done.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            checks: Checks::all(),
            max_diagnostics: usize::MAX,
        }
    }
}

/// A broken graph invariant found by the verifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A successor does not list the block among its predecessors.
    #[error("{block}: successor {successor} does not list it as predecessor")]
    MissingPredecessor {
        /// The block being verified
        block: BlockId,
        /// The successor lacking the back edge
        successor: BlockId,
    },

    /// A predecessor does not list the block among its successors.
    #[error("{block}: predecessor {predecessor} does not list it as successor")]
    MissingSuccessor {
        /// The block being verified
        block: BlockId,
        /// The predecessor lacking the forward edge
        predecessor: BlockId,
    },

    /// An edge list names the same block twice.
    #[error("{block}: edge to {other} listed more than once")]
    DuplicateEdge {
        /// The block being verified
        block: BlockId,
        /// The repeated neighbour
        other: BlockId,
    },

    /// An edge points at a removed block.
    #[error("{block}: edge to removed block {other}")]
    DanglingEdge {
        /// The block being verified
        block: BlockId,
        /// The removed neighbour
        other: BlockId,
    },

    /// A terminator is followed by further instructions.
    #[error("{block}: terminator {instr} is not the last instruction")]
    MisplacedTerminator {
        /// The block being verified
        block: BlockId,
        /// The misplaced terminator
        instr: InstrId,
    },

    /// The block sequence names an erased instruction.
    #[error("{block}: instruction {instr} does not exist")]
    DanglingInstr {
        /// The block being verified
        block: BlockId,
        /// The erased instruction
        instr: InstrId,
    },

    /// An instruction's back-reference names another block, or none.
    #[error("{block}: instruction {instr} belongs to {owner:?}")]
    WrongOwner {
        /// The block being verified
        block: BlockId,
        /// The instruction
        instr: InstrId,
        /// The block the instruction points back at
        owner: Option<BlockId>,
    },

    /// An instruction appears more than once in the block.
    #[error("{block}: instruction {instr} appears more than once")]
    DuplicateInstr {
        /// The block being verified
        block: BlockId,
        /// The repeated instruction
        instr: InstrId,
    },

    /// An operand slot references an erased value.
    #[error("{instr}: operand {index} references erased value {value}")]
    DanglingOperand {
        /// The instruction
        instr: InstrId,
        /// The operand slot
        index: usize,
        /// The erased value
        value: ValueId,
    },

    /// Operand slots and use-list entries for one edge disagree.
    #[error("{user} uses {value} in {slots} slot(s) but {value} lists it {entries} time(s)")]
    UseCountMismatch {
        /// The used value
        value: ValueId,
        /// The using instruction
        user: InstrId,
        /// Operand slots of `user` referencing `value`
        slots: usize,
        /// Entries of `user` in the use list of `value`
        entries: usize,
    },

    /// The block does not end in a terminator or never-returning call.
    #[error("{0}: block is not complete")]
    Incomplete(BlockId),

    /// A phi's operand count differs from the block's predecessor count.
    #[error("{instr}: phi has {operands} operand(s) but {block} has {predecessors} predecessor(s)")]
    PhiArity {
        /// The block being verified
        block: BlockId,
        /// The phi
        instr: InstrId,
        /// Its operand count
        operands: usize,
        /// The block's predecessor count
        predecessors: usize,
    },
}

/// Collects violations up to the configured limit.
struct Report {
    violations: Vec<Violation>,
    limit: usize,
}

impl Report {
    fn push(&mut self, violation: Violation) {
        if self.violations.len() < self.limit {
            self.violations.push(violation);
        }
    }
}

impl Function {
    /// Runs the configured checks on `block` and returns every violation found.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidBlock`] if `block` is stale.
    pub fn check_block(&self, block: BlockId) -> Result<Vec<Violation>> {
        let bb = self.block_ref(block)?;
        let checks = self.config.checks;
        let mut report = Report {
            violations: Vec::new(),
            limit: self.config.max_diagnostics,
        };

        if checks.contains(Checks::CFG_SYMMETRY) {
            self.check_edges(block, bb.successors(), true, &mut report);
            self.check_edges(block, bb.predecessors(), false, &mut report);
        }

        if checks.contains(Checks::TERMINATOR) {
            let last = bb.len().saturating_sub(1);
            for (pos, &instr) in bb.instructions().iter().enumerate() {
                let is_terminator = self.instr(instr).is_some_and(|i| i.is_terminator());
                if is_terminator && pos != last {
                    report.push(Violation::MisplacedTerminator { block, instr });
                }
            }
        }

        if checks.contains(Checks::OWNERSHIP) {
            self.check_ownership(block, &mut report);
        }

        if checks.contains(Checks::USE_LISTS) {
            for &instr in bb.instructions() {
                self.check_use_lists(instr, &mut report);
            }
        }

        if checks.contains(Checks::COMPLETENESS) && !self.is_complete(block)? {
            report.push(Violation::Incomplete(block));
        }

        if checks.contains(Checks::PHI_ARITY) && bb.predecessors().len() > 1 {
            for &instr in bb.instructions() {
                let Some(phi) = self.instr(instr) else { continue };
                if *phi.kind() == InstrKind::Phi && phi.operands().len() != bb.predecessors().len() {
                    report.push(Violation::PhiArity {
                        block,
                        instr,
                        operands: phi.operands().len(),
                        predecessors: bb.predecessors().len(),
                    });
                }
            }
        }

        Ok(report.violations)
    }

    /// Runs [`Function::check_block`] on every block in layout order.
    ///
    /// Detached instructions are not part of any block and are not checked.
    #[must_use]
    pub fn check_function(&self) -> Vec<(BlockId, Violation)> {
        self.layout
            .iter()
            .filter_map(|&block| Some((block, self.check_block(block).ok()?)))
            .flat_map(|(block, violations)| violations.into_iter().map(move |v| (block, v)))
            .collect()
    }

    /// Fatal verification of one block.
    ///
    /// With debug assertions enabled, every violation is logged and the call
    /// panics if there was any. Without debug assertions this is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `block` is stale or violates a configured invariant.
    pub fn verify(&self, block: BlockId) {
        if !cfg!(debug_assertions) {
            return;
        }

        match self.check_block(block) {
            Ok(violations) => self.abort_on(&violations),
            Err(err) => panic!("{}: cannot verify {block}: {err}", self.name),
        }
    }

    /// Fatal verification of every block, see [`Function::verify`].
    ///
    /// # Panics
    ///
    /// Panics if any block violates a configured invariant.
    pub fn verify_function(&self) {
        if !cfg!(debug_assertions) {
            return;
        }

        let violations: Vec<Violation> = self.check_function().into_iter().map(|(_, v)| v).collect();
        self.abort_on(&violations);
    }

    fn abort_on(&self, violations: &[Violation]) {
        if violations.is_empty() {
            return;
        }
        for violation in violations {
            error!("{}: {violation}", self.name);
        }
        panic!(
            "{}: verification failed with {} violation(s), first: {}",
            self.name,
            violations.len(),
            violations[0]
        );
    }

    fn check_edges(&self, block: BlockId, edges: &[BlockId], forward: bool, report: &mut Report) {
        for (pos, &other) in edges.iter().enumerate() {
            if edges[..pos].contains(&other) {
                report.push(Violation::DuplicateEdge { block, other });
                continue;
            }

            let Some(neighbour) = self.block(other) else {
                report.push(Violation::DanglingEdge { block, other });
                continue;
            };

            if forward && !neighbour.predecessors().contains(&block) {
                report.push(Violation::MissingPredecessor {
                    block,
                    successor: other,
                });
            } else if !forward && !neighbour.successors().contains(&block) {
                report.push(Violation::MissingSuccessor {
                    block,
                    predecessor: other,
                });
            }
        }
    }

    fn check_ownership(&self, block: BlockId, report: &mut Report) {
        let Some(bb) = self.block(block) else { return };

        for (pos, &instr) in bb.instructions().iter().enumerate() {
            if bb.instructions()[..pos].contains(&instr) {
                report.push(Violation::DuplicateInstr { block, instr });
                continue;
            }

            let Some(entry) = self.instr(instr) else {
                report.push(Violation::DanglingInstr { block, instr });
                continue;
            };

            if entry.block() != Some(block) {
                report.push(Violation::WrongOwner {
                    block,
                    instr,
                    owner: entry.block(),
                });
            }

            for (index, &value) in entry.operands().iter().enumerate() {
                if self.value(value).is_none() {
                    report.push(Violation::DanglingOperand { instr, index, value });
                }
            }
        }
    }

    /// Compares both directions of every use edge touching `instr`.
    fn check_use_lists(&self, instr: InstrId, report: &mut Report) {
        let Some(entry) = self.instr(instr) else { return };

        // Edges where `instr` is the user
        let mut slots: HashMap<ValueId, usize> = HashMap::new();
        for &value in entry.operands() {
            *slots.entry(value).or_default() += 1;
        }
        for (&value, &count) in &slots {
            let Some(used) = self.value(value) else { continue };
            let entries = used.uses().iter().filter(|&&u| u == instr).count();
            if entries != count {
                report.push(Violation::UseCountMismatch {
                    value,
                    user: instr,
                    slots: count,
                    entries,
                });
            }
        }

        // Edges where `instr` is the used value
        let Some(own) = self.value(instr.value()) else { return };
        let mut entries: HashMap<InstrId, usize> = HashMap::new();
        for &user in own.uses() {
            *entries.entry(user).or_default() += 1;
        }
        for (&user, &count) in &entries {
            let slots = self
                .instr(user)
                .map_or(0, |u| u.operands().iter().filter(|&&v| v == instr.value()).count());
            if slots != count {
                report.push(Violation::UseCountMismatch {
                    value: instr.value(),
                    user,
                    slots,
                    entries: count,
                });
            }
        }
    }
}
