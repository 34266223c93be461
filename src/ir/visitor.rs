//! Per-kind instruction dispatch.
//!
//! [`InstrVisitor`] has one method per instruction kind, each with an empty
//! default body, so a visitor only implements the kinds it cares about.
//! [`Function::accept`] performs the dispatch with an exhaustive match over
//! [`crate::ir::InstrKind`].
//!
//! Visitors receive the function by shared reference. Passes that need to
//! mutate collect their edits first and apply them through the `Function`
//! operations afterwards.
//!
//! ```rust
//! use ssagraph::ir::{Function, InstrId, InstrVisitor};
//!
//! #[derive(Default)]
//! struct PhiCounter(usize);
//!
//! impl InstrVisitor for PhiCounter {
//!     fn visit_phi(&mut self, _func: &Function, _instr: InstrId) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut func = Function::new("f");
//! let block = func.create_block("entry");
//! let one = func.const_int(1);
//! let phi = func.create_phi(vec![one], "x").unwrap();
//! func.push_back(block, phi).unwrap();
//!
//! let mut counter = PhiCounter::default();
//! func.walk_block(block, &mut counter).unwrap();
//! assert_eq!(counter.0, 1);
//! ```

use crate::{
    ir::{BlockId, Function, InstrId},
    Result,
};

/// Callback interface invoked once per instruction by [`Function::accept`].
pub trait InstrVisitor {
    /// Called for a phi.
    fn visit_phi(&mut self, _func: &Function, _instr: InstrId) {}

    /// Called for an unconditional branch.
    fn visit_br(&mut self, _func: &Function, _instr: InstrId, _target: BlockId) {}

    /// Called for a conditional branch; the condition is operand 0.
    fn visit_cond_br(
        &mut self,
        _func: &Function,
        _instr: InstrId,
        _on_true: BlockId,
        _on_false: BlockId,
    ) {
    }

    /// Called for a multi-way branch; `cases[i]` belongs to operand `i + 1`.
    fn visit_match(
        &mut self,
        _func: &Function,
        _instr: InstrId,
        _cases: &[BlockId],
        _otherwise: BlockId,
    ) {
    }

    /// Called for a return.
    fn visit_ret(&mut self, _func: &Function, _instr: InstrId) {}

    /// Called for a target instruction.
    fn visit_cpu(&mut self, _func: &Function, _instr: InstrId) {}

    /// Called for a symbolic call to `label`.
    fn visit_call(&mut self, _func: &Function, _instr: InstrId, _label: &str) {}
}

impl Function {
    /// Visits every instruction of `block` in order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidBlock`] if `block` is stale.
    pub fn walk_block<V: InstrVisitor + ?Sized>(&self, block: BlockId, visitor: &mut V) -> Result<()> {
        for &instr in self.block_ref(block)?.instructions() {
            self.accept(instr, visitor)?;
        }
        Ok(())
    }

    /// Visits every instruction of every block in layout order.
    ///
    /// # Errors
    ///
    /// Fails only if the layout references a stale block, which a verified
    /// function never does.
    pub fn walk<V: InstrVisitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        for &block in self.layout() {
            self.walk_block(block, visitor)?;
        }
        Ok(())
    }
}
