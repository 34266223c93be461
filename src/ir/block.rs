//! Basic blocks and control flow edits.
//!
//! A [`BasicBlock`] exclusively owns an ordered sequence of instructions and is
//! a node of the control flow graph. Predecessor and successor lists have set
//! semantics (no duplicates, insertion order preserved) and are always kept
//! symmetric: `y` is a successor of `x` exactly when `x` is a predecessor of
//! `y`. The only way to change them is [`Function::link_successor`],
//! [`Function::unlink_successor`] and the structural operations built on them.
//!
//! Blocks also have a position in the function's linear layout, which decides
//! fall-through and emission order. Layout and CFG are independent: moving a
//! block never touches its edges.
//!
//! # Completeness
//!
//! A block is complete when its last instruction is a terminator, or a call
//! whose callee is known never to return. Only incomplete blocks can absorb
//! another block with [`Function::merge_back`].

use log::debug;

use crate::{
    ir::{BlockId, Function, InstrId, InstrKind},
    Error, Result,
};

/// A basic block: a straight-line instruction sequence and a CFG node.
#[derive(Debug, Clone, Default)]
pub struct BasicBlock {
    pub(crate) name: String,
    pub(crate) code: Vec<InstrId>,
    pub(crate) predecessors: Vec<BlockId>,
    pub(crate) successors: Vec<BlockId>,
}

impl BasicBlock {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        BasicBlock {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Returns the block name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the instructions in execution order.
    #[must_use]
    pub fn instructions(&self) -> &[InstrId] {
        &self.code
    }

    /// Returns the instruction at position `index`.
    #[must_use]
    pub fn instruction(&self, index: usize) -> Option<InstrId> {
        self.code.get(index).copied()
    }

    /// Returns the first instruction.
    #[must_use]
    pub fn front(&self) -> Option<InstrId> {
        self.code.first().copied()
    }

    /// Returns the last instruction.
    #[must_use]
    pub fn back(&self) -> Option<InstrId> {
        self.code.last().copied()
    }

    /// Returns the instruction `sub` positions before the last one, so
    /// `back_n(0)` is the last instruction.
    #[must_use]
    pub fn back_n(&self, sub: usize) -> Option<InstrId> {
        let index = self.code.len().checked_sub(sub + 1)?;
        self.code.get(index).copied()
    }

    /// Returns the number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Returns `true` if the block holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Returns `true` if `instr` is part of this block.
    #[must_use]
    pub fn contains(&self, instr: InstrId) -> bool {
        self.code.contains(&instr)
    }

    /// Returns the predecessor blocks in insertion order.
    #[must_use]
    pub fn predecessors(&self) -> &[BlockId] {
        &self.predecessors
    }

    /// Returns the successor blocks in insertion order.
    #[must_use]
    pub fn successors(&self) -> &[BlockId] {
        &self.successors
    }
}

impl Function {
    /// Creates an empty block at the end of the layout.
    ///
    /// The first block created becomes the entry block.
    pub fn create_block(&mut self, name: impl Into<String>) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(Some(BasicBlock::new(name)));
        self.layout.push(id);
        if self.entry.is_none() {
            self.entry = Some(id);
        }
        id
    }

    /// Appends `instr` to the end of `block`.
    ///
    /// Only the instruction sequence and the back-reference change; the CFG is
    /// not touched even when `instr` is a branch.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBlock`] or [`Error::InvalidInstr`] for stale handles
    /// - [`Error::AlreadyAttached`] if `instr` belongs to a block
    /// - [`Error::BlockTerminated`] if `block` already ends in a terminator
    pub fn push_back(&mut self, block: BlockId, instr: InstrId) -> Result<()> {
        let last = self.block_ref(block)?.back();
        if let Some(owner) = self.instr_ref(instr)?.block {
            return Err(Error::AlreadyAttached {
                instr,
                block: owner,
            });
        }
        if let Some(last) = last {
            if self.instr_ref(last)?.is_terminator() {
                return Err(Error::BlockTerminated(block));
            }
        }

        self.block_mut(block)?.code.push(instr);
        self.instr_mut(instr)?.block = Some(block);
        Ok(())
    }

    /// Detaches `instr` from `block` and hands it back.
    ///
    /// The instruction keeps its operands and stays in the function until it is
    /// appended elsewhere or erased with [`Function::erase_instr`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBlock`] or [`Error::InvalidInstr`] for stale handles
    /// - [`Error::NotInBlock`] if `instr` is not part of `block`
    pub fn remove(&mut self, block: BlockId, instr: InstrId) -> Result<InstrId> {
        let pos = self.position_in(block, instr)?;
        self.block_mut(block)?.code.remove(pos);
        self.instr_mut(instr)?.block = None;
        Ok(instr)
    }

    /// Puts `new` at the position of `old` within `block`.
    ///
    /// Returns `old`, now detached. Use edges are left alone.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBlock`] or [`Error::InvalidInstr`] for stale handles
    /// - [`Error::NotInBlock`] if `old` is not part of `block`
    /// - [`Error::SameInstr`] if `new == old`
    /// - [`Error::AlreadyAttached`] if `new` belongs to a block
    /// - [`Error::TerminatorNotLast`] if `new` is a terminator and `old` is not last
    pub fn replace(&mut self, block: BlockId, old: InstrId, new: InstrId) -> Result<InstrId> {
        let pos = self.position_in(block, old)?;
        if old == new {
            return Err(Error::SameInstr(old));
        }
        let replacement = self.instr_ref(new)?;
        if let Some(owner) = replacement.block {
            return Err(Error::AlreadyAttached {
                instr: new,
                block: owner,
            });
        }
        if replacement.is_terminator() && pos + 1 != self.block_ref(block)?.len() {
            return Err(Error::TerminatorNotLast { instr: new, block });
        }

        self.block_mut(block)?.code[pos] = new;
        self.instr_mut(new)?.block = Some(block);
        self.instr_mut(old)?.block = None;
        Ok(old)
    }

    /// Appends all instructions of `other` to `block` and folds `other` away.
    ///
    /// This models an unconditional fall-through join:
    ///
    /// - every instruction of `other` moves to the end of `block`, in order
    /// - every successor `s` of `other` becomes a successor of `block`; the
    ///   predecessor entry of `s` is rewritten in place so phi operand order
    ///   stays aligned (a self-loop on `other` becomes a self-loop on `block`)
    /// - every edge into `other` is removed, including `block -> other`
    ///
    /// Afterwards `other` is empty, has no edges and stays in the layout so
    /// the caller can remove it with [`Function::remove_block`]. If `other`
    /// was the entry block, `block` becomes the entry.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBlock`] for stale handles
    /// - [`Error::SelfMerge`] if `other == block`
    /// - [`Error::BlockComplete`] if `block` is already complete
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ssagraph::ir::Function;
    ///
    /// let mut func = Function::new("f");
    /// let a = func.create_block("a");
    /// let b = func.create_block("b");
    /// let c = func.create_block("c");
    /// func.link_successor(a, b).unwrap();
    /// func.link_successor(b, c).unwrap();
    ///
    /// func.merge_back(a, b).unwrap();
    ///
    /// assert_eq!(func.block(a).unwrap().successors(), &[c]);
    /// assert_eq!(func.block(c).unwrap().predecessors(), &[a]);
    /// assert!(func.block(b).unwrap().predecessors().is_empty());
    /// ```
    pub fn merge_back(&mut self, block: BlockId, other: BlockId) -> Result<()> {
        self.block_ref(block)?;
        self.block_ref(other)?;
        if block == other {
            return Err(Error::SelfMerge(block));
        }
        if self.is_complete(block)? {
            return Err(Error::BlockComplete(block));
        }

        let source = self.block_mut(other)?;
        let code = std::mem::take(&mut source.code);
        let successors = std::mem::take(&mut source.successors);
        let predecessors = std::mem::take(&mut source.predecessors);

        for &instr in &code {
            self.instr_mut(instr)?.block = Some(block);
        }
        let moved = code.len();
        self.block_mut(block)?.code.extend(code);

        for &pred in &predecessors {
            if pred != other {
                self.block_mut(pred)?.successors.retain(|&s| s != other);
            }
        }

        for &succ in &successors {
            let target = if succ == other { block } else { succ };
            let preds = &mut self.block_mut(target)?.predecessors;
            if preds.contains(&block) {
                preds.retain(|&p| p != other);
            } else if let Some(slot) = preds.iter_mut().find(|p| **p == other) {
                *slot = block;
            } else {
                preds.push(block);
            }

            let succs = &mut self.block_mut(block)?.successors;
            if !succs.contains(&target) {
                succs.push(target);
            }
        }

        if self.entry == Some(other) {
            self.entry = Some(block);
        }

        debug!(
            "{}: merged {other} into {block} ({moved} instruction(s), {} successor(s))",
            self.name,
            successors.len()
        );
        Ok(())
    }

    /// Adds the edge `block -> target`. Linking an existing edge does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] for stale handles.
    pub fn link_successor(&mut self, block: BlockId, target: BlockId) -> Result<()> {
        self.block_ref(block)?;
        self.block_ref(target)?;

        let succs = &mut self.block_mut(block)?.successors;
        if !succs.contains(&target) {
            succs.push(target);
        }
        let preds = &mut self.block_mut(target)?.predecessors;
        if !preds.contains(&block) {
            preds.push(block);
        }
        Ok(())
    }

    /// Removes the edge `block -> target`.
    ///
    /// Returns `false` if there was no such edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] for stale handles.
    pub fn unlink_successor(&mut self, block: BlockId, target: BlockId) -> Result<bool> {
        self.block_ref(block)?;
        self.block_ref(target)?;

        let succs = &mut self.block_mut(block)?.successors;
        let before = succs.len();
        succs.retain(|&s| s != target);
        let existed = succs.len() != before;

        self.block_mut(target)?.predecessors.retain(|&p| p != block);
        Ok(existed)
    }

    /// Moves `block` directly after `other` in the layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] for stale handles.
    pub fn move_after(&mut self, block: BlockId, other: BlockId) -> Result<()> {
        self.relocate(block, other, 1)
    }

    /// Moves `block` directly before `other` in the layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] for stale handles.
    pub fn move_before(&mut self, block: BlockId, other: BlockId) -> Result<()> {
        self.relocate(block, other, 0)
    }

    fn relocate(&mut self, block: BlockId, other: BlockId, offset: usize) -> Result<()> {
        let from = self.layout_position(block)?;
        self.layout_position(other)?;
        if block == other {
            return Ok(());
        }

        self.layout.remove(from);
        let anchor = self.layout_position(other)?;
        self.layout.insert(anchor + offset, block);
        Ok(())
    }

    /// Returns `true` if `other` comes before `block` in the layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] for stale handles.
    pub fn is_after(&self, block: BlockId, other: BlockId) -> Result<bool> {
        Ok(self.layout_position(other)? < self.layout_position(block)?)
    }

    /// Returns `true` if `other` comes directly before `block` in the layout,
    /// so that `other` can fall through into `block`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] for stale handles.
    pub fn is_immediately_after(&self, block: BlockId, other: BlockId) -> Result<bool> {
        Ok(self.layout_position(other)? + 1 == self.layout_position(block)?)
    }

    /// Returns the terminator of `block`, if its last instruction is one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] if `block` is stale.
    pub fn terminator(&self, block: BlockId) -> Result<Option<InstrId>> {
        let Some(last) = self.block_ref(block)?.back() else {
            return Ok(None);
        };
        Ok(self.instr_ref(last)?.is_terminator().then_some(last))
    }

    /// Returns `true` if control is guaranteed to leave `block` through its
    /// last instruction.
    ///
    /// That is the case when the last instruction is a terminator, or a `Cpu`
    /// or resolved `Call` whose callee definition never returns. Empty blocks
    /// are never complete.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] if `block` is stale.
    pub fn is_complete(&self, block: BlockId) -> Result<bool> {
        let Some(last) = self.block_ref(block)?.back() else {
            return Ok(false);
        };

        let instr = self.instr_ref(last)?;
        match instr.kind() {
            InstrKind::Terminator(_) => Ok(true),
            InstrKind::Cpu | InstrKind::Call { .. } => Ok(instr
                .callee()
                .and_then(|callee| self.value(callee))
                .and_then(|value| value.as_constant())
                .is_some_and(|constant| constant.is_no_return())),
            InstrKind::Phi => Ok(false),
        }
    }

    /// Destroys `block` together with all of its instructions.
    ///
    /// Every CFG edge touching the block is unlinked and the block leaves the
    /// layout. If it was the entry block the function has no entry afterwards.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBlock`] if `block` is stale
    /// - [`Error::ValueInUse`] if an instruction of the block is used by an
    ///   instruction outside of it; nothing is changed in that case
    pub fn remove_block(&mut self, block: BlockId) -> Result<()> {
        let code = self.block_ref(block)?.code.clone();
        for &instr in &code {
            let outside = self
                .value_ref(instr.value())?
                .uses
                .iter()
                .filter(|user| !code.contains(*user))
                .count();
            if outside > 0 {
                return Err(Error::ValueInUse {
                    value: instr.value(),
                    count: outside,
                });
            }
        }

        let bb = self.block_ref(block)?;
        let successors = bb.successors.clone();
        let predecessors = bb.predecessors.clone();
        for succ in successors {
            self.unlink_successor(block, succ)?;
        }
        for pred in predecessors {
            self.unlink_successor(pred, block)?;
        }

        for &instr in &code {
            self.clear_operands(instr)?;
        }
        for &instr in &code {
            self.values[instr.0] = None;
        }

        self.blocks[block.0] = None;
        self.layout.retain(|&b| b != block);
        if self.entry == Some(block) {
            self.entry = None;
        }

        debug!(
            "{}: removed block {block} with {} instruction(s)",
            self.name,
            code.len()
        );
        Ok(())
    }

    /// Returns the live blocks in layout order.
    #[must_use]
    pub fn layout(&self) -> &[BlockId] {
        &self.layout
    }

    /// Returns the index of `block` in the layout.
    #[must_use]
    pub fn position(&self, block: BlockId) -> Option<usize> {
        self.layout.iter().position(|&b| b == block)
    }

    /// Returns the entry block, where dominance is rooted.
    #[must_use]
    pub const fn entry_block(&self) -> Option<BlockId> {
        self.entry
    }

    /// Makes `block` the entry block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] if `block` is stale.
    pub fn set_entry_block(&mut self, block: BlockId) -> Result<()> {
        self.block_ref(block)?;
        self.entry = Some(block);
        Ok(())
    }

    fn layout_position(&self, block: BlockId) -> Result<usize> {
        self.block_ref(block)?;
        self.position(block).ok_or(Error::InvalidBlock(block))
    }

    fn position_in(&self, block: BlockId, instr: InstrId) -> Result<usize> {
        let code = &self.block_ref(block)?.code;
        self.instr_ref(instr)?;
        code.iter()
            .position(|&i| i == instr)
            .ok_or(Error::NotInBlock { instr, block })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FunctionDefinition, InstructionDefinition, LiteralType};

    #[test]
    fn test_create_block_entry() {
        let mut func = Function::new("f");
        assert_eq!(func.entry_block(), None);

        let a = func.create_block("a");
        let b = func.create_block("b");
        assert_eq!(func.entry_block(), Some(a));
        assert_eq!(func.layout(), &[a, b]);
        assert_eq!(func.block(b).unwrap().name(), "b");

        func.set_entry_block(b).unwrap();
        assert_eq!(func.entry_block(), Some(b));
    }

    #[test]
    fn test_block_accessors() {
        let mut func = Function::new("f");
        let block = func.create_block("entry");
        let one = func.const_int(1);
        let x = func.create_phi(vec![one], "x").unwrap();
        let y = func.create_phi(vec![one], "y").unwrap();
        func.push_back(block, x).unwrap();
        func.push_back(block, y).unwrap();

        let bb = func.block(block).unwrap();
        assert_eq!(bb.len(), 2);
        assert_eq!(bb.front(), Some(x));
        assert_eq!(bb.back(), Some(y));
        assert_eq!(bb.back_n(1), Some(x));
        assert_eq!(bb.back_n(2), None);
        assert_eq!(bb.instruction(1), Some(y));
        assert!(bb.contains(x));
        assert_eq!(func.instr(x).unwrap().block(), Some(block));
    }

    #[test]
    fn test_push_back_rejections() {
        let mut func = Function::new("f");
        let a = func.create_block("a");
        let b = func.create_block("b");
        let one = func.const_int(1);
        let x = func.create_phi(vec![one], "x").unwrap();
        func.push_back(a, x).unwrap();

        assert_eq!(
            func.push_back(b, x),
            Err(Error::AlreadyAttached { instr: x, block: a })
        );

        let ret = func.create_ret(None).unwrap();
        func.push_back(a, ret).unwrap();
        let y = func.create_phi(vec![one], "y").unwrap();
        assert_eq!(func.push_back(a, y), Err(Error::BlockTerminated(a)));
        assert_eq!(func.block(a).unwrap().len(), 2);
        assert_eq!(func.instr(y).unwrap().block(), None);
    }

    #[test]
    fn test_remove_keeps_operands() {
        let mut func = Function::new("f");
        let a = func.create_block("a");
        let b = func.create_block("b");
        let one = func.const_int(1);
        let x = func.create_phi(vec![one], "x").unwrap();
        func.push_back(a, x).unwrap();

        assert_eq!(func.remove(b, x), Err(Error::NotInBlock { instr: x, block: b }));
        assert_eq!(func.remove(a, x).unwrap(), x);
        assert!(func.block(a).unwrap().is_empty());
        assert_eq!(func.instr(x).unwrap().block(), None);
        assert_eq!(func.use_count(one).unwrap(), 1);

        func.push_back(b, x).unwrap();
        assert_eq!(func.instr(x).unwrap().block(), Some(b));
    }

    #[test]
    fn test_replace() {
        let mut func = Function::new("f");
        let block = func.create_block("entry");
        let one = func.const_int(1);
        let x = func.create_phi(vec![one], "x").unwrap();
        let y = func.create_phi(vec![one], "y").unwrap();
        let z = func.create_phi(vec![one], "z").unwrap();
        func.push_back(block, x).unwrap();
        func.push_back(block, y).unwrap();

        assert_eq!(func.replace(block, x, z).unwrap(), x);
        assert_eq!(func.block(block).unwrap().instructions(), &[z, y]);
        assert_eq!(func.instr(x).unwrap().block(), None);
        assert_eq!(func.instr(z).unwrap().block(), Some(block));

        assert_eq!(func.replace(block, z, z), Err(Error::SameInstr(z)));
        assert_eq!(
            func.replace(block, z, y),
            Err(Error::AlreadyAttached { instr: y, block })
        );

        let ret = func.create_ret(None).unwrap();
        assert_eq!(
            func.replace(block, z, ret),
            Err(Error::TerminatorNotLast { instr: ret, block })
        );
        assert_eq!(func.replace_instr(y, ret).unwrap(), y);
        assert_eq!(func.terminator(block).unwrap(), Some(ret));
    }

    #[test]
    fn test_link_unlink() {
        let mut func = Function::new("f");
        let a = func.create_block("a");
        let b = func.create_block("b");

        func.link_successor(a, b).unwrap();
        func.link_successor(a, b).unwrap();
        assert_eq!(func.block(a).unwrap().successors(), &[b]);
        assert_eq!(func.block(b).unwrap().predecessors(), &[a]);

        assert!(func.unlink_successor(a, b).unwrap());
        assert!(!func.unlink_successor(a, b).unwrap());
        assert!(func.block(a).unwrap().successors().is_empty());
        assert!(func.block(b).unwrap().predecessors().is_empty());
    }

    #[test]
    fn test_self_loop_link() {
        let mut func = Function::new("f");
        let a = func.create_block("a");
        func.link_successor(a, a).unwrap();

        let bb = func.block(a).unwrap();
        assert_eq!(bb.successors(), &[a]);
        assert_eq!(bb.predecessors(), &[a]);
    }

    #[test]
    fn test_merge_back_rejections() {
        let mut func = Function::new("f");
        let a = func.create_block("a");
        let b = func.create_block("b");

        assert_eq!(func.merge_back(a, a), Err(Error::SelfMerge(a)));

        let ret = func.create_ret(None).unwrap();
        func.push_back(a, ret).unwrap();
        assert_eq!(func.merge_back(a, b), Err(Error::BlockComplete(a)));
    }

    #[test]
    fn test_merge_back_moves_instructions() {
        let mut func = Function::new("f");
        let a = func.create_block("a");
        let b = func.create_block("b");
        let one = func.const_int(1);
        let x = func.create_phi(vec![one], "x").unwrap();
        let ret = func.create_ret(Some(x.value())).unwrap();
        func.push_back(a, x).unwrap();
        func.push_back(b, ret).unwrap();
        func.link_successor(a, b).unwrap();

        func.merge_back(a, b).unwrap();

        assert_eq!(func.block(a).unwrap().instructions(), &[x, ret]);
        assert_eq!(func.instr(ret).unwrap().block(), Some(a));
        assert!(func.block(b).unwrap().is_empty());
        assert!(func.block(a).unwrap().successors().is_empty());
        assert!(func.is_complete(a).unwrap());
    }

    #[test]
    fn test_merge_back_self_loop_and_foreign_preds() {
        let mut func = Function::new("f");
        let a = func.create_block("a");
        let b = func.create_block("b");
        let c = func.create_block("c");
        let d = func.create_block("d");
        func.link_successor(a, b).unwrap();
        func.link_successor(c, b).unwrap();
        func.link_successor(b, b).unwrap();
        func.link_successor(b, d).unwrap();

        func.merge_back(a, b).unwrap();

        assert_eq!(func.block(a).unwrap().successors(), &[a, d]);
        assert_eq!(func.block(a).unwrap().predecessors(), &[a]);
        assert!(func.block(c).unwrap().successors().is_empty());
        assert_eq!(func.block(d).unwrap().predecessors(), &[a]);
        let merged = func.block(b).unwrap();
        assert!(merged.successors().is_empty());
        assert!(merged.predecessors().is_empty());
    }

    #[test]
    fn test_merge_back_keeps_predecessor_position() {
        let mut func = Function::new("f");
        let a = func.create_block("a");
        let b = func.create_block("b");
        let x = func.create_block("x");
        let join = func.create_block("join");
        func.link_successor(a, b).unwrap();
        func.link_successor(b, join).unwrap();
        func.link_successor(x, join).unwrap();

        func.merge_back(a, b).unwrap();

        assert_eq!(func.block(join).unwrap().predecessors(), &[a, x]);
    }

    #[test]
    fn test_merge_back_hands_over_entry() {
        // a -> entry -> c
        let mut func = Function::new("f");
        let entry = func.create_block("entry");
        let a = func.create_block("a");
        let c = func.create_block("c");
        func.link_successor(entry, c).unwrap();
        func.link_successor(a, entry).unwrap();

        func.merge_back(a, entry).unwrap();

        assert_eq!(func.entry_block(), Some(a));
        assert_eq!(func.block(a).unwrap().successors(), &[c]);
        assert_eq!(func.dominators(c).unwrap(), vec![a, c]);

        func.remove_block(entry).unwrap();
        assert_eq!(func.entry_block(), Some(a));
        assert_eq!(func.immediate_dominator(c).unwrap(), Some(a));
    }

    #[test]
    fn test_move_and_order() {
        let mut func = Function::new("f");
        let a = func.create_block("a");
        let b = func.create_block("b");
        let c = func.create_block("c");

        func.move_after(a, c).unwrap();
        assert_eq!(func.layout(), &[b, c, a]);
        assert!(func.is_after(a, b).unwrap());
        assert!(func.is_immediately_after(a, c).unwrap());
        assert!(!func.is_immediately_after(a, b).unwrap());

        func.move_before(a, b).unwrap();
        assert_eq!(func.layout(), &[a, b, c]);
        assert!(!func.is_after(a, c).unwrap());

        func.move_after(b, b).unwrap();
        assert_eq!(func.layout(), &[a, b, c]);
        assert_eq!(func.position(c), Some(2));
    }

    #[test]
    fn test_is_complete() {
        let mut func = Function::new("f");
        let block = func.create_block("entry");
        assert!(!func.is_complete(block).unwrap());

        let one = func.const_int(1);
        let x = func.create_phi(vec![one], "x").unwrap();
        func.push_back(block, x).unwrap();
        assert!(!func.is_complete(block).unwrap());
        assert_eq!(func.terminator(block).unwrap(), None);

        let exit = func.create_function_definition(
            FunctionDefinition::new("exit", LiteralType::Void).with_no_return(),
        );
        let call = func.create_call("exit", Some(exit), vec![one], "").unwrap();
        func.push_back(block, call).unwrap();
        assert!(func.is_complete(block).unwrap());
        assert_eq!(func.terminator(block).unwrap(), None);
    }

    #[test]
    fn test_is_complete_returning_callee() {
        let mut func = Function::new("f");
        let block = func.create_block("entry");
        let def = func.create_instruction_definition(InstructionDefinition::new("nop", LiteralType::Void));
        let cpu = func.create_cpu(def, vec![], "").unwrap();
        func.push_back(block, cpu).unwrap();
        assert!(!func.is_complete(block).unwrap());

        let unresolved = func.create_call("exit", None, vec![], "").unwrap();
        func.push_back(block, unresolved).unwrap();
        assert!(!func.is_complete(block).unwrap());
    }

    #[test]
    fn test_remove_block() {
        let mut func = Function::new("f");
        let a = func.create_block("a");
        let b = func.create_block("b");
        let one = func.const_int(1);
        let x = func.create_phi(vec![one], "x").unwrap();
        let y = func.create_phi(vec![x.value(), one], "y").unwrap();
        func.push_back(b, x).unwrap();
        func.push_back(b, y).unwrap();
        func.link_successor(a, b).unwrap();
        func.link_successor(b, b).unwrap();

        func.remove_block(b).unwrap();

        assert!(func.block(b).is_none());
        assert!(func.instr(x).is_none());
        assert!(func.instr(y).is_none());
        assert!(!func.is_used(one).unwrap());
        assert!(func.block(a).unwrap().successors().is_empty());
        assert_eq!(func.layout(), &[a]);
        assert_eq!(func.push_back(b, x), Err(Error::InvalidBlock(b)));
    }

    #[test]
    fn test_remove_block_in_use() {
        let mut func = Function::new("f");
        let a = func.create_block("a");
        let b = func.create_block("b");
        let one = func.const_int(1);
        let x = func.create_phi(vec![one], "x").unwrap();
        let y = func.create_phi(vec![x.value()], "y").unwrap();
        func.push_back(a, x).unwrap();
        func.push_back(b, y).unwrap();

        assert_eq!(
            func.remove_block(a),
            Err(Error::ValueInUse { value: x.value(), count: 1 })
        );
        assert_eq!(func.instr(x).unwrap().block(), Some(a));

        func.remove_block(b).unwrap();
        func.remove_block(a).unwrap();
        assert_eq!(func.entry_block(), None);
        assert!(func.layout().is_empty());
    }
}
