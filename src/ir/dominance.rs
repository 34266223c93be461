//! Dominance queries on blocks.
//!
//! Each query runs the dominator fixpoint of
//! [`crate::utils::graph::algorithms::compute_dominator_sets`] over the
//! current CFG, so results always reflect the latest edits. Passes that ask
//! many questions in a row should take a [`DominatorTree`] snapshot with
//! [`Function::dominator_tree`] instead.
//!
//! Dominance is undefined for blocks the entry cannot reach; querying one
//! returns [`Error::UnreachableBlock`].

use crate::{
    ir::{BlockId, Function},
    utils::graph::algorithms::{compute_dominator_sets, DominatorSets, DominatorTree},
    Error, Result,
};

impl Function {
    fn dominator_sets_for(&self, block: BlockId) -> Result<DominatorSets> {
        self.block_ref(block)?;
        let sets = compute_dominator_sets(&self.cfg()?);
        if !sets.is_reachable(block.into()) {
            return Err(Error::UnreachableBlock(block));
        }
        Ok(sets)
    }

    /// Returns every block that lies on all paths from the entry to `block`,
    /// `block` itself included, in ascending handle order.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBlock`] if `block` is stale
    /// - [`Error::NoEntryBlock`] if the function has no entry
    /// - [`Error::UnreachableBlock`] if the entry cannot reach `block`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ssagraph::ir::Function;
    ///
    /// let mut func = Function::new("f");
    /// let entry = func.create_block("entry");
    /// let then = func.create_block("then");
    /// let join = func.create_block("join");
    /// func.link_successor(entry, then).unwrap();
    /// func.link_successor(entry, join).unwrap();
    /// func.link_successor(then, join).unwrap();
    ///
    /// assert_eq!(func.dominators(join).unwrap(), vec![entry, join]);
    /// assert_eq!(func.dominators(entry).unwrap(), vec![entry]);
    /// ```
    pub fn dominators(&self, block: BlockId) -> Result<Vec<BlockId>> {
        let sets = self.dominator_sets_for(block)?;
        Ok(sets
            .dominators(block.into())
            .map(|set| set.iter().map(BlockId).collect())
            .unwrap_or_default())
    }

    /// Returns the strict dominators of `block` that do not dominate another
    /// strict dominator of `block`.
    ///
    /// The result is empty for the entry block and holds exactly one block
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`Function::dominators`].
    pub fn immediate_dominators(&self, block: BlockId) -> Result<Vec<BlockId>> {
        let sets = self.dominator_sets_for(block)?;
        Ok(sets
            .immediate_dominators(block.into())
            .into_iter()
            .map(BlockId::from)
            .collect())
    }

    /// Returns the immediate dominator of `block`, `None` for the entry.
    ///
    /// # Errors
    ///
    /// Same as [`Function::dominators`].
    pub fn immediate_dominator(&self, block: BlockId) -> Result<Option<BlockId>> {
        let sets = self.dominator_sets_for(block)?;
        Ok(sets.immediate_dominator(block.into()).map(BlockId::from))
    }

    /// Returns `true` if every path from the entry to `block` passes through
    /// `dominator`. A reachable block dominates itself; an unreachable
    /// `dominator` dominates nothing.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBlock`] if either handle is stale
    /// - [`Error::NoEntryBlock`] if the function has no entry
    /// - [`Error::UnreachableBlock`] if the entry cannot reach `block`
    pub fn dominates(&self, dominator: BlockId, block: BlockId) -> Result<bool> {
        self.block_ref(dominator)?;
        let sets = self.dominator_sets_for(block)?;
        Ok(sets.dominates(dominator.into(), block.into()))
    }

    /// Computes the dominator tree of the current CFG.
    ///
    /// The tree is a snapshot; later CFG edits do not update it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEntryBlock`] if the function has no entry.
    pub fn dominator_tree(&self) -> Result<DominatorTree> {
        Ok(DominatorTree::from_sets(&compute_dominator_sets(&self.cfg()?)))
    }
}
