//! Instructions and operand editing.
//!
//! An [`Instr`] is a value that owns an ordered list of operand handles and
//! belongs to at most one basic block. Operands are references: they are
//! shared with every other user of the same value and never owned.
//!
//! # Kinds
//!
//! The set of instruction kinds is closed ([`InstrKind`]):
//!
//! - **Phi** - register allocation hint unifying several incoming values; it
//!   has no executable semantics
//! - **Terminator** - ends a block's control flow ([`TerminatorKind`])
//! - **Cpu** - executes a target instruction; operand 0 is an
//!   [`crate::ir::InstructionDefinition`]
//! - **Call** - symbolic call by label; once resolved, operand 0 is a
//!   [`crate::ir::FunctionDefinition`]
//!
//! Consumers dispatch with an exhaustive `match` or through
//! [`crate::ir::InstrVisitor`].
//!
//! # Use-list maintenance
//!
//! Every operand edit made through [`Function`] adds or removes exactly one
//! use entry per slot it writes or clears, so the operand lists and the use
//! lists always describe the same edges.

use log::{debug, trace};

use crate::{
    ir::{BlockId, Constant, Function, InstrId, InstrVisitor, LiteralType, Value, ValueId, ValueKind},
    Error, Result,
};

/// Concrete forms of block terminators.
///
/// Block targets are part of the kind, not operands, and creating or appending
/// a terminator does not touch the CFG. The builder links successors
/// explicitly with [`Function::link_successor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminatorKind {
    /// Unconditional branch
    Br {
        /// Branch target
        target: BlockId,
    },
    /// Two-way branch on operand 0
    CondBr {
        /// Target when the condition holds
        on_true: BlockId,
        /// Target otherwise
        on_false: BlockId,
    },
    /// Multi-way branch on operand 0; operand `i + 1` is the value of case `i`
    Match {
        /// Target per case, parallel to operands `1..`
        cases: Vec<BlockId>,
        /// Target when no case matches
        otherwise: BlockId,
    },
    /// Function return, optionally with operand 0 as result
    Ret,
}

impl TerminatorKind {
    /// Returns the blocks this terminator may transfer control to, in order.
    #[must_use]
    pub fn targets(&self) -> Vec<BlockId> {
        match self {
            TerminatorKind::Br { target } => vec![*target],
            TerminatorKind::CondBr { on_true, on_false } => vec![*on_true, *on_false],
            TerminatorKind::Match { cases, otherwise } => {
                let mut targets = cases.clone();
                targets.push(*otherwise);
                targets
            }
            TerminatorKind::Ret => Vec::new(),
        }
    }
}

/// The closed set of instruction kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrKind {
    /// Register allocation hint over incoming values
    Phi,
    /// Block terminator
    Terminator(TerminatorKind),
    /// Target instruction; operand 0 is its definition
    Cpu,
    /// Symbolic call to `label`
    Call {
        /// Symbol being called
        label: String,
        /// Whether operand 0 holds the resolved function definition
        resolved: bool,
    },
}

impl InstrKind {
    /// Returns `true` for block terminators.
    #[must_use]
    pub const fn is_terminator(&self) -> bool {
        matches!(self, InstrKind::Terminator(_))
    }

    /// Returns `true` for `Cpu` and `Call` instructions.
    #[must_use]
    pub const fn is_call(&self) -> bool {
        matches!(self, InstrKind::Cpu | InstrKind::Call { .. })
    }

    /// Returns a short lowercase name for the kind, as used in listings.
    #[must_use]
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            InstrKind::Phi => "phi",
            InstrKind::Terminator(TerminatorKind::Br { .. }) => "br",
            InstrKind::Terminator(TerminatorKind::CondBr { .. }) => "condbr",
            InstrKind::Terminator(TerminatorKind::Match { .. }) => "match",
            InstrKind::Terminator(TerminatorKind::Ret) => "ret",
            InstrKind::Cpu => "cpu",
            InstrKind::Call { .. } => "call",
        }
    }
}

/// Instruction payload of a value.
#[derive(Debug, Clone)]
pub struct Instr {
    pub(crate) kind: InstrKind,
    pub(crate) operands: Vec<ValueId>,
    pub(crate) block: Option<BlockId>,
}

impl Instr {
    /// Returns the kind of this instruction.
    #[must_use]
    pub const fn kind(&self) -> &InstrKind {
        &self.kind
    }

    /// Returns the operand handles in slot order.
    #[must_use]
    pub fn operands(&self) -> &[ValueId] {
        &self.operands
    }

    /// Returns the operand in slot `index`, if any.
    #[must_use]
    pub fn operand(&self, index: usize) -> Option<ValueId> {
        self.operands.get(index).copied()
    }

    /// Returns the owning block, or `None` if detached.
    #[must_use]
    pub const fn block(&self) -> Option<BlockId> {
        self.block
    }

    /// Returns `true` if this instruction is a block terminator.
    #[must_use]
    pub const fn is_terminator(&self) -> bool {
        self.kind.is_terminator()
    }

    /// Returns the branch targets of a terminator, empty for anything else.
    #[must_use]
    pub fn targets(&self) -> Vec<BlockId> {
        match &self.kind {
            InstrKind::Terminator(term) => term.targets(),
            _ => Vec::new(),
        }
    }

    /// Returns the callee definition of a `Cpu` or resolved `Call`.
    #[must_use]
    pub fn callee(&self) -> Option<ValueId> {
        match &self.kind {
            InstrKind::Cpu | InstrKind::Call { resolved: true, .. } => self.operand(0),
            _ => None,
        }
    }

    /// Returns the operands following the callee of a call-like instruction,
    /// or all operands for every other kind.
    #[must_use]
    pub fn arguments(&self) -> &[ValueId] {
        match self.callee() {
            Some(_) => &self.operands[1..],
            None => &self.operands,
        }
    }
}

impl Function {
    /// Creates a detached instruction of any kind.
    ///
    /// One use edge is added per operand slot. The specialized constructors
    /// below derive the result type and check operand 0 conventions; this one
    /// trusts the caller with those, but still checks handles.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidValue`] if any operand is stale
    /// - [`Error::InvalidBlock`] if a terminator targets a stale block
    ///
    /// Nothing is allocated in either case.
    pub fn create_instr(
        &mut self,
        kind: InstrKind,
        ty: LiteralType,
        operands: Vec<ValueId>,
        name: impl Into<String>,
    ) -> Result<InstrId> {
        for &operand in &operands {
            self.value_ref(operand)?;
        }
        if let InstrKind::Terminator(term) = &kind {
            for target in term.targets() {
                self.block_ref(target)?;
            }
        }

        let id = InstrId(self.values.len());
        for &operand in &operands {
            self.value_mut(operand)?.uses.push(id);
        }

        let value = Value::new(
            ty,
            name,
            ValueKind::Instr(Instr {
                kind,
                operands,
                block: None,
            }),
        );
        let allocated = self.alloc_value(value);
        debug_assert_eq!(allocated.0, id.0);
        Ok(id)
    }

    /// Creates a phi over `operands`, typed after the first operand.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingOperands`] if `operands` is empty
    /// - [`Error::InvalidValue`] if any operand is stale
    pub fn create_phi(&mut self, operands: Vec<ValueId>, name: impl Into<String>) -> Result<InstrId> {
        let Some(&first) = operands.first() else {
            return Err(Error::MissingOperands);
        };
        let ty = self.value_ref(first)?.ty;
        self.create_instr(InstrKind::Phi, ty, operands, name)
    }

    /// Creates a target instruction call. The result type is the definition's
    /// return type.
    ///
    /// # Errors
    ///
    /// - [`Error::NotACallee`] if `definition` is not an instruction definition
    /// - [`Error::InvalidValue`] if any handle is stale
    pub fn create_cpu(
        &mut self,
        definition: ValueId,
        args: Vec<ValueId>,
        name: impl Into<String>,
    ) -> Result<InstrId> {
        let ty = match self.value_ref(definition)?.as_constant() {
            Some(Constant::Instruction(def)) => def.return_type(),
            _ => return Err(Error::NotACallee(definition)),
        };

        let mut operands = Vec::with_capacity(args.len() + 1);
        operands.push(definition);
        operands.extend(args);
        self.create_instr(InstrKind::Cpu, ty, operands, name)
    }

    /// Creates a symbolic call to `label`.
    ///
    /// With a resolved `callee` the definition becomes operand 0 and provides
    /// the result type. An unresolved call is typed `Void` and its operands are
    /// just the arguments.
    ///
    /// # Errors
    ///
    /// - [`Error::NotACallee`] if `callee` is not a function definition
    /// - [`Error::InvalidValue`] if any handle is stale
    pub fn create_call(
        &mut self,
        label: impl Into<String>,
        callee: Option<ValueId>,
        args: Vec<ValueId>,
        name: impl Into<String>,
    ) -> Result<InstrId> {
        let label = label.into();
        let Some(callee) = callee else {
            return self.create_instr(
                InstrKind::Call {
                    label,
                    resolved: false,
                },
                LiteralType::Void,
                args,
                name,
            );
        };

        let ty = match self.value_ref(callee)?.as_constant() {
            Some(Constant::Function(def)) => def.return_type(),
            _ => return Err(Error::NotACallee(callee)),
        };

        let mut operands = Vec::with_capacity(args.len() + 1);
        operands.push(callee);
        operands.extend(args);
        self.create_instr(
            InstrKind::Call {
                label,
                resolved: true,
            },
            ty,
            operands,
            name,
        )
    }

    /// Creates an unconditional branch to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] if `target` is stale.
    pub fn create_br(&mut self, target: BlockId) -> Result<InstrId> {
        self.create_terminator(TerminatorKind::Br { target }, Vec::new())
    }

    /// Creates a two-way branch on `condition`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] or [`Error::InvalidBlock`] for stale handles.
    pub fn create_cond_br(
        &mut self,
        condition: ValueId,
        on_true: BlockId,
        on_false: BlockId,
    ) -> Result<InstrId> {
        self.create_terminator(TerminatorKind::CondBr { on_true, on_false }, vec![condition])
    }

    /// Creates a multi-way branch on `condition`.
    ///
    /// Each case pairs a case value with its target; the case values become
    /// operands `1..` in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] or [`Error::InvalidBlock`] for stale handles.
    pub fn create_match(
        &mut self,
        condition: ValueId,
        cases: Vec<(ValueId, BlockId)>,
        otherwise: BlockId,
    ) -> Result<InstrId> {
        let mut operands = Vec::with_capacity(cases.len() + 1);
        let mut targets = Vec::with_capacity(cases.len());
        operands.push(condition);
        for (value, target) in cases {
            operands.push(value);
            targets.push(target);
        }
        self.create_terminator(
            TerminatorKind::Match {
                cases: targets,
                otherwise,
            },
            operands,
        )
    }

    /// Creates a return, optionally carrying `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if `value` is stale.
    pub fn create_ret(&mut self, value: Option<ValueId>) -> Result<InstrId> {
        self.create_terminator(TerminatorKind::Ret, value.into_iter().collect())
    }

    fn create_terminator(&mut self, kind: TerminatorKind, operands: Vec<ValueId>) -> Result<InstrId> {
        self.create_instr(InstrKind::Terminator(kind), LiteralType::Void, operands, "")
    }

    /// Returns the operands of `instr` in slot order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInstr`] if `instr` is stale.
    pub fn operands(&self, instr: InstrId) -> Result<&[ValueId]> {
        Ok(self.instr_ref(instr)?.operands())
    }

    /// Appends `value` as a new last operand of `instr`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInstr`] or [`Error::InvalidValue`] for stale handles.
    pub fn add_operand(&mut self, instr: InstrId, value: ValueId) -> Result<()> {
        self.instr_ref(instr)?;
        self.value_mut(value)?.uses.push(instr);
        self.instr_mut(instr)?.operands.push(value);
        Ok(())
    }

    /// Overwrites operand slot `index` of `instr` with `value`.
    ///
    /// Returns the value previously held by the slot. Its use entry for
    /// `instr` is removed and one is added to `value`.
    ///
    /// # Errors
    ///
    /// - [`Error::OperandOutOfRange`] if `index` is past the last operand
    /// - [`Error::InvalidInstr`] or [`Error::InvalidValue`] for stale handles
    pub fn set_operand(&mut self, instr: InstrId, index: usize, value: ValueId) -> Result<ValueId> {
        let count = self.instr_ref(instr)?.operands.len();
        self.value_ref(value)?;
        if index >= count {
            return Err(Error::OperandOutOfRange { index, count });
        }

        let previous = std::mem::replace(&mut self.instr_mut(instr)?.operands[index], value);
        self.remove_use(previous, instr)?;
        self.value_mut(value)?.uses.push(instr);
        Ok(previous)
    }

    /// Rewrites every operand slot of `instr` equal to `old` to `new`.
    ///
    /// Returns the number of slots changed, 0 if none matched or if `old`
    /// equals `new`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInstr`] or [`Error::InvalidValue`] for stale handles.
    pub fn replace_operand(&mut self, instr: InstrId, old: ValueId, new: ValueId) -> Result<usize> {
        self.instr_ref(instr)?;
        self.value_ref(old)?;
        self.value_ref(new)?;
        if old == new {
            return Ok(0);
        }

        let mut changed = 0;
        for slot in &mut self.instr_mut(instr)?.operands {
            if *slot == old {
                *slot = new;
                changed += 1;
            }
        }

        for _ in 0..changed {
            self.remove_use(old, instr)?;
            self.value_mut(new)?.uses.push(instr);
        }

        if changed > 0 {
            trace!("{instr}: {old} -> {new} in {changed} slot(s)");
        }
        Ok(changed)
    }

    /// Removes every operand of `instr`, dropping one use edge per slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInstr`] if `instr` is stale.
    pub fn clear_operands(&mut self, instr: InstrId) -> Result<()> {
        let operands = std::mem::take(&mut self.instr_mut(instr)?.operands);
        for operand in operands {
            self.remove_use(operand, instr)?;
        }
        Ok(())
    }

    /// Puts `new_instr` in the place of `instr` within its owning block.
    ///
    /// Returns `instr`, now detached with its operands intact. Use edges are
    /// not rewritten; combine with [`Function::replace_all_uses_with`] to
    /// redirect users.
    ///
    /// # Errors
    ///
    /// - [`Error::DetachedInstr`] if `instr` has no owning block
    /// - every error of [`Function::replace`]
    pub fn replace_instr(&mut self, instr: InstrId, new_instr: InstrId) -> Result<InstrId> {
        let Some(block) = self.instr_ref(instr)?.block else {
            return Err(Error::DetachedInstr(instr));
        };
        self.replace(block, instr, new_instr)
    }

    /// Creates a detached copy of `instr` with the same kind, type, name and
    /// operand list. One use edge is added per copied operand slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInstr`] if `instr` is stale.
    pub fn clone_instr(&mut self, instr: InstrId) -> Result<InstrId> {
        let source = self.instr_ref(instr)?;
        let kind = source.kind.clone();
        let operands = source.operands.clone();
        let value = self.value_ref(instr.value())?;
        let (ty, name) = (value.ty, value.name.clone());

        self.create_instr(kind, ty, operands, name)
    }

    /// Destroys a detached instruction that nothing outside itself uses.
    ///
    /// The operand edges of the instruction are torn down first. Uses of the
    /// instruction by its own operands (a phi closing a loop over itself) do
    /// not keep it alive.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInstr`] if `instr` is stale
    /// - [`Error::AlreadyAttached`] if it still belongs to a block
    /// - [`Error::ValueInUse`] if another instruction uses it
    pub fn erase_instr(&mut self, instr: InstrId) -> Result<()> {
        if let Some(block) = self.instr_ref(instr)?.block {
            return Err(Error::AlreadyAttached { instr, block });
        }

        let external = self.external_uses(instr)?;
        if external > 0 {
            return Err(Error::ValueInUse {
                value: instr.value(),
                count: external,
            });
        }

        self.clear_operands(instr)?;
        self.values[instr.0] = None;
        debug!("{}: erased instruction {instr}", self.name);
        Ok(())
    }

    /// Number of use entries of `instr` coming from other instructions.
    pub(crate) fn external_uses(&self, instr: InstrId) -> Result<usize> {
        Ok(self
            .value_ref(instr.value())?
            .uses
            .iter()
            .filter(|&&user| user != instr)
            .count())
    }

    /// Dispatches `instr` to the visitor method matching its kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInstr`] if `instr` is stale.
    pub fn accept<V: InstrVisitor + ?Sized>(&self, instr: InstrId, visitor: &mut V) -> Result<()> {
        match &self.instr_ref(instr)?.kind {
            InstrKind::Phi => visitor.visit_phi(self, instr),
            InstrKind::Terminator(TerminatorKind::Br { target }) => {
                visitor.visit_br(self, instr, *target);
            }
            InstrKind::Terminator(TerminatorKind::CondBr { on_true, on_false }) => {
                visitor.visit_cond_br(self, instr, *on_true, *on_false);
            }
            InstrKind::Terminator(TerminatorKind::Match { cases, otherwise }) => {
                visitor.visit_match(self, instr, cases, *otherwise);
            }
            InstrKind::Terminator(TerminatorKind::Ret) => visitor.visit_ret(self, instr),
            InstrKind::Cpu => visitor.visit_cpu(self, instr),
            InstrKind::Call { label, .. } => visitor.visit_call(self, instr, label),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FunctionDefinition, InstructionDefinition};

    #[test]
    fn test_create_phi_typing() {
        let mut func = Function::new("f");
        let a = func.const_uint(1);
        let b = func.const_uint(2);
        let phi = func.create_phi(vec![a, b], "x").unwrap();

        let value = func.value(phi.value()).unwrap();
        assert_eq!(value.ty(), LiteralType::UInt);
        assert_eq!(value.name(), "x");
        assert_eq!(func.instr(phi).unwrap().kind(), &InstrKind::Phi);
        assert_eq!(func.instr(phi).unwrap().block(), None);
    }

    #[test]
    fn test_create_phi_empty() {
        let mut func = Function::new("f");
        assert_eq!(func.create_phi(Vec::new(), "x"), Err(Error::MissingOperands));
    }

    #[test]
    fn test_create_instr_rejects_stale_operand_without_allocating() {
        let mut func = Function::new("f");
        let a = func.const_int(1);
        let stale = ValueId(99);

        assert_eq!(
            func.create_instr(InstrKind::Phi, LiteralType::Int, vec![a, stale], "x"),
            Err(Error::InvalidValue(stale))
        );
        assert_eq!(func.use_count(a).unwrap(), 0);
        assert_eq!(func.values().count(), 1);
    }

    #[test]
    fn test_create_instr_rejects_stale_target() {
        let mut func = Function::new("f");
        let block = func.create_block("entry");
        let stale = BlockId(99);

        let kind = InstrKind::Terminator(TerminatorKind::Br { target: stale });
        assert_eq!(
            func.create_instr(kind, LiteralType::Void, vec![], ""),
            Err(Error::InvalidBlock(stale))
        );

        let cond = func.const_int(0);
        let kind = InstrKind::Terminator(TerminatorKind::Match {
            cases: vec![block],
            otherwise: stale,
        });
        assert_eq!(
            func.create_instr(kind, LiteralType::Void, vec![cond, cond], ""),
            Err(Error::InvalidBlock(stale))
        );
        assert_eq!(func.use_count(cond).unwrap(), 0);
        assert_eq!(func.values().count(), 1);

        let kind = InstrKind::Terminator(TerminatorKind::Br { target: block });
        let br = func.create_instr(kind, LiteralType::Void, vec![], "").unwrap();
        assert_eq!(func.instr(br).unwrap().targets(), vec![block]);
    }

    #[test]
    fn test_create_cpu() {
        let mut func = Function::new("f");
        let def = func.create_instruction_definition(InstructionDefinition::new("add", LiteralType::Int));
        let a = func.const_int(1);
        let b = func.const_int(2);
        let add = func.create_cpu(def, vec![a, b], "sum").unwrap();

        let instr = func.instr(add).unwrap();
        assert_eq!(instr.callee(), Some(def));
        assert_eq!(instr.arguments(), &[a, b]);
        assert_eq!(func.value(add.value()).unwrap().ty(), LiteralType::Int);
        assert_eq!(func.uses(def).unwrap(), &[add]);

        assert_eq!(func.create_cpu(a, vec![], "bad"), Err(Error::NotACallee(a)));
    }

    #[test]
    fn test_create_call() {
        let mut func = Function::new("f");
        let puts = func.create_function_definition(FunctionDefinition::new("puts", LiteralType::Int));
        let s = func.const_string("hi");

        let resolved = func.create_call("puts", Some(puts), vec![s], "r").unwrap();
        let instr = func.instr(resolved).unwrap();
        assert_eq!(instr.callee(), Some(puts));
        assert_eq!(instr.arguments(), &[s]);
        assert_eq!(func.value(resolved.value()).unwrap().ty(), LiteralType::Int);

        let unresolved = func.create_call("later", None, vec![s], "").unwrap();
        let instr = func.instr(unresolved).unwrap();
        assert_eq!(instr.callee(), None);
        assert_eq!(instr.arguments(), &[s]);
        assert_eq!(func.value(unresolved.value()).unwrap().ty(), LiteralType::Void);

        let cpu_def = func.create_instruction_definition(InstructionDefinition::new("nop", LiteralType::Void));
        assert_eq!(
            func.create_call("nop", Some(cpu_def), vec![], ""),
            Err(Error::NotACallee(cpu_def))
        );
    }

    #[test]
    fn test_create_terminators() {
        let mut func = Function::new("f");
        let a = func.create_block("a");
        let b = func.create_block("b");
        let c = func.const_int(0);
        let one = func.const_int(1);

        let br = func.create_br(b).unwrap();
        assert_eq!(func.instr(br).unwrap().targets(), vec![b]);

        let cond = func.create_cond_br(c, a, b).unwrap();
        assert_eq!(func.instr(cond).unwrap().targets(), vec![a, b]);
        assert_eq!(func.operands(cond).unwrap(), &[c]);

        let m = func.create_match(c, vec![(one, a)], b).unwrap();
        assert_eq!(func.instr(m).unwrap().targets(), vec![a, b]);
        assert_eq!(func.operands(m).unwrap(), &[c, one]);

        let ret = func.create_ret(Some(c)).unwrap();
        assert!(func.instr(ret).unwrap().is_terminator());
        assert_eq!(func.value(ret.value()).unwrap().ty(), LiteralType::Void);

        assert_eq!(func.create_br(BlockId(42)), Err(Error::InvalidBlock(BlockId(42))));
    }

    #[test]
    fn test_set_operand() {
        let mut func = Function::new("f");
        let a = func.const_int(1);
        let b = func.const_int(2);
        let phi = func.create_phi(vec![a, a], "x").unwrap();

        assert_eq!(func.set_operand(phi, 1, b).unwrap(), a);
        assert_eq!(func.operands(phi).unwrap(), &[a, b]);
        assert_eq!(func.use_count(a).unwrap(), 1);
        assert_eq!(func.use_count(b).unwrap(), 1);

        assert_eq!(
            func.set_operand(phi, 2, b),
            Err(Error::OperandOutOfRange { index: 2, count: 2 })
        );
        assert_eq!(func.use_count(b).unwrap(), 1);
    }

    #[test]
    fn test_replace_operand_counts_slots() {
        let mut func = Function::new("f");
        let a = func.const_int(1);
        let b = func.const_int(2);
        let c = func.const_int(3);
        let phi = func.create_phi(vec![a, b, a], "x").unwrap();

        assert_eq!(func.replace_operand(phi, a, c).unwrap(), 2);
        assert_eq!(func.operands(phi).unwrap(), &[c, b, c]);
        assert_eq!(func.use_count(a).unwrap(), 0);
        assert_eq!(func.use_count(c).unwrap(), 2);

        assert_eq!(func.replace_operand(phi, a, c).unwrap(), 0);
        assert_eq!(func.replace_operand(phi, b, b).unwrap(), 0);
    }

    #[test]
    fn test_add_and_clear_operands() {
        let mut func = Function::new("f");
        let a = func.const_int(1);
        let b = func.const_int(2);
        let phi = func.create_phi(vec![a], "x").unwrap();

        func.add_operand(phi, b).unwrap();
        func.add_operand(phi, a).unwrap();
        assert_eq!(func.operands(phi).unwrap(), &[a, b, a]);
        assert_eq!(func.use_count(a).unwrap(), 2);

        func.clear_operands(phi).unwrap();
        assert!(func.operands(phi).unwrap().is_empty());
        assert!(!func.is_used(a).unwrap());
        assert!(!func.is_used(b).unwrap());
    }

    #[test]
    fn test_clone_instr() {
        let mut func = Function::new("f");
        let a = func.const_int(1);
        let b = func.const_int(2);
        let block = func.create_block("entry");
        let phi = func.create_phi(vec![a, b], "x").unwrap();
        func.push_back(block, phi).unwrap();

        let copy = func.clone_instr(phi).unwrap();
        assert_ne!(copy, phi);
        assert_eq!(func.operands(copy).unwrap(), &[a, b]);
        assert_eq!(func.instr(copy).unwrap().block(), None);
        assert_eq!(func.value(copy.value()).unwrap().name(), "x");
        assert_eq!(func.use_count(a).unwrap(), 2);
        assert_eq!(func.use_count(b).unwrap(), 2);
    }

    #[test]
    fn test_replace_instr_detached() {
        let mut func = Function::new("f");
        let a = func.const_int(1);
        let x = func.create_phi(vec![a], "x").unwrap();
        let y = func.create_phi(vec![a], "y").unwrap();

        assert_eq!(func.replace_instr(x, y), Err(Error::DetachedInstr(x)));
    }

    #[test]
    fn test_erase_instr() {
        let mut func = Function::new("f");
        let a = func.const_int(1);
        let block = func.create_block("entry");
        let x = func.create_phi(vec![a], "x").unwrap();
        let y = func.create_phi(vec![x.value()], "y").unwrap();
        func.push_back(block, y).unwrap();

        assert_eq!(
            func.erase_instr(x),
            Err(Error::ValueInUse { value: x.value(), count: 1 })
        );
        assert_eq!(
            func.erase_instr(y),
            Err(Error::AlreadyAttached { instr: y, block })
        );

        func.remove(block, y).unwrap();
        func.erase_instr(y).unwrap();
        func.erase_instr(x).unwrap();
        assert!(!func.is_used(a).unwrap());
        assert!(func.instr(x).is_none());
        assert_eq!(func.operands(x), Err(Error::InvalidInstr(x)));
    }

    #[test]
    fn test_erase_self_referencing_phi() {
        let mut func = Function::new("f");
        let a = func.const_int(1);
        let phi = func.create_phi(vec![a], "x").unwrap();
        func.add_operand(phi, phi.value()).unwrap();

        func.erase_instr(phi).unwrap();
        assert!(!func.is_used(a).unwrap());
    }

    #[test]
    fn test_accept_dispatch() {
        #[derive(Default)]
        struct Names(Vec<&'static str>);

        impl InstrVisitor for Names {
            fn visit_phi(&mut self, _func: &Function, _instr: InstrId) {
                self.0.push("phi");
            }

            fn visit_br(&mut self, _func: &Function, _instr: InstrId, _target: BlockId) {
                self.0.push("br");
            }

            fn visit_call(&mut self, _func: &Function, _instr: InstrId, label: &str) {
                assert_eq!(label, "puts");
                self.0.push("call");
            }
        }

        let mut func = Function::new("f");
        let block = func.create_block("entry");
        let a = func.const_int(1);
        let phi = func.create_phi(vec![a], "x").unwrap();
        let call = func.create_call("puts", None, vec![a], "").unwrap();
        let ret = func.create_ret(None).unwrap();
        let br = func.create_br(block).unwrap();

        let mut names = Names::default();
        for instr in [phi, call, ret, br] {
            func.accept(instr, &mut names).unwrap();
        }

        // ret falls through to the default no-op
        assert_eq!(names.0, vec!["phi", "call", "br"]);
    }

    #[test]
    fn test_kind_mnemonics() {
        assert_eq!(InstrKind::Phi.mnemonic(), "phi");
        assert_eq!(InstrKind::Terminator(TerminatorKind::Ret).mnemonic(), "ret");
        assert!(InstrKind::Cpu.is_call());
        assert!(!InstrKind::Phi.is_terminator());
    }
}
