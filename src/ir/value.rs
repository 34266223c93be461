//! Values, constants and use lists.
//!
//! Every node of the use-def graph is a [`Value`]: it has a literal type, a
//! display name and an ordered use list. The use list holds one entry per
//! operand slot that references the value, so an instruction reading the same
//! value twice appears twice. Operand editing on [`crate::ir::Function`] keeps
//! the use lists in step with the operand lists; the low-level
//! [`Function::add_use`] and [`Function::remove_use`] are exposed for callers
//! that maintain operand storage themselves.
//!
//! # Constants
//!
//! Constants are leaf values with no operands and no owning block. Literal
//! constants (integers and strings) are interned per function, so requesting
//! the same literal twice yields the same handle. Callee definitions are
//! supplied by target description code and are never interned.

use std::fmt;

use log::trace;

use crate::{
    ir::{Function, Instr, InstrId, LiteralType, ValueId},
    Error, Result,
};

/// A node of the use-def graph.
///
/// Values are owned by the arena of their [`Function`] and addressed by
/// [`ValueId`]. The literal type and the name are fixed at creation; the use
/// list changes as operands referencing the value are edited.
#[derive(Debug, Clone)]
pub struct Value {
    pub(crate) ty: LiteralType,
    pub(crate) name: String,
    pub(crate) uses: Vec<InstrId>,
    pub(crate) kind: ValueKind,
}

impl Value {
    pub(crate) fn new(ty: LiteralType, name: impl Into<String>, kind: ValueKind) -> Self {
        Value {
            ty,
            name: name.into(),
            uses: Vec::new(),
            kind,
        }
    }

    /// Returns the literal type of this value.
    #[must_use]
    pub const fn ty(&self) -> LiteralType {
        self.ty
    }

    /// Returns the display name. Names are not unique and may be empty.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the users of this value, one entry per referencing operand slot.
    #[must_use]
    pub fn uses(&self) -> &[InstrId] {
        &self.uses
    }

    /// Returns the number of operand slots referencing this value.
    #[must_use]
    pub fn use_count(&self) -> usize {
        self.uses.len()
    }

    /// Returns `true` if any operand slot references this value.
    #[must_use]
    pub fn is_used(&self) -> bool {
        !self.uses.is_empty()
    }

    /// Returns what kind of node this value is.
    #[must_use]
    pub const fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Returns the constant payload if this value is a constant.
    #[must_use]
    pub const fn as_constant(&self) -> Option<&Constant> {
        match &self.kind {
            ValueKind::Constant(constant) => Some(constant),
            ValueKind::Instr(_) => None,
        }
    }

    /// Returns the instruction payload if this value is an instruction.
    #[must_use]
    pub const fn as_instr(&self) -> Option<&Instr> {
        match &self.kind {
            ValueKind::Instr(instr) => Some(instr),
            ValueKind::Constant(_) => None,
        }
    }
}

/// Distinguishes leaf values from instructions.
#[derive(Debug, Clone)]
pub enum ValueKind {
    /// A literal or a callee definition
    Constant(Constant),
    /// An instruction with operands and an optional owning block
    Instr(Instr),
}

/// Payload of a constant value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    /// Signed integer literal
    Int(i64),
    /// Unsigned integer literal
    UInt(u64),
    /// String literal
    String(String),
    /// A callable function, operand 0 of [`crate::ir::InstrKind::Call`]
    Function(FunctionDefinition),
    /// A target instruction, operand 0 of [`crate::ir::InstrKind::Cpu`]
    Instruction(InstructionDefinition),
}

impl Constant {
    /// Returns the literal type of a value holding this constant.
    ///
    /// Definitions are typed `Void`; the type their calls produce is the
    /// definition's return type.
    #[must_use]
    pub const fn ty(&self) -> LiteralType {
        match self {
            Constant::Int(_) => LiteralType::Int,
            Constant::UInt(_) => LiteralType::UInt,
            Constant::String(_) => LiteralType::String,
            Constant::Function(_) | Constant::Instruction(_) => LiteralType::Void,
        }
    }

    /// Returns `true` for integer and string literals, which are interned.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Constant::Int(_) | Constant::UInt(_) | Constant::String(_)
        )
    }

    /// Returns `true` if calling this definition never returns.
    ///
    /// Literals are never callees and report `false`.
    #[must_use]
    pub const fn is_no_return(&self) -> bool {
        match self {
            Constant::Function(def) => def.no_return,
            Constant::Instruction(def) => def.no_return,
            _ => false,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{v}"),
            Constant::UInt(v) => write!(f, "{v}"),
            Constant::String(v) => write!(f, "{v:?}"),
            Constant::Function(def) => write!(f, "@{}", def.symbol),
            Constant::Instruction(def) => write!(f, "{}", def.mnemonic),
        }
    }
}

/// A function that can be the target of a symbolic call.
///
/// # Examples
///
/// ```rust
/// use ssagraph::ir::{FunctionDefinition, LiteralType};
///
/// let exit = FunctionDefinition::new("exit", LiteralType::Void).with_no_return();
/// assert!(exit.is_no_return());
/// assert_eq!(exit.symbol(), "exit");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionDefinition {
    symbol: String,
    return_type: LiteralType,
    no_return: bool,
}

impl FunctionDefinition {
    /// Creates a definition for `symbol` returning `return_type`.
    #[must_use]
    pub fn new(symbol: impl Into<String>, return_type: LiteralType) -> Self {
        FunctionDefinition {
            symbol: symbol.into(),
            return_type,
            no_return: false,
        }
    }

    /// Marks the function as never returning to its caller.
    #[must_use]
    pub fn with_no_return(mut self) -> Self {
        self.no_return = true;
        self
    }

    /// Returns the symbol name.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the type of value a call to this function produces.
    #[must_use]
    pub const fn return_type(&self) -> LiteralType {
        self.return_type
    }

    /// Returns `true` if a call to this function never returns.
    #[must_use]
    pub const fn is_no_return(&self) -> bool {
        self.no_return
    }
}

/// A target instruction, such as a native opcode or runtime callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstructionDefinition {
    mnemonic: String,
    return_type: LiteralType,
    no_return: bool,
}

impl InstructionDefinition {
    /// Creates a definition for `mnemonic` producing `return_type`.
    #[must_use]
    pub fn new(mnemonic: impl Into<String>, return_type: LiteralType) -> Self {
        InstructionDefinition {
            mnemonic: mnemonic.into(),
            return_type,
            no_return: false,
        }
    }

    /// Marks the instruction as never returning control (for example `abort`).
    #[must_use]
    pub fn with_no_return(mut self) -> Self {
        self.no_return = true;
        self
    }

    /// Returns the mnemonic.
    #[must_use]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Returns the type of value the instruction produces.
    #[must_use]
    pub const fn return_type(&self) -> LiteralType {
        self.return_type
    }

    /// Returns `true` if the instruction never returns control.
    #[must_use]
    pub const fn is_no_return(&self) -> bool {
        self.no_return
    }
}

impl Function {
    /// Returns the interned signed integer constant `value`.
    pub fn const_int(&mut self, value: i64) -> ValueId {
        self.intern(Constant::Int(value))
    }

    /// Returns the interned unsigned integer constant `value`.
    pub fn const_uint(&mut self, value: u64) -> ValueId {
        self.intern(Constant::UInt(value))
    }

    /// Returns the interned string constant `value`.
    pub fn const_string(&mut self, value: impl Into<String>) -> ValueId {
        self.intern(Constant::String(value.into()))
    }

    /// Adds a function definition usable as the callee of a symbolic call.
    pub fn create_function_definition(&mut self, definition: FunctionDefinition) -> ValueId {
        let name = definition.symbol.clone();
        self.alloc_value(Value::new(
            LiteralType::Void,
            name,
            ValueKind::Constant(Constant::Function(definition)),
        ))
    }

    /// Adds an instruction definition usable as the callee of a target instruction.
    pub fn create_instruction_definition(&mut self, definition: InstructionDefinition) -> ValueId {
        let name = definition.mnemonic.clone();
        self.alloc_value(Value::new(
            LiteralType::Void,
            name,
            ValueKind::Constant(Constant::Instruction(definition)),
        ))
    }

    fn intern(&mut self, constant: Constant) -> ValueId {
        if let Some(&id) = self.constants.get(&constant) {
            return id;
        }

        let value = Value::new(
            constant.ty(),
            constant.to_string(),
            ValueKind::Constant(constant.clone()),
        );
        let id = self.alloc_value(value);
        self.constants.insert(constant, id);
        id
    }

    /// Appends one use entry for `user` to the use list of `value`.
    ///
    /// Duplicates are intentional: an instruction referencing the same value in
    /// two operand slots has two entries. This is a low-level primitive; the
    /// operand editors call it for every slot they write. Calling it without a
    /// matching operand edit breaks the use-count symmetry checked by
    /// [`Function::verify`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] or [`Error::InvalidInstr`] for stale handles.
    pub fn add_use(&mut self, value: ValueId, user: InstrId) -> Result<()> {
        self.instr_ref(user)?;
        self.value_mut(value)?.uses.push(user);
        Ok(())
    }

    /// Removes exactly one use entry of `user` (the first) from `value`.
    ///
    /// Returns `false` and leaves the list untouched if no entry matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if `value` is stale.
    pub fn remove_use(&mut self, value: ValueId, user: InstrId) -> Result<bool> {
        let uses = &mut self.value_mut(value)?.uses;
        match uses.iter().position(|&u| u == user) {
            Some(pos) => {
                uses.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Redirects every operand slot referencing `value` to `new_value`.
    ///
    /// Users are snapshotted first and rewritten one by one through
    /// [`Function::replace_operand`]. Afterwards `value` is unused and
    /// `new_value` has gained exactly the entries `value` lost. `value` itself
    /// is not destroyed. Replacing a value with itself does nothing.
    ///
    /// Returns the number of operand slots rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if either handle is stale.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ssagraph::ir::Function;
    ///
    /// let mut func = Function::new("f");
    /// let a = func.const_int(1);
    /// let b = func.const_int(2);
    /// let phi = func.create_phi(vec![a, a], "x").unwrap();
    ///
    /// assert_eq!(func.replace_all_uses_with(a, b).unwrap(), 2);
    /// assert_eq!(func.use_count(a).unwrap(), 0);
    /// assert_eq!(func.operands(phi).unwrap(), &[b, b]);
    /// ```
    pub fn replace_all_uses_with(&mut self, value: ValueId, new_value: ValueId) -> Result<usize> {
        let users = self.value_ref(value)?.uses.clone();
        self.value_ref(new_value)?;
        if value == new_value {
            return Ok(0);
        }
        for &user in &users {
            self.instr_ref(user)?;
        }

        let mut rewritten = 0;
        for user in users {
            // A user listed twice is fully rewritten on its first visit
            rewritten += self.replace_operand(user, value, new_value)?;
        }

        trace!("{}: replaced {rewritten} use(s) of {value} with {new_value}", self.name);
        Ok(rewritten)
    }

    /// Returns `true` if any operand slot references `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if `value` is stale.
    pub fn is_used(&self, value: ValueId) -> Result<bool> {
        Ok(self.value_ref(value)?.is_used())
    }

    /// Returns the number of operand slots referencing `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if `value` is stale.
    pub fn use_count(&self, value: ValueId) -> Result<usize> {
        Ok(self.value_ref(value)?.use_count())
    }

    /// Returns the use list of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if `value` is stale.
    pub fn uses(&self, value: ValueId) -> Result<&[InstrId]> {
        Ok(self.value_ref(value)?.uses())
    }

    /// Destroys a value that has no users.
    ///
    /// Instructions are forwarded to [`Function::erase_instr`]. Interned
    /// literals leave the intern table, so requesting the literal again
    /// creates a fresh value.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidValue`] if `value` is stale
    /// - [`Error::ValueInUse`] if any operand slot still references it
    pub fn erase_value(&mut self, value: ValueId) -> Result<()> {
        let entry = self.value_ref(value)?;
        let (constant, count) = match &entry.kind {
            ValueKind::Constant(constant) => (constant.clone(), entry.use_count()),
            ValueKind::Instr(_) => return self.erase_instr(InstrId(value.0)),
        };

        if count > 0 {
            return Err(Error::ValueInUse { value, count });
        }

        if constant.is_literal() {
            self.constants.remove(&constant);
        }
        self.values[value.0] = None;
        Ok(())
    }
}
