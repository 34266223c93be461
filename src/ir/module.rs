//! A collection of independent functions.
//!
//! Functions share no values or blocks, so a [`Module`] can check all of them
//! concurrently. Mutation still goes through `&mut Function`, one function at
//! a time per thread.

use rayon::prelude::*;

use crate::ir::{BlockId, Function, FunctionId, Violation};

/// Owner of the functions of one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct Module {
    name: String,
    functions: Vec<Function>,
}

impl Module {
    /// Creates an empty module.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            functions: Vec::new(),
        }
    }

    /// Returns the module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds `function` and returns its handle.
    pub fn add_function(&mut self, function: Function) -> FunctionId {
        self.functions.push(function);
        FunctionId(self.functions.len() - 1)
    }

    /// Returns the function behind `id`.
    #[must_use]
    pub fn function(&self, id: FunctionId) -> Option<&Function> {
        self.functions.get(id.0)
    }

    /// Returns the function behind `id` for editing.
    pub fn function_mut(&mut self, id: FunctionId) -> Option<&mut Function> {
        self.functions.get_mut(id.0)
    }

    /// Looks a function up by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<FunctionId> {
        self.functions
            .iter()
            .position(|f| f.name() == name)
            .map(FunctionId)
    }

    /// Iterates over all functions with their handles.
    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(index, f)| (FunctionId(index), f))
    }

    /// Returns the number of functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` if the module has no functions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Checks every function in parallel, each with its own configuration.
    ///
    /// Returns the violations per function, in function order, leaving out
    /// functions without any.
    #[must_use]
    pub fn check_all(&self) -> Vec<(FunctionId, Vec<(BlockId, Violation)>)> {
        self.functions
            .par_iter()
            .enumerate()
            .map(|(index, f)| (FunctionId(index), f.check_function()))
            .filter(|(_, violations)| !violations.is_empty())
            .collect()
    }

    /// Fatal verification of every function, see [`Function::verify_function`].
    ///
    /// # Panics
    ///
    /// Panics if any function violates a configured invariant.
    pub fn verify_all(&self) {
        self.functions.par_iter().for_each(Function::verify_function);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::FunctionBuilder;

    #[test]
    fn test_module_lookup() {
        let mut module = Module::new("unit");
        let (linear, _) = FunctionBuilder::linear(2);
        let (diamond, _) = FunctionBuilder::diamond();
        let a = module.add_function(linear);
        let b = module.add_function(diamond);

        assert_eq!(module.name(), "unit");
        assert_eq!(module.len(), 2);
        assert_eq!(module.find("diamond"), Some(b));
        assert_eq!(module.find("missing"), None);
        assert_eq!(module.function(a).unwrap().name(), "linear");
        assert_eq!(module.functions().count(), 2);
    }

    #[test]
    fn test_check_all_reports_broken_functions() {
        let mut module = Module::new("unit");
        for _ in 0..8 {
            module.add_function(FunctionBuilder::diamond().0);
        }
        let (broken, [entry, left, _, _]) = FunctionBuilder::diamond();
        let id = module.add_function(broken);
        module.verify_all();

        module
            .function_mut(id)
            .unwrap()
            .block_mut(left)
            .unwrap()
            .predecessors
            .clear();

        let report = module.check_all();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].0, id);
        assert_eq!(
            report[0].1,
            vec![(
                entry,
                Violation::MissingPredecessor {
                    block: entry,
                    successor: left
                }
            )]
        );
    }
}
