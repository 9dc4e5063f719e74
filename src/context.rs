use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::optimize::{FoldCharacterSetChoices, InlineIdentifiers, Optimization};
use crate::rule::Pattern;

/// The state shared by the grammars built in one compilation: compiled
/// patterns, the optimizer passes to apply, and the grammar modules that can
/// be imported by name.
///
/// Nothing here is process-wide. Two contexts never see each other's state.
#[derive(Debug, Default)]
pub struct Context {
    patterns: RefCell<HashMap<String, Pattern>>,
    optimizations: Vec<Box<dyn Optimization>>,
    modules: HashMap<String, String>,
}

impl Context {
    /// A context with both built-in optimizer passes registered.
    pub fn standard() -> Self {
        Context::default()
            .with_optimization(InlineIdentifiers)
            .with_optimization(FoldCharacterSetChoices)
    }

    pub fn with_optimization(mut self, pass: impl Optimization + 'static) -> Self {
        self.register(pass);
        self
    }

    pub fn with_module(mut self, name: &str, source: &str) -> Self {
        self.register_module(name, source);
        self
    }

    /// Appends a pass; passes run in registration order.
    pub fn register(&mut self, pass: impl Optimization + 'static) {
        self.optimizations.push(Box::new(pass));
    }

    pub fn remove_all_optimizations(&mut self) {
        self.optimizations.clear();
    }

    pub fn optimizations(&self) -> impl Iterator<Item=&dyn Optimization> {
        self.optimizations.iter().map(|o| o.as_ref())
    }

    pub fn register_module(&mut self, name: &str, source: &str) {
        self.modules.insert(name.to_string(), source.to_string());
    }

    pub fn module(&self, name: &str) -> Option<&str> {
        self.modules.get(name).map(|s| s.as_str())
    }

    /// The compiled form of `source`, compiled at most once per context.
    pub fn pattern(&self, source: &str) -> Result<Pattern, GrammarError> {
        if let Some(p) = self.patterns.borrow().get(source) {
            return Ok(p.clone());
        }
        let compiled = Pattern::compile(source)?;
        self.patterns.borrow_mut().insert(source.to_string(), compiled.clone());
        Ok(compiled)
    }

    pub fn cached_patterns(&self) -> usize { self.patterns.borrow().len() }

    /// Runs every registered pass, in order, until none of them changes the
    /// grammar any more. With no passes registered this does nothing.
    pub fn optimize(&self, grammar: &mut Grammar) {
        loop {
            let mut changed = false;
            for pass in &self.optimizations {
                if pass.optimize(grammar) {
                    log::debug!("optimization `{}` rewrote the grammar", pass.name());
                    changed = true;
                }
            }
            if !changed { break; }
        }
    }
}
