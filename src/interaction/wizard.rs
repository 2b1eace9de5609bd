//! Step wizard driving tree expansion.
//!
//! The wizard knows its steps and the answers given so far. Which answer
//! reveals which part of the tree is not inherent to the data, so the host
//! binds `(step, option)` pairs to node ids explicitly.

use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};
use crate::tree::NodeId;

/// One named question with its allowed answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardStep {
    /// Step name, unique within a wizard.
    pub name: String,
    /// Answers the step accepts.
    pub options: Vec<String>,
}

impl WizardStep {
    pub fn new<S: Into<String>>(name: impl Into<String>, options: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// Sequential wizard state.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    steps: Vec<WizardStep>,
    current: usize,
    answers: Vec<Option<String>>,
    bindings: HashMap<(String, String), NodeId>,
}

impl Wizard {
    pub fn new(steps: Vec<WizardStep>) -> Self {
        let answers = vec![None; steps.len()];
        Self {
            steps,
            current: 0,
            answers,
            bindings: HashMap::new(),
        }
    }

    /// The step awaiting an answer, or `None` once every step is answered.
    pub fn current_step(&self) -> Option<&WizardStep> {
        self.steps.get(self.current)
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.steps.len()
    }

    /// Move to the next step without answering.
    pub fn advance(&mut self) {
        self.current = (self.current + 1).min(self.steps.len());
    }

    /// Return to the previous step.
    pub fn back(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Recorded answer for a step.
    pub fn answer(&self, step: &str) -> Option<&str> {
        let index = self.position(step).ok()?;
        self.answers[index].as_deref()
    }

    /// Make choosing `value` at `step` reveal `node`.
    ///
    /// # Errors
    ///
    /// Fails if the step or option does not exist.
    pub fn bind(&mut self, step: &str, value: &str, node: NodeId) -> Result<()> {
        self.check(step, value)?;
        self.bindings.insert((step.to_owned(), value.to_owned()), node);
        Ok(())
    }

    /// Record an answer and advance past its step.
    ///
    /// Returns the node bound to the answer, if any.
    ///
    /// # Errors
    ///
    /// Fails if the step or option does not exist.
    pub fn select(&mut self, step: &str, value: &str) -> Result<Option<NodeId>> {
        let index = self.check(step, value)?;
        self.answers[index] = Some(value.to_owned());
        self.current = self.current.max(index + 1).min(self.steps.len());

        let target = self
            .bindings
            .get(&(step.to_owned(), value.to_owned()))
            .copied();
        match target {
            Some(node) => debug!("wizard {step}={value} reveals {node}"),
            None => warn!("wizard {step}={value} is not bound to any node"),
        }
        Ok(target)
    }

    fn position(&self, step: &str) -> Result<usize> {
        self.steps
            .iter()
            .position(|s| s.name == step)
            .ok_or_else(|| TreeError::UnknownStep(step.to_owned()))
    }

    fn check(&self, step: &str, value: &str) -> Result<usize> {
        let index = self.position(step)?;
        if self.steps[index].options.iter().any(|o| o == value) {
            Ok(index)
        } else {
            Err(TreeError::UnknownOption {
                step: step.to_owned(),
                value: value.to_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard() -> Wizard {
        Wizard::new(vec![
            WizardStep::new("area", ["analytics", "vis"]),
            WizardStep::new("detail", ["cluster", "graph"]),
        ])
    }

    #[test]
    fn test_select_bound_answer() {
        let mut w = wizard();
        w.bind("area", "vis", NodeId(7)).unwrap();

        assert_eq!(w.current_step().unwrap().name, "area");
        assert_eq!(w.select("area", "vis").unwrap(), Some(NodeId(7)));
        assert_eq!(w.answer("area"), Some("vis"));
        assert_eq!(w.current_step().unwrap().name, "detail");
    }

    #[test]
    fn test_unbound_answer_still_advances() {
        let mut w = wizard();
        assert_eq!(w.select("area", "analytics").unwrap(), None);
        assert_eq!(w.select("detail", "graph").unwrap(), None);
        assert!(w.is_complete());
        assert!(w.current_step().is_none());
    }

    #[test]
    fn test_unknown_step_and_option() {
        let mut w = wizard();
        assert!(matches!(w.select("nope", "vis"), Err(TreeError::UnknownStep(_))));
        assert!(matches!(
            w.bind("area", "physics", NodeId(1)),
            Err(TreeError::UnknownOption { .. })
        ));
        assert_eq!(w.answer("area"), None);
    }

    #[test]
    fn test_navigation() {
        let mut w = wizard();
        w.back();
        assert_eq!(w.current_step().unwrap().name, "area");
        w.advance();
        w.advance();
        w.advance();
        assert!(w.is_complete());
        w.back();
        assert_eq!(w.current_step().unwrap().name, "detail");

        // Re-answering an earlier step does not rewind.
        w.select("area", "vis").unwrap();
        assert_eq!(w.current_step().unwrap().name, "detail");
    }
}
