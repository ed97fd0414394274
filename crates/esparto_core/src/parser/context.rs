//! Syntactic context tracked while descending through the grammar.
//!
//! The parser consults a [`Context`] to decide whether `break`, `continue`
//! and `return` are legal where they appear, whether a label is already in
//! scope, whether the `in` operator is currently allowed, and whether the
//! code being parsed is strict.  Entering a function body saves the outer
//! context and starts a fresh one; labels and loop nesting never cross a
//! function boundary.

use smallvec::SmallVec;

/// A label in scope, and whether it names a loop (a valid `continue`
/// target).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub iteration: bool,
}

/// Labels in scope at one point of the parse.  Nesting is almost always
/// shallow, so the set lives inline.
pub type LabelSet = SmallVec<[Label; 4]>;

/// Mutable parse context.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// The code being parsed is strict mode code.
    pub strict: bool,
    /// Inside a function body (`return` allowed).
    pub in_function_body: bool,
    /// Inside a loop body (unlabelled `continue` and `break` allowed).
    pub in_iteration: bool,
    /// Inside a `switch` block (unlabelled `break` allowed).
    pub in_switch: bool,
    /// `false` while parsing the initializer of a `for` head, where `in`
    /// would be ambiguous.
    pub allow_in: bool,
    labels: LabelSet,
}

/// What [`Context::enter_function`] hands back so the outer context can be
/// reinstated.
#[derive(Debug)]
pub struct SavedContext {
    strict: bool,
    in_function_body: bool,
    in_iteration: bool,
    in_switch: bool,
    allow_in: bool,
    labels: LabelSet,
}

impl Context {
    /// The context at the top of a script.
    pub fn new() -> Self {
        Self {
            allow_in: true,
            ..Self::default()
        }
    }

    /// `true` when `name` labels an enclosing statement.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    /// `Some(true)` when `name` labels an enclosing loop, `Some(false)` for
    /// any other enclosing statement, `None` when it is not in scope.
    pub fn label_is_iteration(&self, name: &str) -> Option<bool> {
        self.labels
            .iter()
            .rev()
            .find(|l| l.name == name)
            .map(|l| l.iteration)
    }

    /// Bring `name` into scope for the statement about to be parsed.
    pub fn push_label(&mut self, name: impl Into<String>, iteration: bool) {
        self.labels.push(Label {
            name: name.into(),
            iteration,
        });
    }

    /// Drop the innermost label.
    pub fn pop_label(&mut self) {
        self.labels.pop();
    }

    /// Start a function body.  Strictness is inherited; everything else is
    /// reset.
    pub fn enter_function(&mut self) -> SavedContext {
        let saved = SavedContext {
            strict: self.strict,
            in_function_body: self.in_function_body,
            in_iteration: self.in_iteration,
            in_switch: self.in_switch,
            allow_in: self.allow_in,
            labels: std::mem::take(&mut self.labels),
        };
        self.in_function_body = true;
        self.in_iteration = false;
        self.in_switch = false;
        self.allow_in = true;
        saved
    }

    /// Leave a function body, restoring the context saved on entry.
    pub fn leave_function(&mut self, saved: SavedContext) {
        self.strict = saved.strict;
        self.in_function_body = saved.in_function_body;
        self.in_iteration = saved.in_iteration;
        self.in_switch = saved.in_switch;
        self.allow_in = saved.allow_in;
        self.labels = saved.labels;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_allows_in() {
        let ctx = Context::new();
        assert!(ctx.allow_in);
        assert!(!ctx.strict);
        assert!(!ctx.in_function_body);
    }

    #[test]
    fn test_labels_nest() {
        let mut ctx = Context::new();
        ctx.push_label("outer", false);
        ctx.push_label("inner", true);
        assert!(ctx.has_label("outer"));
        assert_eq!(ctx.label_is_iteration("inner"), Some(true));
        assert_eq!(ctx.label_is_iteration("outer"), Some(false));
        ctx.pop_label();
        assert!(!ctx.has_label("inner"));
        assert_eq!(ctx.label_is_iteration("inner"), None);
        assert!(ctx.has_label("outer"));
    }

    #[test]
    fn test_function_boundary_hides_labels_and_loops() {
        let mut ctx = Context::new();
        ctx.push_label("outer", true);
        ctx.in_iteration = true;
        ctx.allow_in = false;

        let saved = ctx.enter_function();
        assert!(!ctx.has_label("outer"));
        assert!(!ctx.in_iteration);
        assert!(ctx.allow_in);
        assert!(ctx.in_function_body);
        ctx.strict = true;

        ctx.leave_function(saved);
        assert!(ctx.has_label("outer"));
        assert!(ctx.in_iteration);
        assert!(!ctx.allow_in);
        assert!(!ctx.strict);
        assert!(!ctx.in_function_body);
    }

    #[test]
    fn test_strictness_is_inherited() {
        let mut ctx = Context::new();
        ctx.strict = true;
        let saved = ctx.enter_function();
        assert!(ctx.strict);
        ctx.leave_function(saved);
        assert!(ctx.strict);
    }
}
