//! # AST Builder Module
//!
//! Lowers a [`ParseTree`] into the typed [`Ast`], validating the shape of every
//! special form on the way and desugaring list literals.
//!
//! ## Invariants
//! - Never mutates input
//! - Either returns a complete tree or the first error found; never a partial tree
//! - Registered forms are arity-checked against [`FORM_TABLE`](super::FORM_TABLE)
//!   before dispatch
//! - Internal recursion returns `Box<MuplError>`; [`BuildOptions::DEFAULT_MAX_DEPTH`]
//!   must lower on a 2 MiB stack

use crate::ast::forms::{required_arity, SpecialForm};
use crate::ast::{Ast, Binding, OperatorKind};
use crate::errors::{ErrorKind, MuplError};
use crate::syntax::{ParseTree, Token};

/// Result type used inside the recursive lowering.
type Lowered<T> = Result<T, Box<MuplError>>;

fn fail(kind: ErrorKind) -> Box<MuplError> {
    Box::new(MuplError::from(kind))
}

/// Lowering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Maximum parse-tree nesting depth accepted before failing with
    /// [`ErrorKind::NestingTooDeep`]. The default lowers safely on a 2 MiB
    /// thread stack in unoptimized builds.
    pub max_depth: usize,
}

impl BuildOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Lowers a parse tree with the default options.
pub fn build_ast(tree: &ParseTree) -> Result<Ast, MuplError> {
    AstBuilder::default().build(tree)
}

/// Recursive dispatcher from parse-tree nodes to AST nodes.
#[derive(Debug, Clone, Default)]
pub struct AstBuilder {
    options: BuildOptions,
}

impl AstBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn build(&self, tree: &ParseTree) -> Result<Ast, MuplError> {
        self.lower(tree, 0).map_err(|e| *e)
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    fn lower(&self, tree: &ParseTree, depth: usize) -> Lowered<Ast> {
        if depth > self.options.max_depth {
            return Err(fail(ErrorKind::NestingTooDeep {
                limit: self.options.max_depth,
            }));
        }

        match &tree.token {
            Token::Number(value) => Ok(Ast::number(*value)),
            Token::Identifier(name) => Ok(Ast::var(name.as_str())),
            Token::Open => self.lower_form(&tree.children, depth),
            other => {
                tracing::warn!(token = other.kind_name(), "token kind not supported by lowering");
                Err(fail(ErrorKind::UnsupportedToken {
                    token: other.kind_name().to_string(),
                }))
            }
        }
    }

    fn lower_form(&self, children: &[ParseTree], depth: usize) -> Lowered<Ast> {
        let Some((head, args)) = children.split_first() else {
            return Err(fail(ErrorKind::EmptyForm));
        };

        let head_name = head.as_identifier();
        if let Some(name) = head_name {
            check_declared_arity(name, args)?;
        }

        let depth = depth + 1;
        match head_name.and_then(SpecialForm::from_name) {
            Some(SpecialForm::If) => self.build_if(args, depth),
            Some(SpecialForm::Let) => self.build_let(args, depth),
            Some(SpecialForm::Lambda) => self.build_lambda(args, depth),
            Some(SpecialForm::Fun) => self.build_fun(args, depth),
            Some(SpecialForm::Operator(kind)) => self.build_operator(kind, args, depth),
            Some(SpecialForm::Pair) => self.build_pair(args, depth),
            Some(form @ (SpecialForm::First | SpecialForm::Second | SpecialForm::NullCheck)) => {
                self.build_unary(form, args, depth)
            }
            Some(SpecialForm::List) => self.build_list(args, depth),
            None => self.build_call(head, args, depth),
        }
    }

    // ------------------------------------------------------------------------
    // Node-specific builders
    // ------------------------------------------------------------------------

    fn build_call(&self, callee: &ParseTree, args: &[ParseTree], depth: usize) -> Lowered<Ast> {
        Ok(Ast::Call {
            callee: self.lower_boxed(callee, depth)?,
            args: self.lower_all(args, depth)?,
        })
    }

    fn build_lambda(&self, args: &[ParseTree], depth: usize) -> Lowered<Ast> {
        let [params, body] = fixed_args::<2>(SpecialForm::Lambda, args)?;
        let parameters = parameter_list(SpecialForm::Lambda, params)?;
        Ok(Ast::Lambda {
            parameters,
            body: self.lower_boxed(body, depth)?,
        })
    }

    fn build_fun(&self, args: &[ParseTree], depth: usize) -> Lowered<Ast> {
        let [name, params, body] = fixed_args::<3>(SpecialForm::Fun, args)?;
        let name = name.as_identifier().ok_or_else(|| {
            fail(ErrorKind::InvalidFunctionName {
                found: name.to_string(),
            })
        })?;
        let parameters = parameter_list(SpecialForm::Fun, params)?;
        Ok(Ast::Fun {
            name: name.to_string(),
            parameters,
            body: self.lower_boxed(body, depth)?,
        })
    }

    fn build_let(&self, args: &[ParseTree], depth: usize) -> Lowered<Ast> {
        let [list, body] = fixed_args::<2>(SpecialForm::Let, args)?;
        if !list.is_open() {
            return Err(fail(ErrorKind::MissingBindingList));
        }
        if list.children.is_empty() {
            return Err(fail(ErrorKind::EmptyBindingList));
        }

        // Shape errors win over errors inside binding expressions.
        let entries = list
            .children
            .iter()
            .map(binding_entry)
            .collect::<Lowered<Vec<_>>>()?;

        let bindings = entries
            .into_iter()
            .map(|(name, expression)| -> Lowered<Binding> {
                Ok(Binding {
                    name: name.to_string(),
                    expression: self.lower(expression, depth + 1)?,
                })
            })
            .collect::<Lowered<Vec<_>>>()?;

        Ok(Ast::Let {
            bindings,
            body: self.lower_boxed(body, depth)?,
        })
    }

    fn build_if(&self, args: &[ParseTree], depth: usize) -> Lowered<Ast> {
        let [test, consequent, alternate] = fixed_args::<3>(SpecialForm::If, args)?;
        Ok(Ast::If {
            test: self.lower_boxed(test, depth)?,
            consequent: self.lower_boxed(consequent, depth)?,
            alternate: self.lower_boxed(alternate, depth)?,
        })
    }

    fn build_operator(&self, kind: OperatorKind, args: &[ParseTree], depth: usize) -> Lowered<Ast> {
        if args.len() < 2 {
            return Err(fail(ErrorKind::InsufficientOperands {
                operator: SpecialForm::Operator(kind).name().to_string(),
                actual: args.len(),
            }));
        }
        Ok(Ast::operator(kind, self.lower_all(args, depth)?))
    }

    fn build_pair(&self, args: &[ParseTree], depth: usize) -> Lowered<Ast> {
        let [first, second] = fixed_args::<2>(SpecialForm::Pair, args)?;
        Ok(Ast::pair(self.lower(first, depth)?, self.lower(second, depth)?))
    }

    /// `first`, `second` and `null?`.
    fn build_unary(&self, form: SpecialForm, args: &[ParseTree], depth: usize) -> Lowered<Ast> {
        let [operand] = fixed_args::<1>(form, args)?;
        let expression = self.lower_boxed(operand, depth)?;
        Ok(match form {
            SpecialForm::First => Ast::First { expression },
            SpecialForm::Second => Ast::Second { expression },
            _ => Ast::NullCheck { expression },
        })
    }

    /// `($list a b c)` becomes `(pair a (pair b (pair c null)))`.
    fn build_list(&self, args: &[ParseTree], depth: usize) -> Lowered<Ast> {
        let items = self.lower_all(args, depth)?;
        Ok(items
            .into_iter()
            .rev()
            .fold(Ast::null(), |tail, item| Ast::pair(item, tail)))
    }

    // ------------------------------------------------------------------------
    // Utility functions
    // ------------------------------------------------------------------------

    fn lower_boxed(&self, tree: &ParseTree, depth: usize) -> Lowered<Box<Ast>> {
        self.lower(tree, depth).map(Box::new)
    }

    fn lower_all(&self, trees: &[ParseTree], depth: usize) -> Lowered<Vec<Ast>> {
        trees.iter().map(|t| self.lower(t, depth)).collect()
    }
}

fn check_declared_arity(name: &str, args: &[ParseTree]) -> Lowered<()> {
    match required_arity(name) {
        Some(expected) if expected != args.len() => Err(fail(ErrorKind::Arity {
            form: name.to_string(),
            expected,
            actual: args.len(),
        })),
        _ => Ok(()),
    }
}

/// Views `args` as exactly `N` forms.
fn fixed_args<const N: usize>(form: SpecialForm, args: &[ParseTree]) -> Lowered<&[ParseTree; N]> {
    args.try_into().map_err(|_| {
        fail(ErrorKind::Arity {
            form: form.name().to_string(),
            expected: N,
            actual: args.len(),
        })
    })
}

fn parameter_list(form: SpecialForm, params: &ParseTree) -> Lowered<Vec<String>> {
    if !params.is_open() {
        return Err(fail(ErrorKind::MissingParameterList {
            form: form.name().to_string(),
        }));
    }
    params
        .children
        .iter()
        .map(|param| {
            param.as_identifier().map(str::to_string).ok_or_else(|| {
                fail(ErrorKind::InvalidParameter {
                    form: form.name().to_string(),
                    found: param.to_string(),
                })
            })
        })
        .collect()
}

fn binding_entry(entry: &ParseTree) -> Lowered<(&str, &ParseTree)> {
    let shape_error = || {
        fail(ErrorKind::InvalidBindingShape {
            found: entry.to_string(),
        })
    };
    if !entry.is_open() {
        return Err(shape_error());
    }
    let [name, expression] = entry.children.as_slice() else {
        return Err(shape_error());
    };
    let name = name.as_identifier().ok_or_else(|| {
        fail(ErrorKind::NonIdentifierBinding {
            found: name.to_string(),
        })
    })?;
    Ok((name, expression))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> ParseTree {
        ParseTree::identifier(name)
    }

    fn form(children: Vec<ParseTree>) -> ParseTree {
        ParseTree::open(children)
    }

    /// `(f (f ... (f 1)))` with `levels` forms; the innermost literal sits at depth `levels`.
    fn nested_calls(levels: usize) -> ParseTree {
        let mut tree = ParseTree::number(1);
        for _ in 0..levels {
            tree = form(vec![id("f"), tree]);
        }
        tree
    }

    #[test]
    fn depth_limit_rejects_deep_nesting() {
        let tree = nested_calls(10);
        let builder = AstBuilder::new(BuildOptions { max_depth: 5 });
        let err = builder.build(&tree).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NestingTooDeep { limit: 5 });

        let roomy = AstBuilder::new(BuildOptions { max_depth: 64 });
        assert!(roomy.build(&tree).is_ok());
    }

    #[test]
    fn default_depth_limit_fits_a_small_thread_stack() {
        let handle = std::thread::Builder::new()
            .stack_size(2 << 20)
            .spawn(|| {
                let limit = BuildOptions::default().max_depth;
                let at_limit = build_ast(&nested_calls(limit)).map(|_| ()).map_err(|e| e.kind);
                let past_limit = build_ast(&nested_calls(limit + 1)).map(|_| ()).map_err(|e| e.kind);
                (limit, at_limit, past_limit)
            })
            .unwrap();
        let (limit, at_limit, past_limit) = handle.join().expect("lowering thread overflowed");
        assert_eq!(at_limit, Ok(()));
        assert_eq!(past_limit, Err(ErrorKind::NestingTooDeep { limit }));
    }

    #[test]
    fn fixed_args_reports_arity_on_mismatch() {
        let args = [ParseTree::number(1)];
        let err = fixed_args::<2>(SpecialForm::Pair, &args).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::Arity {
                form: "pair".into(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn binding_entry_checks_shape_before_name() {
        let entry = form(vec![ParseTree::number(1), ParseTree::number(2), ParseTree::number(3)]);
        let err = binding_entry(&entry).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidBindingShape { .. }));

        let entry = form(vec![ParseTree::number(1), ParseTree::number(2)]);
        let err = binding_entry(&entry).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonIdentifierBinding { found: "1".into() });
    }
}
