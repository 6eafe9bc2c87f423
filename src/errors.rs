//! mupl Error Handling - Unified Encapsulated API
//!
//! Every failure the reader or the lowering stage can produce is a [`MuplError`].
//! The `kind` says what went wrong; `source_info` says where, when the failing
//! stage knows its input text.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Named source text used to render diagnostics.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real file content
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Source context for an expression passed inline, e.g. on the command line.
    pub fn inline(content: impl Into<String>) -> Self {
        Self::from_file("<inline>", content)
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }

    /// Span covering the whole source; used when a stage has no finer position.
    pub fn full_span(&self) -> SourceSpan {
        SourceSpan::from(0..self.content.len())
    }
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// The single error type
#[derive(Debug)]
pub struct MuplError {
    /// What went wrong (type-specific data)
    pub kind: ErrorKind,
    /// Where it happened, if the reporting stage knows its source
    pub source_info: Option<SourceInfo>,
    /// How to help
    pub diagnostic_info: DiagnosticInfo,
}

/// All error types as a clean enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    // Reader errors
    #[error("{message}")]
    Syntax { message: String },
    #[error("invalid {literal_type} literal '{value}'")]
    InvalidLiteral { literal_type: String, value: String },

    // Lowering errors
    #[error("unexpected empty ()")]
    EmptyForm,
    #[error("{form} special form admits {expected} parameters, got {actual}")]
    Arity {
        form: String,
        expected: usize,
        actual: usize,
    },
    #[error("missing parameter list for {form}")]
    MissingParameterList { form: String },
    #[error("formal parameters of {form} must be identifiers, found {found}")]
    InvalidParameter { form: String, found: String },
    #[error("function name must be an identifier, found {found}")]
    InvalidFunctionName { found: String },
    #[error("missing binding list for let expression")]
    MissingBindingList,
    #[error("binding list must contain at least 1 binding")]
    EmptyBindingList,
    #[error("binding list items must be pairs of an identifier and an expression, found {found}")]
    InvalidBindingShape { found: String },
    #[error("cannot bind to non-identifier {found}")]
    NonIdentifierBinding { found: String },
    #[error("operator {operator} needs at least 2 operands, got {actual}")]
    InsufficientOperands { operator: String, actual: usize },
    #[error("{token} tokens are not supported")]
    UnsupportedToken { token: String },
    #[error("expression nesting exceeds the limit of {limit}")]
    NestingTooDeep { limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Lowering,
}

impl ErrorCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Lowering => "lowering",
        }
    }
}

/// Context-specific source information
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

impl ErrorKind {
    /// Get the error category for test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Syntax { .. } | Self::InvalidLiteral { .. } => ErrorCategory::Syntax,

            Self::EmptyForm
            | Self::Arity { .. }
            | Self::MissingParameterList { .. }
            | Self::InvalidParameter { .. }
            | Self::InvalidFunctionName { .. }
            | Self::MissingBindingList
            | Self::EmptyBindingList
            | Self::InvalidBindingShape { .. }
            | Self::NonIdentifierBinding { .. }
            | Self::InsufficientOperands { .. }
            | Self::UnsupportedToken { .. }
            | Self::NestingTooDeep { .. } => ErrorCategory::Lowering,
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => "unexpected_input",
            Self::InvalidLiteral { .. } => "invalid_literal",
            Self::EmptyForm => "empty_form",
            Self::Arity { .. } => "arity",
            Self::MissingParameterList { .. } => "missing_parameter_list",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::InvalidFunctionName { .. } => "invalid_function_name",
            Self::MissingBindingList => "missing_binding_list",
            Self::EmptyBindingList => "empty_binding_list",
            Self::InvalidBindingShape { .. } => "invalid_binding_shape",
            Self::NonIdentifierBinding { .. } => "non_identifier_binding",
            Self::InsufficientOperands { .. } => "insufficient_operands",
            Self::UnsupportedToken { .. } => "unsupported_token",
            Self::NestingTooDeep { .. } => "nesting_too_deep",
        }
    }

    fn default_help(&self) -> Option<&'static str> {
        match self {
            Self::Arity { .. } => Some("check the number of forms after the special form name"),
            Self::MissingParameterList { .. } => {
                Some("parameters are written as a list, e.g. (lambda (x y) body)")
            }
            Self::MissingBindingList | Self::InvalidBindingShape { .. } => {
                Some("bindings are written as (let ((name expr) ...) body)")
            }
            Self::InsufficientOperands { .. } => Some("operators take two or more operands"),
            Self::NestingTooDeep { .. } => Some("raise the limit with --max-depth"),
            _ => None,
        }
    }

    fn primary_label(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Syntax => "here",
            ErrorCategory::Lowering => "while lowering this input",
        }
    }
}

impl From<ErrorKind> for MuplError {
    fn from(kind: ErrorKind) -> Self {
        let error_code = format!("mupl::{}::{}", kind.category().as_str(), kind.code_suffix());
        let help = kind.default_help().map(String::from);
        MuplError {
            kind,
            source_info: None,
            diagnostic_info: DiagnosticInfo { help, error_code },
        }
    }
}

impl MuplError {
    /// Attach source text and a span, unless the error already carries one.
    pub fn with_source(mut self, source: &SourceContext, span: SourceSpan) -> Self {
        if self.source_info.is_none() {
            self.source_info = Some(SourceInfo {
                source: source.to_named_source(),
                primary_span: span,
            });
        }
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

/// Context-aware error creation, implemented by anything that knows its source
pub trait ErrorReporting {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> MuplError;
}

impl ErrorReporting for SourceContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> MuplError {
        MuplError::from(kind).with_source(self, span)
    }
}

impl std::error::Error for MuplError {}

impl fmt::Display for MuplError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.category() {
            ErrorCategory::Syntax => write!(f, "Syntax error: {}", self.kind),
            ErrorCategory::Lowering => write!(f, "Lowering error: {}", self.kind),
        }
    }
}

impl Diagnostic for MuplError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let info = self.source_info.as_ref()?;
        let label = LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            info.primary_span,
        );
        Some(Box::new(std::iter::once(label)))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_info
            .as_ref()
            .map(|info| &*info.source as &dyn miette::SourceCode)
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a MuplError with full miette diagnostics to stderr.
pub fn print_error(error: MuplError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_combines_category_and_kind() {
        let err = MuplError::from(ErrorKind::EmptyBindingList);
        assert_eq!(err.diagnostic_info.error_code, "mupl::lowering::empty_binding_list");
        assert_eq!(err.category(), ErrorCategory::Lowering);
    }

    #[test]
    fn display_includes_arity_details() {
        let err = MuplError::from(ErrorKind::Arity {
            form: "if".into(),
            expected: 3,
            actual: 2,
        });
        assert_eq!(
            err.to_string(),
            "Lowering error: if special form admits 3 parameters, got 2"
        );
    }

    #[test]
    fn with_source_keeps_the_first_span() {
        let ctx = SourceContext::inline("(if 1 2)");
        let err = ctx
            .report(ErrorKind::Syntax { message: "bad".into() }, (1..3).into())
            .with_source(&ctx, ctx.full_span());
        let info = err.source_info.expect("source attached");
        assert_eq!(info.primary_span, SourceSpan::from(1..3));
    }
}
