//! Source-to-AST pipeline: read, then lower every top-level form.

use crate::ast::{Ast, AstBuilder, BuildOptions};
use crate::errors::{MuplError, SourceContext};
use crate::syntax::{parser, ParseTree};

/// Runs the reader and the lowering stage over one source text.
#[derive(Debug, Clone, Default)]
pub struct LoweringPipeline {
    builder: AstBuilder,
}

impl LoweringPipeline {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            builder: AstBuilder::new(options),
        }
    }

    /// Parses `source` into parse trees without lowering them.
    pub fn read(&self, source: &SourceContext) -> Result<Vec<ParseTree>, MuplError> {
        parser::parse(&source.content, source)
    }

    /// Parses and lowers every top-level form of `source`, stopping at the first error.
    ///
    /// Lowering errors carry no position of their own; the whole source is
    /// attached so the report still shows what was being lowered.
    pub fn lower(&self, source: &SourceContext) -> Result<Vec<Ast>, MuplError> {
        let trees = self.read(source)?;
        tracing::debug!(source = %source.name, forms = trees.len(), "parsed source");

        trees
            .iter()
            .map(|tree| -> Result<Ast, MuplError> {
                let ast = self
                    .builder
                    .build(tree)
                    .map_err(|e| e.with_source(source, source.full_span()))?;
                tracing::debug!(node = ast.type_name(), "lowered form");
                Ok(ast)
            })
            .collect()
    }

    /// Convenience wrapper for inline source text.
    pub fn lower_str(&self, text: &str) -> Result<Vec<Ast>, MuplError> {
        self.lower(&SourceContext::inline(text))
    }
}
