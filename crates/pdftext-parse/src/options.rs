//! Interpreter configuration.

/// Options controlling how content streams are tokenized and interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretOptions {
    /// Insert one space byte between consecutive content-stream parts.
    pub separate_parts: bool,
    /// Deepest array/dictionary nesting accepted by the assembler.
    pub max_nesting_depth: usize,
    /// Most operands that may precede a single operator.
    pub max_operands: usize,
}

impl Default for InterpretOptions {
    fn default() -> Self {
        Self {
            separate_parts: true,
            max_nesting_depth: 64,
            max_operands: 4096,
        }
    }
}
