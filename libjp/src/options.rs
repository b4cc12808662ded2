//! Parser configuration.

/// Default maximum nesting depth for objects and arrays.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options controlling a parse.
///
/// Every object or array opened counts as one level of nesting. A document
/// nested deeper than `max_depth` fails with
/// [`ParseError::DepthExceeded`](crate::ParseError::DepthExceeded) rather than
/// recursing further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_depth: usize,
}

impl ParseOptions {
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum nesting depth.
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_depth() {
        assert_eq!(ParseOptions::default().max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(ParseOptions::new().with_max_depth(4).max_depth, 4);
    }
}
