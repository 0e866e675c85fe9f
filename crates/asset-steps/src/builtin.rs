//! Built-in step writers.
//!
//! Every built-in emits the same fragment shape, a `files` list with one
//! `{dest, src}` entry per invocation, which is what concat/minify tasks of
//! common build tools expect.

use serde_json::{json, Value};

use crate::{FileMapping, OutputMode, StepWriter};

/// Canonical name of the concatenation step.
pub const CONCAT: &str = "concat";

/// Canonical name of the JavaScript minifier step.
pub const UGLIFY: &str = "uglify";

/// Canonical name of the stylesheet minifier step.
pub const CSSMIN: &str = "cssmin";

/// Build the standard `files` fragment for a mapping.
pub fn files_fragment(mapping: &FileMapping) -> Value {
    json!({
        "files": [
            { "dest": mapping.dest, "src": mapping.src }
        ]
    })
}

/// Concatenates every input into one output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Concat;

impl StepWriter for Concat {
    fn name(&self) -> &str {
        CONCAT
    }

    fn create_config(&self, mapping: &FileMapping) -> Value {
        files_fragment(mapping)
    }
}

/// Minifies JavaScript. Minifies file by file unless it ends the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uglify;

impl StepWriter for Uglify {
    fn name(&self) -> &str {
        UGLIFY
    }

    fn create_config(&self, mapping: &FileMapping) -> Value {
        files_fragment(mapping)
    }

    fn output_mode(&self) -> OutputMode {
        OutputMode::PerSource
    }
}

/// Minifies stylesheets. Same layout rules as [`Uglify`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CssMin;

impl StepWriter for CssMin {
    fn name(&self) -> &str {
        CSSMIN
    }

    fn create_config(&self, mapping: &FileMapping) -> Value {
        files_fragment(mapping)
    }

    fn output_mode(&self) -> OutputMode {
        OutputMode::PerSource
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> FileMapping {
        FileMapping::new(
            vec!["app/foo.js".to_string(), "app/bar.js".to_string()],
            ".tmp/concat/scripts/site.js",
        )
    }

    #[test]
    fn test_concat_fragment() {
        let fragment = Concat.create_config(&mapping());
        assert_eq!(
            fragment,
            json!({"files": [{"dest": ".tmp/concat/scripts/site.js", "src": ["app/foo.js", "app/bar.js"]}]})
        );
    }

    #[test]
    fn test_minifiers_are_per_source() {
        assert_eq!(Uglify.output_mode(), OutputMode::PerSource);
        assert_eq!(CssMin.output_mode(), OutputMode::PerSource);
        assert_eq!(Concat.output_mode(), OutputMode::Merged);
    }

    #[test]
    fn test_builtin_names() {
        assert_eq!(Concat.name(), "concat");
        assert_eq!(Uglify.name(), "uglify");
        assert_eq!(CssMin.name(), "cssmin");
    }
}
