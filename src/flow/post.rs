//! Post-processors: hooks that adjust a step's generated configuration after
//! the step has handled a block.

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::config::deep_merge;
use crate::model::Block;

/// Adjusts the `generated` mapping of one step.
pub trait PostProcessor: fmt::Debug + Send + Sync {
    /// Step name this processor follows. Aliases are accepted and
    /// canonicalized when the flow is built.
    fn step(&self) -> &str;

    /// Called once per block, after the step's fragment for that block has
    /// been merged into `generated`.
    fn apply(&self, generated: &mut Map<String, Value>, block: &Block);
}

/// Shared handle to a post-processor.
pub type SharedPost = Arc<dyn PostProcessor>;

/// Deep-merges fixed values under the step's `options` key.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsPost {
    step: String,
    options: Value,
}

impl OptionsPost {
    pub fn new(step: impl Into<String>, options: Value) -> Self {
        Self {
            step: step.into(),
            options,
        }
    }
}

impl PostProcessor for OptionsPost {
    fn step(&self) -> &str {
        &self.step
    }

    fn apply(&self, generated: &mut Map<String, Value>, _block: &Block) {
        if self.options.is_null() {
            return;
        }
        let current = generated.remove("options").unwrap_or(Value::Null);
        let merged = match current {
            Value::Null => self.options.clone(),
            current => deep_merge(current, self.options.clone()),
        };
        generated.insert("options".to_string(), merged);
    }
}

/// A post-processor backed by a closure.
pub struct FnPost {
    step: String,
    apply: Box<dyn Fn(&mut Map<String, Value>, &Block) + Send + Sync>,
}

impl FnPost {
    pub fn new<F>(step: impl Into<String>, apply: F) -> Self
    where
        F: Fn(&mut Map<String, Value>, &Block) + Send + Sync + 'static,
    {
        Self {
            step: step.into(),
            apply: Box::new(apply),
        }
    }
}

impl fmt::Debug for FnPost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPost")
            .field("step", &self.step)
            .finish_non_exhaustive()
    }
}

impl PostProcessor for FnPost {
    fn step(&self) -> &str {
        &self.step
    }

    fn apply(&self, generated: &mut Map<String, Value>, block: &Block) {
        (self.apply)(generated, block)
    }
}

/// A post-processor bound to its canonical step name.
#[derive(Debug, Clone)]
pub(crate) struct BoundPost {
    pub step: String,
    pub processor: SharedPost,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block() -> Block {
        Block::new("js", "scripts/site.js", ["foo.js"])
    }

    #[test]
    fn test_options_post_inserts_options() {
        let post = OptionsPost::new("uglify", json!({"mangle": false}));
        let mut generated = Map::new();
        post.apply(&mut generated, &block());
        assert_eq!(generated["options"], json!({"mangle": false}));
    }

    #[test]
    fn test_options_post_merges_existing_options() {
        let post = OptionsPost::new("uglify", json!({"compress": {"drop_console": true}}));
        let mut generated = Map::new();
        generated.insert(
            "options".to_string(),
            json!({"mangle": false, "compress": {"sequences": true}}),
        );
        post.apply(&mut generated, &block());
        assert_eq!(
            generated["options"],
            json!({"mangle": false, "compress": {"sequences": true, "drop_console": true}})
        );
    }

    #[test]
    fn test_fn_post_sees_block() {
        let post = FnPost::new("concat", |generated, block| {
            generated.insert("banner".to_string(), json!(format!("/* {} */", block.dest)));
        });
        let mut generated = Map::new();
        post.apply(&mut generated, &block());
        assert_eq!(generated["banner"], "/* scripts/site.js */");
        assert_eq!(post.step(), "concat");
    }
}
