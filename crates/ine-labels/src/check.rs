//! Validation of a label schema against observed labels.
//!
//! Upstream layouts are not guaranteed stable: a geography segment may move
//! or vanish between tables. A mismatch here points at the schema, not at the
//! data.

use ine_core::source::LabelSchema;

use crate::parse::split_segments;

/// How many example labels to keep per mismatch kind.
const MAX_EXAMPLES: usize = 3;

/// Summary of how well a batch of labels fits a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCheck {
  pub sampled:        usize,
  /// Labels with exactly as many segments as the schema has positions.
  pub exact:          usize,
  /// Labels too short to parse; these records will be skipped.
  pub short:          usize,
  /// Labels with more segments than the schema describes.
  pub long:           usize,
  pub short_examples: Vec<String>,
  pub long_examples:  Vec<String>,
}

impl SchemaCheck {
  pub fn is_clean(&self) -> bool { self.short == 0 && self.long == 0 }
}

/// Compare each label's segment count with the schema's length.
pub fn check_samples<'a, I>(schema: &LabelSchema, labels: I) -> SchemaCheck
where
  I: IntoIterator<Item = &'a str>,
{
  let declared = schema.positions().len();
  let required = schema.required_segments();
  let mut check = SchemaCheck::default();

  for label in labels {
    check.sampled += 1;
    let n = split_segments(label).len();
    if n < required {
      check.short += 1;
      if check.short_examples.len() < MAX_EXAMPLES {
        check.short_examples.push(label.to_owned());
      }
    } else if n > declared {
      check.long += 1;
      if check.long_examples.len() < MAX_EXAMPLES {
        check.long_examples.push(label.to_owned());
      }
    } else {
      check.exact += 1;
    }
  }

  check
}
