//! Grammatically aware label rendering.
//!
//! Labels are templates that refer to nouns by role (`{{entity:0}}`) or by
//! name (`{{noun:account}}`). Rendering inflects those nouns for number and
//! case, makes articles and adjectives agree with them, and honours nouns an
//! administrator has renamed at runtime.
//!
//! ```no_run
//! use std::sync::Arc;
//! use declina::{JsonDirSource, LabelSetLoader, LocalizerFactory};
//!
//! # fn main() -> Result<(), declina::GrammarError> {
//! let source = JsonDirSource::new("labels")?;
//! let loader = LabelSetLoader::new(Arc::new(source), "base", None);
//! let localizer = LocalizerFactory::new(Arc::new(loader)).localizer("en_GB")?;
//! println!("{}", localizer.get_label("Page", "new", &[&"account"], &[]));
//! # Ok(())
//! # }
//! ```

pub mod ast;
pub mod dates;
pub mod declension;
pub mod dictionary;
pub mod error;
pub mod fallbacks;
pub mod grammar;
pub mod label_set;
pub mod language;
pub mod loader;
pub mod localizer;
pub mod modifier;
pub mod noun;
pub mod parser;
pub mod plural;
pub mod render;
pub mod renaming;
pub mod template;

// Re-export the types most callers need
pub use declension::Declension;
pub use dictionary::Dictionary;
pub use error::{GrammarError, GrammarResult};
pub use grammar::{
    AdjectiveForm, ArticleForm, ArticleKind, Case, Gender, NounForm, Number, StartsWith,
};
pub use label_set::{LabelRef, LabelSet, LabelSetLoader};
pub use language::Language;
pub use loader::{InMemorySource, JsonDirSource, LabelSource, LabelSourceProvider};
pub use localizer::{Localizer, LocalizerFactory};
pub use modifier::{Adjective, Article};
pub use noun::{Noun, NounBuilder, NounType};
pub use renaming::{CustomEntity, NoRenaming, Renameable, RenamedNouns, RenamingProvider};
pub use template::Template;
