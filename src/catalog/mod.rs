//! Content catalog wiring.
//!
//! Libraries are loaded from JSON files (see `schema/content_library.schema.json`)
//! and flattened into a `ContentIndex`. Types in `model` mirror the authored
//! files; `identity` holds the identifier newtypes and the composite key
//! parser; `LibraryRepository` keeps libraries in catalog order.

pub mod identity;
pub mod index;
pub mod model;
pub mod repository;

pub use identity::{
    CompositeKey, ContentId, ContentKind, KEY_DELIMITER, LevelId, LibraryKey, MalformedKey,
    SubTypeId, parse_key, split_candidates,
};
pub use index::{ContentIndex, DuplicateEntry, IndexedLevel, Lookup};
pub use model::{
    ContentItem, ContentLibrary, LevelDefinition, Payload, Question, QuestionStrategy,
    SubItemDefinition,
};
pub use repository::LibraryRepository;

pub use model::{load_library_from_path, parse_library};
