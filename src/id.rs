//! Identifier Module
//!
//! Generates correlation ids for builders that were not given one.

use uuid::Uuid;

// == Id Generator Trait ==
/// Source of fresh opaque identifiers.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn new_id(&self) -> String {
        self()
    }
}

// == UUID Generator ==
/// Random UUID v4 ids, the default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
