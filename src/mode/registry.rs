use std::collections::HashMap;
use std::fmt;

use log::debug;

use super::{Mode, ModeError, ModeOptions};

/// Builds a fresh mode instance from its options.
pub type ModeFactory = Box<dyn Fn(&ModeOptions) -> Box<dyn Mode>>;

/// Mode name to factory mapping.
///
/// Populated once at startup and then handed to the dispatcher, which only
/// reads from it. Names are validated when registered, not when used.
#[derive(Default)]
pub struct ModeRegistry {
    factories: HashMap<String, ModeFactory>,
}

impl fmt::Debug for ModeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeRegistry")
            .field("modes", &self.names())
            .finish()
    }
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`.
    ///
    /// # Errors
    /// Fails on an empty name or a name that is already registered.
    pub fn register<F, M>(&mut self, name: impl Into<String>, factory: F) -> Result<(), ModeError>
    where
        F: Fn(&ModeOptions) -> M + 'static,
        M: Mode + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModeError::EmptyName);
        }
        if self.factories.contains_key(&name) {
            return Err(ModeError::DuplicateMode(name));
        }

        debug!("Registered mode '{name}'");
        self.factories.insert(
            name,
            Box::new(move |options| Box::new(factory(options)) as Box<dyn Mode>),
        );
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub(crate) fn factory(&self, name: &str) -> Result<&ModeFactory, ModeError> {
        self.factories
            .get(name)
            .ok_or_else(|| ModeError::UnknownMode(name.to_string()))
    }
}
