//! # Console Module
//!
//! The command dispatcher: one input line in, zero or more output lines out.
//!
//! A line is parsed by [`syntax::parse`] into a normalized call, checked
//! against the validation ladder, and executed on the owned [`Registry`].
//!
//! ## Validation ladder
//!
//! Evaluated in order, stopping at the first failure:
//!
//! 1. kind token present          -> `** class name missing **`
//! 2. kind is known               -> `** class doesn't exist **`
//! 3. identity present            -> `** instance id missing **` (show/destroy/update)
//! 4. `"{Kind}.{id}"` registered  -> `** no instance found **`
//! 5. attribute name present      -> `** attribute name missing **` (update)
//! 6. value present               -> `** value missing **` (update)
//!
//! Lines that match neither syntax are echoed as `*** Unknown syntax: <line>`.

pub mod coerce;
pub mod syntax;

use hbnb_core::{Fields, Kind, Registry, StoreError, key_for, primitives};
use std::path::PathBuf;
use syntax::{Call, Operation, Request};
use thiserror::Error;

/// Prefix of the reply to a line that matches neither syntax.
pub const UNKNOWN_SYNTAX: &str = "*** Unknown syntax: ";

// =============================================================================
// REJECTIONS
// =============================================================================

/// A validation failure. Reported to the user; never fatal.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("class name missing")]
    ClassNameMissing,
    #[error("class doesn't exist")]
    ClassDoesNotExist,
    #[error("instance id missing")]
    InstanceIdMissing,
    #[error("no instance found")]
    NoInstanceFound,
    #[error("attribute name missing")]
    AttributeNameMissing,
    #[error("value missing")]
    ValueMissing,
}

impl Rejection {
    /// The user-facing line, e.g. `** class name missing **`.
    pub fn line(self) -> String {
        format!("** {} **", self)
    }
}

enum Failure {
    Rejected(Rejection),
    Store(StoreError),
}

impl From<Rejection> for Failure {
    fn from(r: Rejection) -> Self {
        Failure::Rejected(r)
    }
}

impl From<StoreError> for Failure {
    fn from(e: StoreError) -> Self {
        Failure::Store(e)
    }
}

// =============================================================================
// REPLY
// =============================================================================

/// Output lines produced by one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
}

impl Reply {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// CONSOLE
// =============================================================================

/// Dispatcher owning the registry for the lifetime of a session.
#[derive(Debug)]
pub struct Console {
    registry: Registry,
}

impl Console {
    /// Wrap an already loaded registry.
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Open the store at `path` (reload-or-empty).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let registry = Registry::open(path)?;
        tracing::info!(
            path = %registry.path().display(),
            objects = registry.len(),
            "store loaded"
        );
        Ok(Self::new(registry))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Persist the store one last time before the session ends.
    pub fn shutdown(&self) -> Result<(), StoreError> {
        self.registry.save()?;
        tracing::info!(objects = self.registry.len(), "store saved on exit");
        Ok(())
    }

    /// Execute one input line.
    ///
    /// Validation failures and unknown syntax come back as reply lines.
    /// `Err` is reserved for store failures (e.g. the file could not be written).
    pub fn execute(&mut self, line: &str) -> Result<Reply, StoreError> {
        let line = line.trim();
        let Some(request) = syntax::parse(line) else {
            tracing::debug!(line, "unknown syntax");
            return Ok(Reply::line(format!("{}{}", UNKNOWN_SYNTAX, line)));
        };
        tracing::debug!(?request, "dispatch");

        let outcome = match request {
            Request::Single(call) => self.dispatch(&call),
            Request::Bulk { call, pairs } => self.update_bulk(&call, &pairs),
        };

        match outcome {
            Ok(reply) => Ok(reply),
            Err(Failure::Rejected(rejection)) => {
                tracing::debug!(%rejection, "rejected");
                Ok(Reply::line(rejection.line()))
            }
            Err(Failure::Store(e)) => Err(e),
        }
    }

    fn dispatch(&mut self, call: &Call) -> Result<Reply, Failure> {
        match call.op {
            Operation::Create => self.create(call),
            Operation::Show => self.show(call),
            Operation::Destroy => self.destroy(call),
            Operation::All => self.all(call),
            Operation::Count => self.count(call),
            Operation::Update => self.update(call),
        }
    }

    // -------------------------------------------------------------------------
    // Ladder
    // -------------------------------------------------------------------------

    fn resolve_kind(kind: Option<&str>) -> Result<Kind, Rejection> {
        let name = kind.ok_or(Rejection::ClassNameMissing)?;
        name.parse().map_err(|_| Rejection::ClassDoesNotExist)
    }

    fn resolve_target(&self, call: &Call) -> Result<(Kind, String), Rejection> {
        let kind = Self::resolve_kind(call.kind.as_deref())?;
        let id = call.id.as_deref().ok_or(Rejection::InstanceIdMissing)?;
        if !self.registry.contains(&key_for(kind, id)) {
            return Err(Rejection::NoInstanceFound);
        }
        Ok((kind, id.to_string()))
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    fn create(&mut self, call: &Call) -> Result<Reply, Failure> {
        let kind = Self::resolve_kind(call.kind.as_deref())?;
        let id = self.registry.create(kind, Fields::new())?.id().to_string();
        self.registry.save()?;
        tracing::info!(%kind, %id, "created");
        Ok(Reply::line(id))
    }

    fn show(&self, call: &Call) -> Result<Reply, Failure> {
        let (kind, id) = self.resolve_target(call)?;
        let entity = self
            .registry
            .get(kind, &id)
            .ok_or(Rejection::NoInstanceFound)?;
        Ok(Reply::line(entity.render()))
    }

    fn destroy(&mut self, call: &Call) -> Result<Reply, Failure> {
        let (kind, id) = self.resolve_target(call)?;
        self.registry.delete(&key_for(kind, &id));
        self.registry.save()?;
        tracing::info!(%kind, %id, "destroyed");
        Ok(Reply::empty())
    }

    fn all(&self, call: &Call) -> Result<Reply, Failure> {
        let kind = match call.kind.as_deref() {
            None => None,
            Some(name) => Some(
                name.parse::<Kind>()
                    .map_err(|_| Rejection::ClassDoesNotExist)?,
            ),
        };
        let items: Vec<String> = self
            .registry
            .of_kind(kind)
            .map(|entity| format!("\"{}\"", entity.render().replace('"', "\\\"")))
            .collect();
        Ok(Reply::line(format!("[{}]", items.join(", "))))
    }

    fn count(&self, call: &Call) -> Result<Reply, Failure> {
        let kind = Self::resolve_kind(call.kind.as_deref())?;
        Ok(Reply::line(self.registry.count(kind).to_string()))
    }

    fn update(&mut self, call: &Call) -> Result<Reply, Failure> {
        let (kind, id) = self.resolve_target(call)?;
        let attr = call.attr.as_deref().ok_or(Rejection::AttributeNameMissing)?;
        let raw = call.value.as_deref().ok_or(Rejection::ValueMissing)?;
        self.apply_update(kind, &id, attr, raw)?;
        Ok(Reply::empty())
    }

    /// Apply every pair as an independent update. Pairs that cannot be
    /// applied are skipped without a summary.
    fn update_bulk(&mut self, call: &Call, pairs: &[(String, String)]) -> Result<Reply, Failure> {
        let (kind, id) = self.resolve_target(call)?;
        for (attr, raw) in pairs {
            if attr.is_empty() {
                continue;
            }
            self.apply_update(kind, &id, attr, raw)?;
        }
        Ok(Reply::empty())
    }

    /// Set one attribute, refresh `updated_at`, persist.
    ///
    /// Reserved attributes (identity, timestamps, class) are left untouched.
    fn apply_update(
        &mut self,
        kind: Kind,
        id: &str,
        attr: &str,
        raw: &str,
    ) -> Result<(), Failure> {
        if primitives::is_reserved(attr) {
            tracing::debug!(%kind, id, attr, "ignoring update of reserved attribute");
            return Ok(());
        }
        let value = coerce::coerce_for(kind, attr, raw);
        let entity = self
            .registry
            .get_mut(kind, id)
            .ok_or(Rejection::NoInstanceFound)?;
        entity.set_field(attr, value);
        entity.touch();
        self.registry.save()?;
        tracing::info!(%kind, id, attr, "updated");
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
