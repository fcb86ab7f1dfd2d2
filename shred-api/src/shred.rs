//! # Shred Lifecycle Contract
//!
//! A shred is a host-managed unit of deployable background functionality,
//! analogous to a lightweight service component. The host constructs it,
//! calls [`Shred::start`] once it should begin working, and calls
//! [`Shred::stop`] before process shutdown or unload.
//!
//! The base contract is single-shot: started once, stopped once, then
//! discarded. Implementations are free to support restart; the queue
//! processor shred in the `shred` crate does so via an internal started
//! flag.

/// Deployment metadata describing whether the host should load a shred into
/// its own isolation domain or share the host's default context.
///
/// This is a declarative hint consumed by the host when deciding deployment
/// topology; nothing in the core acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    /// Load the shred into a dedicated isolation domain.
    #[default]
    OwnDomain,
    /// Load the shred into the host's own context.
    SharedDomain,
}

/// Lifecycle contract between a host process and a unit of background work.
///
/// # Contract
///
/// `start` and `stop` must never panic and return nothing: by design no
/// failure inside a shred is allowed to reach the host through its
/// lifecycle calls. The only externally observable signal of failure is
/// the log stream.
pub trait Shred: Send {
    /// Begin background work. Called at most once before `stop`.
    fn start(&mut self);

    /// Cease background work, best-effort. Must be safe to call when the
    /// shred never started or already stopped.
    fn stop(&mut self);

    /// Human-readable identification for the host's listing surfaces.
    fn display_name(&self) -> String;

    /// Human-readable description for the host's listing surfaces.
    fn description(&self) -> String;

    /// Deployment hint for the host. Defaults to a dedicated domain.
    fn isolation_level(&self) -> IsolationLevel {
        IsolationLevel::default()
    }
}
