//! Handle collections for actors referenced by the collision grid
//!
//! The grid never owns actors. It stores generational [`ActorHandle`]s and
//! resolves them through an [`ActorLookup`] only when a narrow-phase test
//! needs the actor's geometry. A handle whose actor has been removed from its
//! arena resolves to `None` instead of dangling.

use std::collections::HashMap;

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Non-owning, generation-checked reference to an actor
    pub struct ActorHandle;
}

/// Arena of actors keyed by [`ActorHandle`]
pub type ActorMap<T> = SlotMap<ActorHandle, T>;

/// Resolves actor handles to actor data for narrow-phase tests
pub trait ActorLookup {
    /// Actor type produced by this lookup
    type Actor;

    /// Get the actor behind `handle`, or `None` for a stale handle
    fn actor(&self, handle: ActorHandle) -> Option<&Self::Actor>;
}

impl<T> ActorLookup for SlotMap<ActorHandle, T> {
    type Actor = T;

    fn actor(&self, handle: ActorHandle) -> Option<&T> {
        self.get(handle)
    }
}

impl<T> ActorLookup for HashMap<ActorHandle, T> {
    type Actor = T;

    fn actor(&self, handle: ActorHandle) -> Option<&T> {
        self.get(&handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_handle_resolves_to_none() {
        let mut actors: ActorMap<u32> = ActorMap::with_key();
        let handle = actors.insert(7);
        assert_eq!(actors.actor(handle), Some(&7));

        actors.remove(handle);
        let reused = actors.insert(8);
        assert_ne!(handle, reused);
        assert!(actors.actor(handle).is_none());
    }
}
