//! Explicit holder of the character list.
//!
//! Every change goes through [`CharacterList::apply`], a pure transition from
//! the previous list and a [`StoreEvent`] to the next list.

use shared::{domain::CharacterId, protocol::Character};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Replaced(Vec<Character>),
    Inserted(Character),
    Removed(CharacterId),
}

/// Server order, with created characters appended at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterList(Vec<Character>);

impl CharacterList {
    pub fn new(characters: Vec<Character>) -> Self {
        Self(characters)
    }

    pub fn apply(self, event: StoreEvent) -> Self {
        match event {
            StoreEvent::Replaced(characters) => Self(characters),
            StoreEvent::Inserted(character) => {
                let mut characters = self.0;
                characters.push(character);
                Self(characters)
            }
            StoreEvent::Removed(id) => {
                Self(self.0.into_iter().filter(|c| c.id != id).collect())
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&Character> {
        self.0.get(index)
    }

    pub fn position_of(&self, id: &CharacterId) -> Option<usize> {
        self.0.iter().position(|c| &c.id == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Character] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Character> {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    /// Bumped once per applied event.
    pub revision: u64,
    pub characters: CharacterList,
}

pub struct CharacterStore {
    state: watch::Sender<StoreSnapshot>,
}

impl Default for CharacterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(StoreSnapshot::default());
        Self { state }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    pub fn characters(&self) -> Vec<Character> {
        self.state.borrow().characters.as_slice().to_vec()
    }

    pub fn revision(&self) -> u64 {
        self.state.borrow().revision
    }

    pub fn get(&self, index: usize) -> Option<Character> {
        self.state.borrow().characters.get(index).cloned()
    }

    pub fn dispatch(&self, event: StoreEvent) -> StoreSnapshot {
        self.state.send_modify(|snapshot| {
            let current = std::mem::take(&mut snapshot.characters);
            snapshot.characters = current.apply(event);
            snapshot.revision += 1;
        });
        self.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }
}
