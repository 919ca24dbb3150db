use crate::entity::{EntityType, Instance};
use crate::gateway::RawCursor;

/// Hydrates raw query results into clean [Instance]s one at a time.
pub struct InstanceCursor {
    cursor: RawCursor,
    entity_type: EntityType,
}

impl InstanceCursor {
    pub(crate) fn new(cursor: RawCursor, entity_type: EntityType) -> Self {
        InstanceCursor { cursor, entity_type }
    }

    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }
}

impl Iterator for InstanceCursor {
    type Item = Instance;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next().map(|raw| self.entity_type.hydrate(raw))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}
