//! Object store: every database object of one generation, keyed by id.
//!
//! Objects keep their load order and are assigned dense [`NodeId`]s in that
//! order. The dependency index and the engine work exclusively on these
//! dense ids; the string ids are resolved once, here.

use crate::domain::{DatabaseObject, ObjectId, ObjectType};
use crate::error::{Error, LoadError, Result};
use std::collections::{BTreeMap, HashMap};

/// Dense integer id of an object within one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Position in load order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        // Caches hold thousands of objects, nowhere near u32::MAX.
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

/// Immutable collection of database objects with id, schema and type lookups.
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: Vec<DatabaseObject>,
    by_id: HashMap<ObjectId, NodeId>,
    by_schema: BTreeMap<String, Vec<NodeId>>,
    by_type: BTreeMap<ObjectType, Vec<NodeId>>,
}

impl ObjectStore {
    /// Build a store from objects in load order.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DuplicateObject`] if two objects share an id.
    pub fn from_objects(
        objects: impl IntoIterator<Item = DatabaseObject>,
    ) -> std::result::Result<Self, LoadError> {
        let mut store = Self::default();

        for object in objects {
            let node = NodeId::from_index(store.objects.len());
            if store.by_id.insert(object.id.clone(), node).is_some() {
                return Err(LoadError::DuplicateObject(object.id));
            }
            store
                .by_schema
                .entry(object.schema.clone())
                .or_default()
                .push(node);
            store
                .by_type
                .entry(object.object_type())
                .or_default()
                .push(node);
            store.objects.push(object);
        }

        Ok(store)
    }

    /// Exact-id lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectNotFound`] if no object has this id.
    pub fn get(&self, id: &str) -> Result<&DatabaseObject> {
        self.node_id(id)
            .map(|node| self.object(node))
            .ok_or_else(|| Error::ObjectNotFound(ObjectId::new(id)))
    }

    /// Whether an object with this id exists.
    #[must_use]
    pub fn exists(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All objects in load order.
    #[must_use]
    pub fn all(&self) -> &[DatabaseObject] {
        &self.objects
    }

    /// Resolve a string id to its dense id.
    #[must_use]
    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.by_id.get(id).copied()
    }

    /// The object behind a dense id.
    ///
    /// Dense ids only come from this store, so they are always in range.
    #[must_use]
    pub fn object(&self, node: NodeId) -> &DatabaseObject {
        &self.objects[node.index()]
    }

    /// Objects in a schema, in load order.
    ///
    /// The iterator borrows only the store, not `schema`.
    pub fn in_schema<'a>(
        &'a self,
        schema: &str,
    ) -> impl Iterator<Item = &'a DatabaseObject> + use<'a> {
        self.by_schema
            .get(schema)
            .into_iter()
            .flatten()
            .map(|&node| self.object(node))
    }

    /// Objects of a type, in load order.
    pub fn of_type(&self, object_type: ObjectType) -> impl Iterator<Item = &DatabaseObject> + use<'_> {
        self.by_type
            .get(&object_type)
            .into_iter()
            .flatten()
            .map(|&node| self.object(node))
    }

    /// Distinct schemas, sorted.
    pub fn schemas(&self) -> impl Iterator<Item = &str> + use<'_> {
        self.by_schema.keys().map(String::as_str)
    }

    /// Distinct types present, sorted by declaration order.
    pub fn types(&self) -> impl Iterator<Item = ObjectType> + use<'_> {
        self.by_type.keys().copied()
    }

    /// Number of objects of a type.
    #[must_use]
    pub fn count_of(&self, object_type: ObjectType) -> usize {
        self.by_type.get(&object_type).map_or(0, Vec::len)
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{ObjectDetails, TableDetails, ViewDetails};

    pub(crate) fn object(id: &str, view: bool) -> DatabaseObject {
        let (schema, name) = id.split_once('.').unwrap_or(("S", id));
        DatabaseObject {
            id: ObjectId::new(id),
            schema: schema.to_string(),
            name: name.to_string(),
            platform: None,
            owner: "OWNER".to_string(),
            internal_id: 0,
            created_at: None,
            modified_at: None,
            description: None,
            details: if view {
                ObjectDetails::View(ViewDetails::default())
            } else {
                ObjectDetails::Table(TableDetails::default())
            },
        }
    }

    #[test]
    fn assigns_dense_ids_in_load_order() {
        let store =
            ObjectStore::from_objects([object("A.T1", false), object("B.V1", true)]).unwrap();

        assert_eq!(store.node_id("A.T1").map(NodeId::index), Some(0));
        assert_eq!(store.node_id("B.V1").map(NodeId::index), Some(1));
        assert_eq!(store.all()[1].id.as_str(), "B.V1");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = ObjectStore::from_objects([object("A.T1", false), object("A.T1", true)])
            .unwrap_err();
        assert_eq!(err, LoadError::DuplicateObject(ObjectId::new("A.T1")));
    }

    #[test]
    fn get_unknown_is_not_found() {
        let store = ObjectStore::from_objects([object("A.T1", false)]).unwrap();
        assert!(store.exists("A.T1"));
        assert!(!store.exists("A.T2"));
        assert!(matches!(store.get("A.T2"), Err(Error::ObjectNotFound(id)) if id.as_str() == "A.T2"));
    }

    #[test]
    fn groups_by_schema_and_type() {
        let store = ObjectStore::from_objects([
            object("B.T1", false),
            object("A.V1", true),
            object("A.T2", false),
        ])
        .unwrap();

        assert_eq!(store.schemas().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(store.in_schema("A").count(), 2);
        assert_eq!(store.count_of(ObjectType::Table), 2);
        assert_eq!(
            store.types().collect::<Vec<_>>(),
            vec![ObjectType::Table, ObjectType::View]
        );
    }

    #[test]
    fn schema_iterator_outlives_the_schema_name() {
        let store =
            ObjectStore::from_objects([object("A.T1", false), object("A.V1", true)]).unwrap();

        let members = {
            let schema = String::from("A");
            store.in_schema(&schema)
        };

        let ids: Vec<_> = members.map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["A.T1", "A.V1"]);
    }
}
