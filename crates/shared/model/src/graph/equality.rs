use super::{Graph, ObjectId, ObjectRef};
use crate::resolver::Item;
use fxhash::FxHashMap;

/// Pairs objects of the left graph with objects of the right graph. A pair is
/// fixed on first visit, which both terminates cycles and requires shared
/// objects on the left to stay shared on the right.
#[derive(Default)]
struct Pairing {
    left: FxHashMap<ObjectId, ObjectId>,
    right: FxHashMap<ObjectId, ObjectId>,
}

impl Graph {
    /// Field-for-field equality of object `a` in `self` and object `b` in `other`.
    ///
    /// Metadata is ignored and resolved references compare as their targets, so
    /// a value written inline on one side may be a pointer on the other. Two
    /// paths reaching the same object on one side must reach the same object on
    /// the other side too.
    #[must_use]
    pub fn deep_eq(&self, a: ObjectId, other: &Self, b: ObjectId) -> bool {
        match (self.object(a), other.object(b)) {
            (Ok(a), Ok(b)) => objects_eq(a, b, &mut Pairing::default()),
            _ => false,
        }
    }
}

fn objects_eq(a: ObjectRef<'_>, b: ObjectRef<'_>, pairing: &mut Pairing) -> bool {
    match (pairing.left.get(&a.id()).copied(), pairing.right.get(&b.id()).copied()) {
        (Some(paired), _) => return paired == b.id(),
        (None, Some(_)) => return false,
        (None, None) => {
            pairing.left.insert(a.id(), b.id());
            pairing.right.insert(b.id(), a.id());
        }
    }

    if a.type_name() != b.type_name() {
        return false;
    }

    (0..a.type_def().fields().len()).all(|index| {
        let (left, right) = (a.slot(index), b.slot(index));
        left.len() == right.len()
            && left.iter().zip(right).all(|(x, y)| {
                match (a.graph().deref(x), b.graph().deref(y)) {
                    (Ok(x), Ok(y)) => items_eq(x, y, pairing),
                    _ => false,
                }
            })
    })
}

fn items_eq(a: Item<'_>, b: Item<'_>, pairing: &mut Pairing) -> bool {
    match (a, b) {
        (Item::Scalar(x), Item::Scalar(y)) => x == y,
        (Item::Enum(x), Item::Enum(y)) => x == y,
        (Item::Object(x), Item::Object(y)) => objects_eq(x, y, pairing),
        _ => false,
    }
}
