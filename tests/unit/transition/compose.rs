use super::*;
use crate::transition::{accessor::Accessor, classify::Leaf, lerp::Lerp};

#[derive(Clone, Debug, PartialEq)]
struct ShelfG {
    x: f64,
}

impl Lerp for ShelfG {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            x: f64::lerp(&a.x, &b.x, t),
        }
    }
}

impl Anchored for ShelfG {
    fn anchor(&self) -> Vec2 {
        Vec2::new(self.x, 0.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
struct BookG {
    value: f64,
    pos: f64,
}

impl Lerp for BookG {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            value: f64::lerp(&a.value, &b.value, t),
            pos: f64::lerp(&a.pos, &b.pos, t),
        }
    }
}

impl Relocate for BookG {
    fn relocate(&mut self, delta: Vec2) {
        self.pos += delta.x;
    }
}

#[derive(Clone, Debug)]
struct Shelf {
    key: String,
    x: f64,
    books: Vec<Book>,
}

#[derive(Clone, Debug)]
struct Book {
    key: String,
    value: f64,
    pos: f64,
    teleport_from: Option<String>,
}

impl Builder for Shelf {
    type Snapshot = ShelfG;

    fn key(&self) -> &str {
        &self.key
    }

    fn build(&self, s: &Accessor<'_, ShelfG>) -> ShelfG {
        ShelfG {
            x: s.pick(self.x, None, None),
        }
    }
}

impl Parent for Shelf {
    type Child = Book;

    fn children(&self) -> &[Book] {
        &self.books
    }
}

impl Builder for Book {
    type Snapshot = BookG;

    fn key(&self) -> &str {
        &self.key
    }

    fn build(&self, s: &Accessor<'_, BookG>) -> BookG {
        BookG {
            value: s.pick(0.0, Some(self.value), Some(0.0)),
            pos: self.pos,
        }
    }
}

impl Teleport for Book {
    fn teleport_from(&self) -> Option<&str> {
        self.teleport_from.as_deref()
    }
}

type ShelfNode = Node<Shelf, LeafNode<Book>>;

fn shelf(key: &str, x: f64, books: Vec<Book>) -> Shelf {
    Shelf {
        key: key.to_string(),
        x,
        books,
    }
}

fn book(key: &str, value: f64) -> Book {
    Book {
        key: key.to_string(),
        value,
        pos: 0.0,
        teleport_from: None,
    }
}

fn moved(key: &str, value: f64, from: &str) -> Book {
    Book {
        teleport_from: Some(from.to_string()),
        ..book(key, value)
    }
}

fn step(current: &[Shelf], previous: &[ShelfNode]) -> Vec<ShelfNode> {
    compose_family(current, previous, |_, _, _| Vec::<Leaf>::new())
}

fn find<'a>(nodes: &'a [ShelfNode], key: &str) -> &'a ShelfNode {
    nodes.iter().find(|n| n.key() == key).unwrap()
}

#[test]
fn teleport_between_groups_continues_the_datum() {
    let previous = step(&[shelf("A", 0.0, vec![book("x", 5.0)])], &[]);
    let nodes = step(&[shelf("B", 0.0, vec![moved("x", 8.0, "A:x")])], &previous);

    let a = find(&nodes, "A");
    assert_eq!(a.state(), Lifecycle::Exit);
    assert!(a.children.is_empty());

    let b = find(&nodes, "B");
    assert_eq!(b.state(), Lifecycle::Enter);
    assert_eq!(b.children.len(), 1);
    let x = &b.children[0].transition;
    assert_eq!(x.state, Lifecycle::Update);
    assert_eq!(x.from.value, 5.0);
    assert_eq!(x.to.value, 8.0);
}

#[test]
fn claimed_child_is_not_exiting_in_surviving_parent() {
    let previous = step(
        &[
            shelf("A", 0.0, vec![book("x", 1.0), book("y", 2.0)]),
            shelf("B", 50.0, vec![]),
        ],
        &[],
    );
    let nodes = step(
        &[
            shelf("A", 0.0, vec![book("y", 2.0)]),
            shelf("B", 50.0, vec![moved("x", 1.0, "A:x")]),
        ],
        &previous,
    );
    let a = find(&nodes, "A");
    assert_eq!(a.state(), Lifecycle::Update);
    let keys: Vec<_> = a.children.iter().map(|c| c.key()).collect();
    assert_eq!(keys, vec!["y"]);
    assert_eq!(find(&nodes, "B").children[0].state(), Lifecycle::Update);
}

#[test]
fn teleported_position_is_expressed_in_new_frame() {
    let mut start = book("x", 5.0);
    start.pos = 10.0;
    let previous = step(&[shelf("A", 100.0, vec![start])], &[]);

    let mut target = moved("x", 5.0, "A:x");
    target.pos = 4.0;
    let nodes = step(
        &[shelf("A", 100.0, vec![]), shelf("B", 300.0, vec![target])],
        &previous,
    );
    let x = &find(&nodes, "B").children[0].transition;
    assert_eq!(x.from.pos, 10.0 + (100.0 - 300.0));
    assert_eq!(x.to.pos, 4.0);

    // Absolute position at t=0 matches where the datum was.
    let b_anchor = find(&nodes, "B").transition.sample(0.0).x;
    assert_eq!(b_anchor + x.sample(0.0).pos, 100.0 + 10.0);
}

#[test]
fn unknown_teleport_reference_enters() {
    let previous = step(&[shelf("A", 0.0, vec![book("x", 5.0)])], &[]);
    let nodes = step(
        &[
            shelf("A", 0.0, vec![book("x", 5.0)]),
            shelf("B", 0.0, vec![moved("z", 3.0, "A:nope")]),
        ],
        &previous,
    );
    let z = &find(&nodes, "B").children[0].transition;
    assert_eq!(z.state, Lifecycle::Enter);
    assert_eq!(z.from.value, 0.0);
    assert_eq!(find(&nodes, "A").children[0].state(), Lifecycle::Update);
}

#[test]
fn child_pass_is_scoped_to_matched_parent() {
    let previous = step(
        &[
            shelf("A", 0.0, vec![book("x", 1.0)]),
            shelf("B", 0.0, vec![book("x", 9.0)]),
        ],
        &[],
    );
    let nodes = step(
        &[
            shelf("A", 0.0, vec![book("x", 2.0)]),
            shelf("B", 0.0, vec![]),
        ],
        &previous,
    );
    let a = &find(&nodes, "A").children[0].transition;
    assert_eq!(a.state, Lifecycle::Update);
    assert_eq!(a.from.value, 1.0);

    let b = &find(&nodes, "B").children[0].transition;
    assert_eq!(b.state, Lifecycle::Exit);
    assert_eq!(b.from.value, 9.0);
    assert_eq!(b.to.value, 0.0);
}

#[test]
fn entering_parent_children_enter_without_previous() {
    let previous = step(&[shelf("A", 0.0, vec![book("x", 1.0)])], &[]);
    let nodes = step(&[shelf("B", 0.0, vec![book("x", 2.0)])], &previous);
    let b = find(&nodes, "B");
    assert_eq!(b.children[0].state(), Lifecycle::Enter);
    // Plain key match never crosses parents.
    assert_eq!(find(&nodes, "A").children[0].state(), Lifecycle::Exit);
}

#[test]
fn grandchildren_see_teleport_basis() {
    let previous = step(&[shelf("A", 0.0, vec![book("x", 5.0)])], &[]);
    let mut seen = Vec::new();
    let _ = compose_family(
        &[shelf("B", 0.0, vec![moved("x", 8.0, "A:x")])],
        &previous,
        |child, state, basis| {
            seen.push((
                child.key.clone(),
                state,
                basis.map(|n| n.transition.to.value),
            ));
            Vec::<Leaf>::new()
        },
    );
    assert!(seen.contains(&("x".to_string(), Lifecycle::Update, Some(5.0))));
}

#[test]
fn teleport_index_covers_all_previous_children() {
    let previous = step(
        &[
            shelf("A", 1.0, vec![book("x", 1.0), book("y", 1.0)]),
            shelf("B", 2.0, vec![book("x", 1.0)]),
        ],
        &[],
    );
    let index = TeleportIndex::new(&previous);
    assert_eq!(index.len(), 3);
    let hit = index.get("B:x").unwrap();
    assert_eq!(hit.parent_anchor, Vec2::new(2.0, 0.0));
    assert!(index.get("C:x").is_none());
}

#[test]
fn leaves_compose_by_key() {
    let first = compose_leaves(&[book("a", 1.0)], &[]);
    let second = compose_leaves(&[book("a", 2.0)], &first);
    assert_eq!(second[0].state(), Lifecycle::Update);
    assert_eq!(second[0].transition.from.value, 1.0);
}
