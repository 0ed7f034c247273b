use super::*;
use serde_json::json;

fn step(value: serde_json::Value) -> Step {
    let step: Step = serde_json::from_value(value).unwrap();
    step.validate().unwrap();
    step
}

fn circle(r: f64) -> serde_json::Value {
    json!({"kind": "circle", "r": r})
}

fn group<'a>(tree: &'a StepTree, key: &str) -> &'a GroupNode {
    tree.groups.iter().find(|g| g.key() == key).unwrap()
}

#[test]
fn first_step_enters_everything() {
    let options = StoryOptions::default();
    let s = step(json!({"groups": [{"key": "A", "data": [
        {"key": "x", "value": 5, "shape": circle(4.0), "labels": [{"key": "v", "text": "5"}]}
    ]}]}));
    let tree = compose_step(&s, &options, None);
    assert_eq!(tree.census(), (3, 0, 0));

    let frame = resolve_step(&tree, 0.0);
    let x = &frame.groups[0].children[0];
    assert_eq!(x.snapshot.value, 0.0);
    assert_eq!(x.snapshot.opacity, 0.0);
    assert_eq!(x.children[0].snapshot.opacity, 0.0);

    let frame = resolve_step(&tree, 1.0);
    assert_eq!(frame.groups[0].children[0].snapshot.value, 5.0);
}

#[test]
fn datum_teleports_to_a_new_group() {
    let options = StoryOptions::default();
    let before = step(json!({"groups": [{"key": "A", "data": [
        {"key": "x", "value": 5, "shape": circle(4.0)}
    ]}]}));
    let after = step(json!({"groups": [{"key": "B", "data": [
        {"key": "x", "value": 8, "shape": circle(6.0), "teleportFrom": "A:x"}
    ]}]}));

    let first = compose_step(&before, &options, None);
    let tree = compose_step(&after, &options, Some(&first));

    let a = group(&tree, "A");
    assert_eq!(a.state(), Lifecycle::Exit);
    assert!(a.children.is_empty());

    let b = group(&tree, "B");
    assert_eq!(b.state(), Lifecycle::Enter);
    let x = &b.children[0].transition;
    assert_eq!(x.state, Lifecycle::Update);
    assert_eq!(x.from.value, 5.0);
    assert_eq!(x.to.value, 8.0);
}

#[test]
fn teleported_datum_keeps_its_absolute_position() {
    let options = StoryOptions::default();
    let before = step(json!({"groups": [{"key": "A", "x": 100, "y": 50, "data": [
        {"key": "x", "x": 10, "y": 20, "value": 1, "shape": circle(4.0)}
    ]}]}));
    let after = step(json!({"groups": [
        {"key": "A", "x": 100, "y": 50},
        {"key": "B", "x": 300, "y": 0, "data": [
            {"key": "x", "x": 5, "y": 5, "value": 1, "shape": circle(4.0), "teleport_from": "A:x"}
        ]}
    ]}));
    let first = compose_step(&before, &options, None);
    let tree = compose_step(&after, &options, Some(&first));

    let frame = resolve_step(&tree, 0.0);
    let b = frame.groups.iter().find(|g| g.key == "B").unwrap();
    let x = &b.children[0].snapshot;
    assert_eq!(b.snapshot.x + x.x, 110.0);
    assert_eq!(b.snapshot.y + x.y, 70.0);

    let settled = resolve_step(&tree, 1.0);
    let b = settled.groups.iter().find(|g| g.key == "B").unwrap();
    assert_eq!((b.children[0].snapshot.x, b.children[0].snapshot.y), (5.0, 5.0));

    // The claimed datum is not also exiting from "A".
    assert!(group(&tree, "A").children.is_empty());
}

#[test]
fn teleported_labels_hand_off() {
    let options = StoryOptions::default();
    let before = step(json!({"groups": [{"key": "A", "data": [
        {"key": "x", "value": 5, "shape": circle(4.0), "labels": [{"key": "v", "text": "5"}]}
    ]}]}));
    let after = step(json!({"groups": [{"key": "B", "data": [
        {"key": "x", "value": 8, "shape": circle(4.0), "teleportFrom": "A:x",
         "labels": [{"key": "v", "text": "8"}]}
    ]}]}));
    let first = compose_step(&before, &options, None);
    let tree = compose_step(&after, &options, Some(&first));

    let label = &group(&tree, "B").children[0].children[0].transition;
    assert_eq!(label.state, Lifecycle::Update);
    assert_eq!(label.from.binding, "A:x:v");
    assert_eq!(label.to.binding, "B:x:v");

    let quarter = label.sample(0.25);
    assert_eq!(quarter.text, "5");
    assert_eq!(quarter.opacity, 0.5);
    let half = label.sample(0.5);
    assert_eq!(half.text, "8");
    assert_eq!(half.opacity, 0.0);
}

#[test]
fn exiting_datum_takes_its_labels_along() {
    let options = StoryOptions::default();
    let before = step(json!({"groups": [{"key": "A", "data": [
        {"key": "x", "value": 5, "shape": circle(4.0), "labels": [{"key": "v", "text": "5"}]}
    ]}]}));
    let after = step(json!({"groups": [{"key": "A"}]}));
    let first = compose_step(&before, &options, None);
    let tree = compose_step(&after, &options, Some(&first));

    assert_eq!(tree.census(), (0, 1, 2));
    let x = &group(&tree, "A").children[0];
    assert_eq!(x.state(), Lifecycle::Exit);
    let v = &x.children[0].transition;
    assert_eq!(v.state, Lifecycle::Exit);
    assert_eq!(v.from.font_size, 12.0);
    assert_eq!(v.to.font_size, 0.0);
}

#[test]
fn interrupted_transition_restarts_from_settled_state() {
    let options = StoryOptions::default();
    let one = step(json!({"groups": [{"key": "A", "data": [
        {"key": "x", "value": 1, "shape": circle(1.0)}
    ]}]}));
    let two = step(json!({"groups": [{"key": "A", "data": [
        {"key": "x", "value": 2, "shape": circle(2.0)}
    ]}]}));
    let three = step(json!({"groups": [{"key": "A", "data": [
        {"key": "x", "value": 3, "shape": circle(3.0)}
    ]}]}));
    let t1 = compose_step(&one, &options, None);
    let t2 = compose_step(&two, &options, Some(&t1));
    let t3 = compose_step(&three, &options, Some(&t2));
    let x = &t3.groups[0].children[0].transition;
    assert_eq!(x.state, Lifecycle::Update);
    assert_eq!(x.from.value, 2.0);
    assert_eq!(x.to.value, 3.0);
}

#[test]
fn cross_chart_morph_keeps_path_topology() {
    let options = StoryOptions {
        cartoonize: true,
        ..StoryOptions::default()
    };
    let bars = step(json!({"chart": "bar", "groups": [{"key": "A", "data": [
        {"key": "x", "value": 3, "shape": {"kind": "rect", "width": 10, "height": 30}}
    ]}]}));
    let pie = step(json!({"chart": "pie", "groups": [{"key": "A", "data": [
        {"key": "x", "value": 3, "shape": {"kind": "wedge", "r": 40, "start_angle": 0.0, "end_angle": 1.2}}
    ]}]}));
    let first = compose_step(&bars, &options, None);
    let tree = compose_step(&pie, &options, Some(&first));
    assert_eq!(tree.chart, ChartKind::Pie);

    let x = &tree.groups[0].children[0].transition;
    assert!(x.from.d.same_topology(&x.to.d));
    for t in [0.0, 0.3, 0.5, 0.9, 1.0] {
        assert!(x.sample(t).d.is_finite());
    }
}

#[test]
fn resolved_frame_serializes_flat() {
    let options = StoryOptions::default();
    let s = step(json!({"chart": "scatter", "groups": [{"key": "A", "data": [
        {"key": "x", "value": 1, "shape": circle(2.0), "fill": [0, 0, 255, 255]}
    ]}]}));
    let tree = compose_step(&s, &options, None);
    let v = serde_json::to_value(resolve_step(&tree, 1.0)).unwrap();
    assert_eq!(v["chart"], "scatter");
    assert_eq!(v["t"], 1.0);
    let x = &v["groups"][0]["children"][0];
    assert_eq!(x["key"], "x");
    assert_eq!(x["state"], "enter");
    assert_eq!(x["fill"], "rgba(0,0,255,1)");
    assert!(x.get("children").is_none());
}
