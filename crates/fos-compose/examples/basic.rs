//! Example: compose a card component with named and default slots

use fos_compose::{DomTree, NodeOperations, ShadowRootMode};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut tree = DomTree::new();

    // <x-card> with a shadow tree: <slot name="title">Untitled</slot><slot>No content</slot>
    let card = tree.create_element("x-card");
    tree.append_child(tree.root(), card)?;
    let shadow = tree.attach_shadow(card, ShadowRootMode::Open)?;

    let title_slot = tree.create_element("slot");
    tree.set_attribute(title_slot, "name", "title")?;
    let untitled = tree.create_text("Untitled");
    tree.append_child(title_slot, untitled)?;

    let body_slot = tree.create_element("slot");
    let empty = tree.create_text("No content");
    tree.append_child(body_slot, empty)?;

    tree.append_child(shadow, title_slot)?;
    tree.append_child(shadow, body_slot)?;
    println!("empty card:   {:?}", tree.render_text(card));

    // Light content
    let heading = tree.create_element("h2");
    tree.set_attribute(heading, "slot", "title")?;
    let heading_text = tree.create_text("Hello");
    tree.append_child(heading, heading_text)?;
    let body = tree.create_text(", world");

    tree.append_child(card, heading)?;
    tree.append_child(card, body)?;
    println!("filled card:  {:?}", tree.render_text(card));

    tree.remove_child(card, heading)?;
    println!("title removed: {:?}", tree.render_text(card));

    for slot in tree.take_signal_slots() {
        println!("slot {} changed, now shows {:?}", slot, tree.assigned_nodes(slot, true));
    }
    println!("{} mutation records queued", tree.take_records().len());

    Ok(())
}
