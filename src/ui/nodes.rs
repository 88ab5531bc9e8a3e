//! One DOM node per active invader

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::sim::Invader;

/// Owns the `.invader` nodes inside the play area, keyed by invader id
pub struct InvaderNodes {
    container: Option<Element>,
    nodes: HashMap<u32, HtmlElement>,
}

impl InvaderNodes {
    pub fn new(container: Option<Element>) -> Self {
        Self {
            container,
            nodes: HashMap::new(),
        }
    }

    pub fn attach(&mut self, document: &Document, invader: &Invader) {
        let Some(container) = &self.container else {
            return;
        };
        let Some(node) = document
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            log::warn!("Could not create node for invader {}", invader.id);
            return;
        };
        node.set_class_name("invader");
        node.set_text_content(Some(&invader.value.to_string()));
        place(&node, invader);
        if container.append_child(&node).is_ok() {
            self.nodes.insert(invader.id, node);
        }
    }

    pub fn detach(&mut self, id: u32) {
        if let Some(node) = self.nodes.remove(&id) {
            node.remove();
        }
    }

    pub fn detach_all(&mut self) {
        for (_, node) in self.nodes.drain() {
            node.remove();
        }
    }

    /// Move every node to its invader's current position
    pub fn sync(&self, invaders: &[Invader]) {
        for invader in invaders {
            if let Some(node) = self.nodes.get(&invader.id) {
                place(node, invader);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn place(node: &HtmlElement, invader: &Invader) {
    let pos = invader.pos();
    let _ = node
        .style()
        .set_property("transform", &format!("translate({:.1}px, {:.1}px)", pos.x, pos.y));
}
