use std::fmt::Display;

pub type ElementId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Script {
        src: String,
        charset: String,
        is_async: bool,
    },
    Stylesheet {
        href: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementState {
    Pending,
    Loaded { bytes: usize },
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub state: ElementState,
}

// Headless stand-in for the host page
#[derive(Clone, Debug, Default)]
pub struct Document {
    elements: Vec<Element>,
    next_id: ElementId,
}

impl ElementKind {
    pub fn script<T: ToString>(src: T) -> Self {
        ElementKind::Script {
            src: src.to_string(),
            charset: "utf-8".to_owned(),
            is_async: true,
        }
    }

    pub fn stylesheet<T: ToString>(href: T) -> Self {
        ElementKind::Stylesheet {
            href: href.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            ElementKind::Script { src, .. } => src,
            ElementKind::Stylesheet { href } => href,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    pub fn with_script<T: ToString>(src: T) -> Self {
        let mut document = Document::new();
        let id = document.insert(ElementKind::script(src));
        document.set_state(id, ElementState::Loaded { bytes: 0 });
        document
    }

    // New elements go right before the first script, or at the end if there is none
    pub fn insert(&mut self, kind: ElementKind) -> ElementId {
        let id = self.next_id;
        self.next_id += 1;

        let element = Element {
            id,
            kind,
            state: ElementState::Pending,
        };

        match self.elements.iter().position(Element::is_script) {
            Some(idx) => self.elements.insert(idx, element),
            None => self.elements.push(element),
        }

        id
    }

    pub fn set_state(&mut self, id: ElementId, state: ElementState) {
        if let Some(element) = self.elements.iter_mut().find(|e| e.id == id) {
            element.state = state;
        }
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn current_script_src(&self) -> String {
        self.elements
            .iter()
            .rev()
            .find(|e| e.is_script())
            .map(|e| e.kind.url().to_owned())
            .unwrap_or_default()
    }
}

impl Element {
    pub fn is_script(&self) -> bool {
        matches!(self.kind, ElementKind::Script { .. })
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match &self.kind {
            ElementKind::Script { src, .. } => format!("<script src=\"{src}\">"),
            ElementKind::Stylesheet { href } => format!("<link rel=\"stylesheet\" href=\"{href}\">"),
        };

        match &self.state {
            ElementState::Pending => f.write_fmt(format_args!("{tag} pending")),
            ElementState::Loaded { bytes } => f.write_fmt(format_args!("{tag} {bytes} bytes")),
            ElementState::Failed(reason) => f.write_fmt(format_args!("{tag} failed: {reason}")),
        }
    }
}
