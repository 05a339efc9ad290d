/// Page access used by the resolver and the dispatcher
///
/// The automation logic only sees these two traits. In the browser they are
/// backed by `web_sys`; tests use the in-memory fake below.
use log::debug;
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlAnchorElement, HtmlElement};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClickError {
    #[error("element is not clickable")]
    NotClickable,
    #[error("click raised: {0}")]
    Raised(String),
}

/// A single element on the page
pub trait PageElement: Clone {
    fn tag_name(&self) -> String;
    fn attribute(&self, name: &str) -> Option<String>;
    fn has_class(&self, class: &str) -> bool;
    /// Nearest inclusive ancestor matching `selector`
    fn closest(&self, selector: &str) -> Option<Self>;
    /// First descendant matching `selector`
    fn query(&self, selector: &str) -> Option<Self>;
    /// Resolved link target, for anchors
    fn href(&self) -> Option<String>;
    fn text(&self) -> String;
    fn click(&self) -> Result<(), ClickError>;

    fn is_button(&self) -> bool {
        self.tag_name().eq_ignore_ascii_case("button")
    }
}

/// The document of the current page
pub trait PageDocument {
    type Element: PageElement;

    fn query(&self, selector: &str) -> Option<Self::Element>;

    /// Try each selector in order; the first hit wins
    fn first_match(&self, selectors: &[&'static str]) -> Option<(Self::Element, &'static str)> {
        selectors.iter().find_map(|selector| {
            self.query(selector).map(|element| {
                debug!("Matched selector {}", selector);
                (element, *selector)
            })
        })
    }
}

/// Live browser document
pub struct BrowserDocument {
    document: Document,
}

impl BrowserDocument {
    pub fn new(document: Document) -> BrowserDocument {
        BrowserDocument { document }
    }

    /// Document of the current window, if any
    pub fn current() -> Option<BrowserDocument> {
        web_sys::window()?.document().map(BrowserDocument::new)
    }
}

impl PageDocument for BrowserDocument {
    type Element = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        // an invalid selector counts as no match
        self.document.query_selector(selector).ok().flatten()
    }
}

impl PageElement for Element {
    fn tag_name(&self) -> String {
        Element::tag_name(self)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn closest(&self, selector: &str) -> Option<Element> {
        Element::closest(self, selector).ok().flatten()
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.query_selector(selector).ok().flatten()
    }

    fn href(&self) -> Option<String> {
        match self.dyn_ref::<HtmlAnchorElement>() {
            Some(anchor) => Some(anchor.href()),
            None => self.get_attribute("href"),
        }
    }

    fn text(&self) -> String {
        self.text_content().unwrap_or_default()
    }

    fn click(&self) -> Result<(), ClickError> {
        let element = self.dyn_ref::<HtmlElement>().ok_or(ClickError::NotClickable)?;
        element.click();
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory page used by unit tests

    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Node {
        tag: String,
        attributes: HashMap<String, String>,
        classes: Vec<String>,
        text: String,
        parent: Option<FakeElement>,
        descendants: HashMap<String, FakeElement>,
        clicks: u32,
        failing_clicks: u32,
        press_on_click: bool,
    }

    /// Shared handle to a fake element; clones observe the same node
    #[derive(Debug, Clone, Default)]
    pub struct FakeElement(Rc<RefCell<Node>>);

    impl FakeElement {
        pub fn new(tag: &str) -> FakeElement {
            FakeElement(Rc::new(RefCell::new(Node {
                tag: tag.to_string(),
                ..Node::default()
            })))
        }

        pub fn with_attribute(self, name: &str, value: &str) -> FakeElement {
            self.set_attribute(name, value);
            self
        }

        pub fn with_class(self, class: &str) -> FakeElement {
            self.0.borrow_mut().classes.push(class.to_string());
            self
        }

        pub fn with_href(self, href: &str) -> FakeElement {
            self.with_attribute("href", href)
        }

        pub fn with_text(self, text: &str) -> FakeElement {
            self.0.borrow_mut().text = text.to_string();
            self
        }

        pub fn with_parent(self, parent: &FakeElement) -> FakeElement {
            self.0.borrow_mut().parent = Some(parent.clone());
            self
        }

        pub fn with_descendant(self, selector: &str, child: FakeElement) -> FakeElement {
            self.0.borrow_mut().descendants.insert(selector.to_string(), child);
            self
        }

        /// Clicking sets `aria-pressed="true"`, like the real toggle
        pub fn pressed_on_click(self) -> FakeElement {
            self.0.borrow_mut().press_on_click = true;
            self
        }

        /// The next `count` clicks raise
        pub fn failing_clicks(self, count: u32) -> FakeElement {
            self.0.borrow_mut().failing_clicks = count;
            self
        }

        pub fn set_attribute(&self, name: &str, value: &str) {
            self.0
                .borrow_mut()
                .attributes
                .insert(name.to_string(), value.to_string());
        }

        pub fn clicks(&self) -> u32 {
            self.0.borrow().clicks
        }

        fn matches(&self, selector: &str) -> bool {
            self.0.borrow().tag.eq_ignore_ascii_case(selector)
        }
    }

    impl PageElement for FakeElement {
        fn tag_name(&self) -> String {
            self.0.borrow().tag.to_uppercase()
        }

        fn attribute(&self, name: &str) -> Option<String> {
            self.0.borrow().attributes.get(name).cloned()
        }

        fn has_class(&self, class: &str) -> bool {
            self.0.borrow().classes.iter().any(|c| c == class)
        }

        fn closest(&self, selector: &str) -> Option<FakeElement> {
            let mut current = Some(self.clone());
            while let Some(element) = current {
                if element.matches(selector) {
                    return Some(element);
                }
                current = element.0.borrow().parent.clone();
            }
            None
        }

        fn query(&self, selector: &str) -> Option<FakeElement> {
            self.0.borrow().descendants.get(selector).cloned()
        }

        fn href(&self) -> Option<String> {
            self.attribute("href")
        }

        fn text(&self) -> String {
            self.0.borrow().text.clone()
        }

        fn click(&self) -> Result<(), ClickError> {
            let mut node = self.0.borrow_mut();
            if node.failing_clicks > 0 {
                node.failing_clicks -= 1;
                return Err(ClickError::Raised("detached".to_string()));
            }
            node.clicks += 1;
            if node.press_on_click {
                node.attributes
                    .insert("aria-pressed".to_string(), "true".to_string());
            }
            Ok(())
        }
    }

    struct Entry {
        element: FakeElement,
        hidden_for: Cell<u32>,
    }

    /// Selector-keyed document; entries can stay hidden for a number of lookups
    #[derive(Default)]
    pub struct FakeDocument {
        entries: RefCell<HashMap<String, Entry>>,
        lookups: Cell<u32>,
    }

    impl FakeDocument {
        pub fn new() -> FakeDocument {
            FakeDocument::default()
        }

        pub fn insert(&self, selector: &str, element: FakeElement) {
            self.insert_after(selector, element, 0);
        }

        /// Element only becomes visible after `lookups` queries for its selector
        pub fn insert_after(&self, selector: &str, element: FakeElement, lookups: u32) {
            self.entries.borrow_mut().insert(
                selector.to_string(),
                Entry {
                    element,
                    hidden_for: Cell::new(lookups),
                },
            );
        }

        pub fn lookups(&self) -> u32 {
            self.lookups.get()
        }
    }

    impl PageDocument for FakeDocument {
        type Element = FakeElement;

        fn query(&self, selector: &str) -> Option<FakeElement> {
            self.lookups.set(self.lookups.get() + 1);
            let entries = self.entries.borrow();
            let entry = entries.get(selector)?;
            if entry.hidden_for.get() > 0 {
                entry.hidden_for.set(entry.hidden_for.get() - 1);
                return None;
            }
            Some(entry.element.clone())
        }
    }
}
