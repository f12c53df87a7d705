//! Page processing: one parsed tree, two traversals.

use crate::error::LinkError;
use crate::frontier::Frontier;
use crate::normalize::normalize;
use crate::result::{InputElement, PageInputs};
use scraper::{ElementRef, Html};
use tracing::{debug, warn};
use url::Url;

/// Callbacks for the element kinds the crawler cares about.
pub trait ElementVisitor {
    fn anchor(&mut self, _element: ElementRef<'_>) {}

    fn input(&mut self, _element: ElementRef<'_>) {}
}

/// Depth-first, document-order walk over every element of the tree.
pub fn walk<V: ElementVisitor + ?Sized>(document: &Html, visitor: &mut V) {
    for node in document.tree.root().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        match element.value().name() {
            "a" => visitor.anchor(element),
            "input" => visitor.input(element),
            _ => {}
        }
    }
}

pub fn parse(body: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(body))
}

struct LinkVisitor<'a> {
    base: &'a Url,
    frontier: &'a Frontier,
    enqueued: usize,
}

impl ElementVisitor for LinkVisitor<'_> {
    fn anchor(&mut self, element: ElementRef<'_>) {
        let Some(href) = element.value().attr("href") else {
            return;
        };

        match normalize(href, self.base) {
            Ok(url) => {
                if self.frontier.offer(url) {
                    self.enqueued += 1;
                }
            }
            Err(LinkError::Empty) => debug!("[{}] Skipping empty link", self.base),
            Err(e @ LinkError::Unsupported(_)) => debug!("[{}] {}", self.base, e),
            Err(e @ LinkError::Malformed { .. }) => {
                warn!("[{}] Error parsing URL: {}", self.base, e)
            }
        }
    }
}

/// Offer every anchor target on the page to the frontier. Returns how many
/// were newly enqueued.
pub fn extract_links(document: &Html, base: &Url, frontier: &Frontier) -> usize {
    debug!("[{}] Processing HTML for links", base);
    let mut visitor = LinkVisitor {
        base,
        frontier,
        enqueued: 0,
    };
    walk(document, &mut visitor);
    visitor.enqueued
}

#[derive(Default)]
struct InputVisitor {
    inputs: Vec<InputElement>,
}

impl ElementVisitor for InputVisitor {
    fn input(&mut self, element: ElementRef<'_>) {
        self.inputs.push(InputElement::new(element.value().attrs()));
    }
}

pub fn extract_inputs(document: &Html) -> Vec<InputElement> {
    let mut visitor = InputVisitor::default();
    walk(document, &mut visitor);
    visitor.inputs
}

/// Outcome of processing one fetched page.
#[derive(Debug, Default)]
pub struct PageReport {
    pub links_enqueued: usize,
    pub inputs: Option<PageInputs>,
}

/// Parse a body, feed its links back into the frontier and collect its inputs.
///
/// Synchronous on purpose: the parsed tree is not `Send`, so it must be
/// created and dropped without crossing an `.await`.
pub fn process_page(body: &[u8], page_url: &Url, frontier: &Frontier) -> PageReport {
    let document = parse(body);

    debug!("[{}] Processing HTML for inputs", page_url);
    let inputs = extract_inputs(&document);
    let links_enqueued = extract_links(&document, page_url, frontier);

    PageReport {
        links_enqueued,
        inputs: (!inputs.is_empty()).then(|| PageInputs::new(page_url.as_str(), inputs)),
    }
}
