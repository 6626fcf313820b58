//! Card element handles and style application
//!
//! Handles are looked up once when the cards are inserted, so the frame loop
//! never queries the DOM.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::feed::{CardTransform, FrameOutput};
use crate::tuning::FeedTuning;

const WRAPPER_SELECTOR: &str = ".card-wrapper";
const INNER_SELECTOR: &str = ".glass-card";
const SPACER_ID: &str = "scroll-spacer";

/// One card's wrapper (transformed) and inner card (clipped)
struct CardElement {
    wrapper: HtmlElement,
    /// Missing inner cards just skip clipping
    inner: Option<HtmlElement>,
}

impl CardElement {
    fn apply(&self, card: &CardTransform, tuning: &FeedTuning) -> Result<(), JsValue> {
        let style = self.wrapper.style();

        if let Some(glow) = card.glow {
            style.set_property("--mouse-x", &format!("{}px", glow.x))?;
            style.set_property("--mouse-y", &format!("{}px", glow.y))?;
        }
        style.set_property("transition", "none")?;

        if let Some(inner) = &self.inner {
            let clip = card
                .css_clip_path(tuning.clip_epsilon, tuning.corner_radius)
                .unwrap_or_else(|| "none".to_string());
            inner.style().set_property("clip-path", &clip)?;
        }

        style.set_property("transform-origin", &card.css_transform_origin())?;
        style.set_property("transform", &card.css_transform(tuning.perspective))?;
        style.set_property("opacity", &card.opacity.to_string())?;
        style.set_property("z-index", &card.z_index.to_string())?;
        Ok(())
    }
}

/// Index -> element mapping for every rendered card
pub struct CardElements {
    cards: Vec<CardElement>,
}

impl CardElements {
    /// Collect `.card-wrapper` elements under `root`, in document order
    pub fn collect(root: &Element) -> Result<Self, JsValue> {
        let nodes = root.query_selector_all(WRAPPER_SELECTOR)?;
        let mut cards = Vec::with_capacity(nodes.length() as usize);
        for i in 0..nodes.length() {
            let Some(node) = nodes.item(i) else {
                continue;
            };
            let wrapper: HtmlElement = node.dyn_into()?;
            let inner = wrapper
                .query_selector(INNER_SELECTOR)?
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            if inner.is_none() {
                log::warn!("Card {} has no {} element, clipping disabled", i, INNER_SELECTOR);
            }
            cards.push(CardElement { wrapper, inner });
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Wrapper element of card `index`
    pub fn wrapper(&self, index: usize) -> Option<&HtmlElement> {
        self.cards.get(index).map(|c| &c.wrapper)
    }

    /// Rendered height of every card
    pub fn measure_heights(&self) -> Vec<f32> {
        self.cards
            .iter()
            .map(|c| c.wrapper.offset_height() as f32)
            .collect()
    }

    /// Write a frame's transforms onto the elements
    ///
    /// A card whose styles can't be written is skipped; the rest still update.
    pub fn apply(&self, frame: &FrameOutput, tuning: &FeedTuning) {
        for (i, (card, element)) in frame.cards.iter().zip(&self.cards).enumerate() {
            if let Err(e) = element.apply(card, tuning) {
                log::warn!("Card {} style update failed: {:?}", i, e);
            }
        }
    }
}

/// Invisible element that gives the scroll container its height
pub struct ScrollSpacer {
    el: HtmlElement,
}

impl ScrollSpacer {
    /// Create the spacer under `parent`, replacing any earlier one
    pub fn create(document: &Document, parent: &Element) -> Result<Self, JsValue> {
        if let Some(old) = document.get_element_by_id(SPACER_ID) {
            old.remove();
        }

        let el: HtmlElement = document.create_element("div")?.dyn_into()?;
        el.set_id(SPACER_ID);

        // Absolute so it dictates scroll height without pushing other content
        let style = el.style();
        for (name, value) in [
            ("position", "absolute"),
            ("top", "0"),
            ("left", "0"),
            ("width", "100%"),
            ("opacity", "0"),
            ("pointer-events", "none"),
        ] {
            style.set_property(name, value)?;
        }

        parent.append_child(&el)?;
        Ok(Self { el })
    }

    pub fn set_height(&self, height: f32) -> Result<(), JsValue> {
        self.el.style().set_property("height", &format!("{}px", height))
    }
}
