//! The DOM tip box laid over the canvas.

use revdark_engine::TipText;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

pub const TIP_ID: &str = "tip";
pub const CONTINUE_LABEL: &str = "Play more?";

const TIP_STYLE: &str = "position:fixed;left:0;right:0;top:40%;text-align:center;\
     color:#ddd;font-family:Georgia,serif;white-space:pre-line;\
     transition:opacity 1s;pointer-events:none;";

/// Tip box plus the continue button shown after a win.
pub struct TipOverlay {
    document: Document,
    tip: HtmlElement,
    button: HtmlElement,
}

impl TipOverlay {
    /// Use the page's `#tip` element, or append one to the body.
    pub fn attach(document: &Document) -> Result<Self, JsValue> {
        let tip: HtmlElement = match document.get_element_by_id(TIP_ID) {
            Some(el) => el.dyn_into()?,
            None => {
                let el: HtmlElement = document.create_element("div")?.dyn_into()?;
                el.set_id(TIP_ID);
                el.set_attribute("style", TIP_STYLE)?;
                document
                    .body()
                    .ok_or_else(|| JsValue::from_str("no body"))?
                    .append_child(&el)?;
                el
            }
        };

        let button: HtmlElement = document.create_element("button")?.dyn_into()?;
        button.set_attribute("type", "button")?;
        button.set_text_content(Some(CONTINUE_LABEL));
        button.style().set_property("pointer-events", "auto")?;

        Ok(Self {
            document: document.clone(),
            tip,
            button,
        })
    }

    pub fn button(&self) -> &HtmlElement {
        &self.button
    }

    /// Replace the tip contents and make it fully visible.
    pub fn show(&self, text: &TipText) -> Result<(), JsValue> {
        self.tip.set_inner_html("");
        match text {
            TipText::Empty => {}
            TipText::Title { heading, body } => {
                self.append("h1", heading)?;
                if let Some(body) = body {
                    self.append("p", body)?;
                }
            }
            TipText::Line(line) => {
                self.append("p", line)?;
            }
            TipText::Quote { text, author } => {
                let p = self.append("p", &format!("\"{}\"\n", text))?;
                let em = self.document.create_element("em")?;
                em.set_text_content(Some(&format!("- {}", author)));
                p.append_child(&em)?;
            }
        }
        self.set_opacity("1")
    }

    pub fn fade(&self) -> Result<(), JsValue> {
        self.set_opacity("0")
    }

    /// Swap the tip for the continue button.
    pub fn show_continue(&self) -> Result<(), JsValue> {
        self.tip.set_inner_html("");
        self.tip.append_child(&self.button)?;
        self.set_opacity("1")
    }

    fn append(&self, tag: &str, text: &str) -> Result<Element, JsValue> {
        let el = self.document.create_element(tag)?;
        el.set_text_content(Some(text));
        self.tip.append_child(&el)?;
        Ok(el)
    }

    fn set_opacity(&self, value: &str) -> Result<(), JsValue> {
        self.tip.style().set_property("opacity", value)
    }
}
