//! Small typed wrappers over the `web-sys` document queries the dashboard
//! behaviors share.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, NodeList};

#[derive(Debug, Error)]
pub enum DomError {
    #[error("browser window is not available")]
    NoWindow,
    #[error("document is not available")]
    NoDocument,
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("element #{id} is not a {expected}")]
    WrongElementType { id: String, expected: &'static str },
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::Js(describe_js_value(&value))
    }
}

pub fn describe_js_value(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub fn document() -> Result<Document, DomError> {
    web_sys::window()
        .ok_or(DomError::NoWindow)?
        .document()
        .ok_or(DomError::NoDocument)
}

pub fn element_by_id(id: &str) -> Result<Option<Element>, DomError> {
    if id.trim().is_empty() {
        return Ok(None);
    }
    Ok(document()?.get_element_by_id(id))
}

/// Look up an optional element and check its type when present
pub fn typed_element_by_id<T: JsCast>(id: &str, expected: &'static str) -> Result<Option<T>, DomError> {
    match element_by_id(id)? {
        None => Ok(None),
        Some(element) => element
            .dyn_into::<T>()
            .map(Some)
            .map_err(|_| DomError::WrongElementType {
                id: id.to_string(),
                expected,
            }),
    }
}

/// Look up an element the caller cannot work without
pub fn require_element<T: JsCast>(id: &str, expected: &'static str) -> Result<T, DomError> {
    typed_element_by_id(id, expected)?.ok_or_else(|| DomError::MissingElement(id.to_string()))
}

fn elements_of(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// All elements matching `selector`, in document order
pub fn query_all(selector: &str) -> Result<Vec<Element>, DomError> {
    let list = document()?
        .query_selector_all(selector)
        .map_err(|err| DomError::Selector {
            selector: selector.to_string(),
            message: describe_js_value(&err),
        })?;
    Ok(elements_of(list))
}

/// Elements matching `selector` below `parent`, in document order
pub fn query_all_within(parent: &Element, selector: &str) -> Result<Vec<Element>, DomError> {
    let list = parent
        .query_selector_all(selector)
        .map_err(|err| DomError::Selector {
            selector: selector.to_string(),
            message: describe_js_value(&err),
        })?;
    Ok(elements_of(list))
}

/// Text of every line element inside the container. A missing container
/// yields no lines.
pub fn collect_texts(container_id: &str, line_selector: &str) -> Result<Vec<String>, DomError> {
    let Some(container) = element_by_id(container_id)? else {
        return Ok(Vec::new());
    };

    Ok(query_all_within(&container, line_selector)?
        .into_iter()
        .map(|element| element.text_content().unwrap_or_default())
        .collect())
}

/// Raw text of a JSON data island, if the page rendered one
pub fn read_json_island(id: &str) -> Result<Option<String>, DomError> {
    Ok(element_by_id(id)?
        .and_then(|element| element.text_content())
        .filter(|text| !text.trim().is_empty()))
}
