//! `PageHandle` / `ElementHandle` implementations over a CDP page session.
//!
//! Elements are addressed by Runtime remote object ids, so a handle stays
//! valid for as long as the document that produced it, or until
//! `release_elements` drops the object group every element id lives in.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use revscout_protocols::browser::{ElementHandle, PageHandle};
use revscout_protocols::error::BrowserError;

use crate::cdp::{CdpError, PageSession};

/// Object group shared by every element handle of a page.
pub(crate) const ELEMENT_GROUP: &str = "revscout-elements";

const QUERY_IN_ELEMENT: &str = "function(selector) { return this.querySelector(selector); }";

const TEXT_CONTENT: &str = "function() { return this.textContent; }";

const IS_VISIBLE: &str = r#"function() {
    if (!this.isConnected) return false;
    const style = window.getComputedStyle(this);
    if (style.visibility === 'hidden' || style.display === 'none') return false;
    const rect = this.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
}"#;

const CLICK_QUAD: &str = r#"function() {
    this.scrollIntoView({block: 'center', inline: 'center'});
    const r = this.getBoundingClientRect();
    if (r.width === 0 || r.height === 0) return null;
    return [r.left, r.top, r.right, r.top, r.right, r.bottom, r.left, r.bottom];
}"#;

/// Map a failed selector evaluation to `InvalidLocator` when the page
/// rejected the selector itself.
fn locator_error(locator: &str, err: CdpError) -> BrowserError {
    match err {
        CdpError::JavaScript(message) if message.contains("is not a valid selector") => {
            BrowserError::InvalidLocator {
                locator: locator.to_string(),
                message,
            }
        }
        other => other.into(),
    }
}

fn selector_literal(locator: &str) -> String {
    Value::String(locator.to_string()).to_string()
}

/// A page driven over CDP.
pub struct CdpPage {
    session: Arc<PageSession>,
    network_idle: Duration,
}

impl CdpPage {
    /// `network_idle` is the quiet period that counts as settled.
    pub fn new(session: Arc<PageSession>, network_idle: Duration) -> Self {
        Self {
            session,
            network_idle,
        }
    }

    pub fn session(&self) -> &Arc<PageSession> {
        &self.session
    }

    fn element(&self, object_id: String) -> Box<dyn ElementHandle> {
        Box::new(CdpElement {
            session: self.session.clone(),
            object_id,
        })
    }
}

#[async_trait]
impl PageHandle for CdpPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        Ok(self.session.navigate(url, timeout).await?)
    }

    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<(), BrowserError> {
        Ok(self
            .session
            .wait_for_network_idle(self.network_idle, timeout)
            .await?)
    }

    async fn content(&self) -> Result<String, BrowserError> {
        Ok(self.session.get_content().await?)
    }

    async fn query_all(&self, locator: &str) -> Result<Vec<Box<dyn ElementHandle>>, BrowserError> {
        let expression = format!(
            "Array.from(document.querySelectorAll({}))",
            selector_literal(locator)
        );
        let array = self
            .session
            .evaluate_handle(&expression, ELEMENT_GROUP)
            .await
            .map_err(|e| locator_error(locator, e))?;
        let Some(array_id) = array.into_object_id() else {
            return Ok(Vec::new());
        };

        let properties = self.session.get_properties(&array_id).await?;
        let mut indexed: Vec<(usize, String)> = properties
            .into_iter()
            .filter_map(|prop| {
                let index = prop.name.parse::<usize>().ok()?;
                let object_id = prop.value?.into_object_id()?;
                Some((index, object_id))
            })
            .collect();
        indexed.sort_by_key(|(index, _)| *index);

        self.session.release_object(&array_id).await?;

        Ok(indexed
            .into_iter()
            .map(|(_, object_id)| self.element(object_id))
            .collect())
    }

    async fn query(&self, locator: &str) -> Result<Option<Box<dyn ElementHandle>>, BrowserError> {
        let expression = format!("document.querySelector({})", selector_literal(locator));
        let object = self
            .session
            .evaluate_handle(&expression, ELEMENT_GROUP)
            .await
            .map_err(|e| locator_error(locator, e))?;
        Ok(object.into_object_id().map(|id| self.element(id)))
    }

    async fn release_elements(&self) -> Result<(), BrowserError> {
        Ok(self.session.release_object_group(ELEMENT_GROUP).await?)
    }
}

/// An element of a [`CdpPage`], held as a remote object id.
pub struct CdpElement {
    session: Arc<PageSession>,
    object_id: String,
}

#[async_trait]
impl ElementHandle for CdpElement {
    async fn query(&self, locator: &str) -> Result<Option<Box<dyn ElementHandle>>, BrowserError> {
        let object = self
            .session
            .call_function_on_handle(
                &self.object_id,
                QUERY_IN_ELEMENT,
                &[json!(locator)],
                ELEMENT_GROUP,
            )
            .await
            .map_err(|e| locator_error(locator, e))?;
        Ok(object.into_object_id().map(|object_id| {
            Box::new(CdpElement {
                session: self.session.clone(),
                object_id,
            }) as Box<dyn ElementHandle>
        }))
    }

    async fn text_content(&self) -> Result<Option<String>, BrowserError> {
        let value = self
            .session
            .call_function_on(&self.object_id, TEXT_CONTENT, &[])
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn click(&self) -> Result<(), BrowserError> {
        let quad = self
            .session
            .call_function_on(&self.object_id, CLICK_QUAD, &[])
            .await?;
        let quad: Vec<f64> = match quad {
            Value::Array(values) => values.iter().filter_map(Value::as_f64).collect(),
            _ => {
                return Err(BrowserError::ActionFailed(
                    "element has no clickable area".to_string(),
                ));
            }
        };

        let (x, y) = PageSession::quad_center(&quad);
        Ok(self.session.click(x, y).await?)
    }

    async fn is_visible(&self) -> Result<bool, BrowserError> {
        let value = self
            .session
            .call_function_on(&self.object_id, IS_VISIBLE, &[])
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_literal_escapes_quotes() {
        assert_eq!(selector_literal("div.review"), "\"div.review\"");
        assert_eq!(
            selector_literal(r#"a[aria-label="Next"]"#),
            r#""a[aria-label=\"Next\"]""#
        );
    }

    #[test]
    fn test_invalid_selector_maps_to_invalid_locator() {
        let err = locator_error(
            "div[",
            CdpError::JavaScript(
                "SyntaxError: Failed to execute 'querySelectorAll' on 'Document': 'div[' is not a valid selector.".to_string(),
            ),
        );
        match err {
            BrowserError::InvalidLocator { locator, .. } => assert_eq!(locator, "div["),
            other => panic!("Expected InvalidLocator, got {:?}", other),
        }
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = locator_error(".review", CdpError::SessionClosed);
        assert!(matches!(err, BrowserError::SessionClosed));
    }
}
