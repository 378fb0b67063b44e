//! JavaScript execution operations for CDP page session.

use serde_json::{json, Value};

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{PropertyDescriptor, RemoteObject};

use super::core::PageSession;

fn check_exception(result: &Value) -> Result<(), CdpError> {
    if let Some(exception) = result.get("exceptionDetails") {
        let text = exception["exception"]["description"]
            .as_str()
            .or_else(|| exception["text"].as_str())
            .unwrap_or("Unknown error");
        return Err(CdpError::JavaScript(text.to_string()));
    }
    Ok(())
}

fn call_arguments(args: &[Value]) -> Value {
    json!(args.iter().map(|v| json!({"value": v})).collect::<Vec<_>>())
}

/// `Runtime.evaluate` params that keep the result alive in `object_group`.
fn evaluate_handle_params(expression: &str, object_group: &str) -> Value {
    json!({
        "expression": expression,
        "returnByValue": false,
        "objectGroup": object_group,
    })
}

impl PageSession {
    /// Evaluate JavaScript expression.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        check_exception(&result)?;
        Ok(result["result"]["value"].clone())
    }

    /// Evaluate JavaScript and return a remote object owned by `object_group`.
    pub async fn evaluate_handle(
        &self,
        expression: &str,
        object_group: &str,
    ) -> Result<RemoteObject, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(evaluate_handle_params(expression, object_group)),
            )
            .await?;

        check_exception(&result)?;
        Ok(serde_json::from_value(result["result"].clone())?)
    }

    /// Call function on remote object, returning the result by value.
    pub async fn call_function_on(
        &self,
        object_id: &str,
        function: &str,
        args: &[Value],
    ) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.callFunctionOn",
                Some(json!({
                    "objectId": object_id,
                    "functionDeclaration": function,
                    "arguments": call_arguments(args),
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        check_exception(&result)?;
        Ok(result["result"]["value"].clone())
    }

    /// Call function on remote object, returning a remote object owned by
    /// `object_group`.
    pub async fn call_function_on_handle(
        &self,
        object_id: &str,
        function: &str,
        args: &[Value],
        object_group: &str,
    ) -> Result<RemoteObject, CdpError> {
        let result = self
            .call(
                "Runtime.callFunctionOn",
                Some(json!({
                    "objectId": object_id,
                    "functionDeclaration": function,
                    "arguments": call_arguments(args),
                    "returnByValue": false,
                    "objectGroup": object_group,
                })),
            )
            .await?;

        check_exception(&result)?;
        Ok(serde_json::from_value(result["result"].clone())?)
    }

    /// Own properties of a remote object.
    pub async fn get_properties(&self, object_id: &str) -> Result<Vec<PropertyDescriptor>, CdpError> {
        let result = self
            .call(
                "Runtime.getProperties",
                Some(json!({
                    "objectId": object_id,
                    "ownProperties": true,
                })),
            )
            .await?;

        Ok(serde_json::from_value(result["result"].clone())?)
    }

    /// Let the page garbage-collect a remote object.
    pub async fn release_object(&self, object_id: &str) -> Result<(), CdpError> {
        self.call(
            "Runtime.releaseObject",
            Some(json!({"objectId": object_id})),
        )
        .await?;
        Ok(())
    }

    /// Release every remote object in `object_group`.
    pub async fn release_object_group(&self, object_group: &str) -> Result<(), CdpError> {
        self.call(
            "Runtime.releaseObjectGroup",
            Some(json!({"objectGroup": object_group})),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_exception_prefers_description() {
        let result = json!({
            "exceptionDetails": {
                "text": "Uncaught",
                "exception": {"description": "SyntaxError: 'div[' is not a valid selector"}
            }
        });
        match check_exception(&result) {
            Err(CdpError::JavaScript(msg)) => assert!(msg.starts_with("SyntaxError")),
            other => panic!("Expected JavaScript error, got {:?}", other),
        }
    }

    #[test]
    fn test_check_exception_passes_results() {
        assert!(check_exception(&json!({"result": {"type": "string", "value": "x"}})).is_ok());
    }

    #[test]
    fn test_evaluate_handle_params_carry_group() {
        let params = evaluate_handle_params("document.querySelector('a.next')", "elements");
        assert_eq!(params["objectGroup"], "elements");
        assert_eq!(params["returnByValue"], false);
    }

    #[test]
    fn test_call_arguments_wrap_values() {
        let args = call_arguments(&[json!(".review"), json!(3)]);
        assert_eq!(args[0]["value"], ".review");
        assert_eq!(args[1]["value"], 3);
    }
}
