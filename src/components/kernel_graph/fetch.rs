//! Fetching the kernel graph from the backend endpoint.
//!
//! `GET /kernel` returns a JSON document whose payload is itself a
//! JSON-encoded string: the body decodes to a string, and that string decodes
//! to the node/edge shape. The outer layer is stripped here; the inner pass
//! belongs to [`decode_source`](super::builder::decode_source).

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use super::error::DrawError;

/// Backend endpoint serving the instruction graph.
pub const KERNEL_ENDPOINT: &str = "/kernel";

fn js_failure(value: JsValue) -> DrawError {
	DrawError::FetchFailure(
		value
			.as_string()
			.unwrap_or_else(|| format!("{value:?}")),
	)
}

/// Strip the outer string layer from the doubly-encoded response body.
pub fn decode_envelope(body: &str) -> Result<String, DrawError> {
	serde_json::from_str::<String>(body).map_err(|e| {
		DrawError::MalformedGraphSource(format!("outer payload is not a JSON string: {e}"))
	})
}

/// Fetch the endpoint and return the inner graph JSON, ready for
/// [`decode_source`](super::builder::decode_source).
///
/// Network errors and non-success statuses surface as
/// [`DrawError::FetchFailure`]; the caller aborts the draw and the previous
/// diagram stays on screen.
pub async fn fetch_kernel_payload(url: &str) -> Result<String, DrawError> {
	let window =
		web_sys::window().ok_or_else(|| DrawError::FetchFailure("no window".to_string()))?;

	let opts = RequestInit::new();
	opts.set_method("GET");
	let request = Request::new_with_str_and_init(url, &opts).map_err(js_failure)?;

	let response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(js_failure)?;
	let response: Response = response.dyn_into().map_err(js_failure)?;
	if !response.ok() {
		return Err(DrawError::FetchFailure(format!(
			"{url} returned status {}",
			response.status()
		)));
	}

	let body = JsFuture::from(response.text().map_err(js_failure)?)
		.await
		.map_err(js_failure)?;
	let body = body
		.as_string()
		.ok_or_else(|| DrawError::FetchFailure("response body is not text".to_string()))?;

	decode_envelope(&body)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn envelope_unwraps_the_outer_string_layer() {
		let body = r#""{\"nodes\":[],\"edges\":[]}""#;
		assert_eq!(decode_envelope(body).unwrap(), r#"{"nodes":[],"edges":[]}"#);
	}

	#[test]
	fn bare_object_body_is_malformed() {
		let err = decode_envelope(r#"{"nodes":[],"edges":[]}"#).unwrap_err();
		assert!(matches!(err, DrawError::MalformedGraphSource(_)));
	}
}
