//! Failure taxonomy for the draw cycle.
//!
//! Every failure leaves the previously rendered diagram intact: the rendering
//! surface is only mutated after a full successful build+layout+fit cycle.

use thiserror::Error;

/// Errors a draw cycle can surface.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DrawError {
	/// The `/kernel` endpoint could not be reached or returned a failure
	/// status. The draw aborts; whatever was on screen stays there.
	#[error("kernel fetch failed: {0}")]
	FetchFailure(String),

	/// The response body did not decode to the expected node/edge shape.
	/// No partial graph is built.
	#[error("malformed graph source: {0}")]
	MalformedGraphSource(String),

	/// The container has no usable dimensions yet (zero or unparseable
	/// width/height). Not fatal: the caller retries the fit once the
	/// surrounding page has sized the container.
	#[error("viewport not resolvable: {0}")]
	UnresolvableViewport(String),
}
